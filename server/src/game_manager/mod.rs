use dashmap::DashMap;
use shared::{GameMessage, ServerMessage};
use std::collections::VecDeque;
use tokio::sync::{Mutex, RwLock};

pub mod lifecycle;
pub mod matchmaking;
pub mod move_handler;
pub mod session;

pub use session::{Player, Room, Tx};

pub struct AppState {
    pub players: DashMap<String, Player>,
    pub rooms: DashMap<String, RwLock<Room>>,
    pub player_to_room: DashMap<String, String>,
    pub matchmaking_queue: Mutex<VecDeque<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
            rooms: DashMap::new(),
            player_to_room: DashMap::new(),
            matchmaking_queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues `msg` for `player_id`. A vanished player is not an error.
    pub fn send(&self, player_id: &str, msg: ServerMessage) {
        if let Some(player) = self.players.get(player_id) {
            let _ = player.tx.send(msg);
        }
    }

    pub fn send_error(&self, player_id: &str, reason: &str) {
        tracing::debug!(player_id = %player_id, reason, "rejecting client request");
        self.send(player_id, ServerMessage::Error(reason.to_string()));
    }

    pub async fn handle_message(&self, player_id: &str, msg: GameMessage) {
        match msg {
            GameMessage::CreateRoom => self.create_room(player_id).await,
            GameMessage::JoinRoom { room_id } => self.join_room(player_id, &room_id).await,
            GameMessage::FindMatch => self.find_match(player_id).await,
            GameMessage::CancelFindMatch => self.cancel_find_match(player_id).await,
            GameMessage::MakeMove { move_data } => self.handle_move(player_id, move_data).await,
            GameMessage::LeaveRoom => self.leave_room(player_id).await,
        }
    }
}
