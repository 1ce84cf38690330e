use crate::game_manager::{AppState, Room};
use shared::ServerMessage;
use tokio::sync::RwLock;
use uuid::Uuid;
use xiangqi_core::logic::board::Color;

impl AppState {
    /// Opens a room that waits for someone to join it by id.
    pub async fn create_room(&self, player_id: &str) {
        if self.player_to_room.contains_key(player_id) {
            self.send_error(player_id, "already in a room");
            return;
        }
        self.cancel_find_match(player_id).await;

        let room_id = Uuid::new_v4().to_string();
        self.rooms
            .insert(room_id.clone(), RwLock::new(Room::new(player_id.to_string())));
        self.player_to_room
            .insert(player_id.to_string(), room_id.clone());
        tracing::info!(room_id = %room_id, host = %player_id, "room created");
        self.send(player_id, ServerMessage::RoomCreated { room_id });
    }

    pub async fn join_room(&self, player_id: &str, room_id: &str) {
        if self.player_to_room.contains_key(player_id) {
            self.send_error(player_id, "already in a room");
            return;
        }
        let Some(room_lock) = self.rooms.get(room_id) else {
            self.send_error(player_id, "room not found");
            return;
        };
        let mut room = room_lock.write().await;
        if room.is_full() {
            self.send_error(player_id, "room is full");
            return;
        }
        self.cancel_find_match(player_id).await;
        self.seat_guest(room_id, &mut room, player_id);
    }

    pub async fn find_match(&self, player_id: &str) {
        if self.player_to_room.contains_key(player_id) {
            tracing::warn!(player_id = %player_id, "player already in a room, ignoring find_match");
            self.send_error(player_id, "already in a room");
            return;
        }

        let mut queue = self.matchmaking_queue.lock().await;
        if queue.iter().any(|id| id == player_id) {
            tracing::debug!(player_id = %player_id, "player already in queue");
            return;
        }

        // Someone who created or joined a room meanwhile is no longer available.
        let mut opponent = None;
        while let Some(candidate) = queue.pop_front() {
            if self.player_to_room.contains_key(&candidate) {
                tracing::debug!(player_id = %candidate, "queued player already seated, skipping");
                continue;
            }
            opponent = Some(candidate);
            break;
        }
        let Some(opponent_id) = opponent else {
            tracing::info!(player_id = %player_id, "no opponent waiting, queueing");
            queue.push_back(player_id.to_string());
            drop(queue);
            self.send(player_id, ServerMessage::WaitingForMatch);
            return;
        };
        drop(queue);

        tracing::info!(player_id = %player_id, opponent_id = %opponent_id, "opponent found");
        let room_id = Uuid::new_v4().to_string();
        self.rooms
            .insert(room_id.clone(), RwLock::new(Room::new(opponent_id.clone())));
        self.player_to_room.insert(opponent_id, room_id.clone());
        if let Some(room_lock) = self.rooms.get(&room_id) {
            let mut room = room_lock.write().await;
            self.seat_guest(&room_id, &mut room, player_id);
        }
    }

    pub async fn cancel_find_match(&self, player_id: &str) {
        let mut queue = self.matchmaking_queue.lock().await;
        let before = queue.len();
        queue.retain(|id| id != player_id);
        if queue.len() != before {
            tracing::info!(player_id = %player_id, "left matchmaking queue");
        }
    }

    /// Fills the second seat, draws colours and tells both players.
    fn seat_guest(&self, room_id: &str, room: &mut Room, guest: &str) {
        room.guest = Some(guest.to_string());
        room.host_color = if rand::random() { Color::Red } else { Color::Black };
        self.player_to_room
            .insert(guest.to_string(), room_id.to_string());

        tracing::info!(room_id = %room_id, host = %room.host, guest = %guest, host_color = %room.host_color, "match started");
        self.send(
            &room.host,
            ServerMessage::MatchFound {
                room_id: room_id.to_string(),
                opponent_id: guest.to_string(),
                your_color: room.host_color,
            },
        );
        self.send(
            guest,
            ServerMessage::MatchFound {
                room_id: room_id.to_string(),
                opponent_id: room.host.clone(),
                your_color: room.host_color.opposite(),
            },
        );
    }
}
