use shared::ServerMessage;
use tokio::sync::mpsc;
use xiangqi_core::logic::board::Color;

pub type Tx = mpsc::UnboundedSender<ServerMessage>;

pub struct Player {
    pub tx: Tx,
}

/// Two seats and a move counter. The server keeps no board: clients check
/// moves themselves and the room only relays them.
pub struct Room {
    pub host: String,
    pub guest: Option<String>,
    /// Drawn when the guest sits down.
    pub host_color: Color,
    pub moves_relayed: u64,
}

impl Room {
    pub const fn new(host: String) -> Self {
        Self {
            host,
            guest: None,
            host_color: Color::Red,
            moves_relayed: 0,
        }
    }

    pub const fn is_full(&self) -> bool {
        self.guest.is_some()
    }

    /// The other member, if `player_id` sits here and the room is full.
    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        let guest = self.guest.as_deref()?;
        if self.host == player_id {
            Some(guest)
        } else if guest == player_id {
            Some(&self.host)
        } else {
            None
        }
    }
}
