use crate::game_manager::{session::Player, AppState, Tx};
use shared::ServerMessage;

impl AppState {
    pub fn add_player(&self, id: String, tx: Tx) {
        tracing::info!(player_id = %id, "player connected");
        self.players.insert(id, Player { tx });
    }

    /// Connection closed: drop every trace of the player and tell the
    /// opponent, if any.
    pub async fn remove_player(&self, id: &str) {
        tracing::info!(player_id = %id, "player disconnected");
        self.cancel_find_match(id).await;
        self.close_room(id, ServerMessage::OpponentDisconnected);
        self.players.remove(id);
    }

    pub async fn leave_room(&self, id: &str) {
        self.cancel_find_match(id).await;
        if !self.close_room(id, ServerMessage::OpponentLeft) {
            self.send_error(id, "not in a room");
        }
    }

    /// Removes the room `id` sits in and sends `notice` to whoever else was
    /// there. Removal from the map is the single point that decides who
    /// notifies, so the opponent hears about it once.
    fn close_room(&self, id: &str, notice: ServerMessage) -> bool {
        let Some((_, room_id)) = self.player_to_room.remove(id) else {
            return false;
        };
        let Some((_, room_lock)) = self.rooms.remove(&room_id) else {
            return false;
        };
        let room = room_lock.into_inner();

        match room.opponent_of(id) {
            Some(opponent_id) => {
                tracing::info!(room_id = %room_id, player_id = %id, opponent_id = %opponent_id, "room closed, notifying opponent");
                self.player_to_room.remove(opponent_id);
                self.send(opponent_id, notice);
            }
            None => tracing::info!(room_id = %room_id, player_id = %id, "waiting room freed"),
        }
        true
    }
}
