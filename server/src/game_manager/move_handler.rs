use crate::game_manager::AppState;
use shared::ServerMessage;
use xiangqi_core::engine::Move;

impl AppState {
    /// Passes `mv` on to the other member of the sender's room. The room lock
    /// is held while sending, so moves reach the opponent in the order the
    /// room accepted them.
    pub async fn handle_move(&self, player_id: &str, mv: Move) {
        let Some(room_id) = self
            .player_to_room
            .get(player_id)
            .map(|entry| entry.value().clone())
        else {
            self.send_error(player_id, "not in a room");
            return;
        };
        let Some(room_lock) = self.rooms.get(&room_id) else {
            self.send_error(player_id, "room is gone");
            return;
        };

        let mut room = room_lock.write().await;
        let Some(opponent_id) = room.opponent_of(player_id).map(str::to_owned) else {
            self.send_error(player_id, "waiting for an opponent");
            return;
        };
        room.moves_relayed += 1;
        let seq = room.moves_relayed;
        tracing::debug!(room_id = %room_id, player_id = %player_id, seq, mv = %mv, "relaying move");
        self.send(
            &opponent_id,
            ServerMessage::OpponentMove { seq, move_data: mv },
        );
    }
}
