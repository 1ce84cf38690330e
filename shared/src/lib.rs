//! Wire protocol between relay clients and the relay server. Both sides
//! exchange these as JSON text frames.

use serde::{Deserialize, Serialize};
use xiangqi_core::{engine::Move, logic::board::Color};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMessage {
    CreateRoom,
    JoinRoom { room_id: String },
    FindMatch,
    CancelFindMatch,
    /// Relayed as is: the sender has already checked it locally.
    MakeMove { move_data: Move },
    LeaveRoom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    RoomCreated {
        room_id: String,
    },
    WaitingForMatch,
    MatchFound {
        room_id: String,
        opponent_id: String,
        your_color: Color,
    },
    /// `seq` counts the moves relayed in this room, starting at 1.
    OpponentMove {
        seq: u64,
        move_data: Move,
    },
    OpponentDisconnected,
    OpponentLeft,
    Error(String),
}
