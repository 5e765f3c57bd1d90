use serde::{Deserialize, Serialize};
use crate::games::rock_paper_scissors::{Choice, RoundOutcome, SeatChoices};
use crate::room::{deserialize_seat_name, RoomId, Seat};

// WebSocket message types

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ask the server to place us in our room
    #[serde(rename = "start_game")]
    StartGame,

    #[serde(rename = "submit_choice")]
    SubmitChoice {
        seat: Seat,
        player1: String,
        player2: String,
        choice: Choice,
        room_id: RoomId,
    },

    #[serde(rename = "leave_room")]
    LeaveRoom { seat: Seat, room_id: RoomId },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "alert")]
    Alert { message: String },

    #[serde(rename = "players_assigned")]
    PlayersAssigned {
        room_id: RoomId,
        #[serde(default, deserialize_with = "deserialize_seat_name")]
        player1: Option<String>,
        #[serde(default, deserialize_with = "deserialize_seat_name")]
        player2: Option<String>,
    },

    #[serde(rename = "room_ready")]
    RoomReady,

    #[serde(rename = "waiting")]
    Waiting { waiting_participant: String },

    #[serde(rename = "opponent_choice_updated")]
    OpponentChoiceUpdated { choices: SeatChoices },

    #[serde(rename = "round_result")]
    RoundResult { outcome: RoundOutcome },

    #[serde(rename = "room_closed")]
    RoomClosed { triggering_participant: String },
}

impl ServerMessage {
    /// Event name as it appears on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Alert { .. } => "alert",
            ServerMessage::PlayersAssigned { .. } => "players_assigned",
            ServerMessage::RoomReady => "room_ready",
            ServerMessage::Waiting { .. } => "waiting",
            ServerMessage::OpponentChoiceUpdated { .. } => "opponent_choice_updated",
            ServerMessage::RoundResult { .. } => "round_result",
            ServerMessage::RoomClosed { .. } => "room_closed",
        }
    }
}
