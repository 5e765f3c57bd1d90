use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Name sent in place of the second seat when it is occupied by an agent
pub const AGENT_LABEL: &str = "AI";

/// One of the two fixed participant slots of a room
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    #[serde(rename = "player1")]
    Player1,
    #[serde(rename = "player2")]
    Player2,
}

impl Seat {
    pub fn other(&self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Player1 => write!(f, "player1"),
            Seat::Player2 => write!(f, "player2"),
        }
    }
}

/// Server-assigned room identifier.
///
/// Servers hand out either short room codes or numeric ids, so both are
/// accepted on input. The id is always re-emitted as a string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "RawRoomId", into = "String")]
pub struct RoomId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoomId {
    Code(String),
    Number(i64),
}

impl From<RawRoomId> for RoomId {
    fn from(raw: RawRoomId) -> Self {
        match raw {
            RawRoomId::Code(code) => RoomId(code),
            RawRoomId::Number(number) => RoomId(number.to_string()),
        }
    }
}

impl From<RoomId> for String {
    fn from(room_id: RoomId) -> Self {
        room_id.0
    }
}

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Empty seats arrive as `null`, `false` or `""`; all of them mean "nobody yet".
pub(crate) fn deserialize_seat_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSeatName {
        Name(String),
        Flag(bool),
    }

    Ok(match Option::<RawSeatName>::deserialize(deserializer)? {
        Some(RawSeatName::Name(name)) if !name.is_empty() => Some(name),
        _ => None,
    })
}
