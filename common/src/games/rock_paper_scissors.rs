use serde::{Deserialize, Serialize};
use std::fmt;
use crate::room::Seat;

/// A hand a player can show in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    #[serde(rename = "rock")]
    Rock,
    #[serde(rename = "paper")]
    Paper,
    // The server spells it in the singular
    #[serde(rename = "scissor", alias = "scissors")]
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Rock => write!(f, "Rock"),
            Choice::Paper => write!(f, "Paper"),
            Choice::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Outcome of a round as decided by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    #[serde(rename = "TIE")]
    Tie,
    #[serde(rename = "player1")]
    Player1,
    #[serde(rename = "player2")]
    Player2,
}

impl RoundOutcome {
    /// Winning seat, None on a tie
    pub fn winner(&self) -> Option<Seat> {
        match self {
            RoundOutcome::Tie => None,
            RoundOutcome::Player1 => Some(Seat::Player1),
            RoundOutcome::Player2 => Some(Seat::Player2),
        }
    }
}

/// Per-seat choices as broadcast by the server.
/// A missing or null entry means that seat has not chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatChoices {
    #[serde(default)]
    pub player1: Option<Choice>,
    #[serde(default)]
    pub player2: Option<Choice>,
}

impl SeatChoices {
    pub fn get(&self, seat: Seat) -> Option<Choice> {
        match seat {
            Seat::Player1 => self.player1,
            Seat::Player2 => self.player2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scissors_uses_server_spelling() {
        assert_eq!(serde_json::to_string(&Choice::Scissors).unwrap(), "\"scissor\"");

        let plural: Choice = serde_json::from_str("\"scissors\"").unwrap();
        assert_eq!(plural, Choice::Scissors);
    }

    #[test]
    fn test_outcome_winner() {
        let tie: RoundOutcome = serde_json::from_str("\"TIE\"").unwrap();
        assert_eq!(tie.winner(), None);
        assert_eq!(RoundOutcome::Player1.winner(), Some(Seat::Player1));
        assert_eq!(RoundOutcome::Player2.winner(), Some(Seat::Player2));
    }

    #[test]
    fn test_seat_choices_with_nulls() {
        let choices: SeatChoices =
            serde_json::from_str(r#"{"player1": "rock", "player2": null}"#).unwrap();

        assert_eq!(choices.get(Seat::Player1), Some(Choice::Rock));
        assert_eq!(choices.get(Seat::Player2), None);

        let partial: SeatChoices = serde_json::from_str(r#"{"player2": "paper"}"#).unwrap();
        assert_eq!(partial.get(Seat::Player1), None);
        assert_eq!(partial.get(Seat::Player2), Some(Choice::Paper));
    }
}
