use rpsroom_common::{Choice, ClientMessage, RoomId, RoundOutcome, Seat, AGENT_LABEL};
use tracing::{info, warn};

use crate::round::Round;
use crate::transport::Transport;
use crate::ui::UiNotifier;

pub const ROOM_CLOSED_MESSAGE: &str = "The game room has closed.";

/// Everything the client knows about its room, owned by the host and lent
/// to the router for each handler call
#[derive(Debug)]
pub struct Session {
    local_identity: String,
    pub room_id: Option<RoomId>,
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub is_ai_opponent: bool,
    pub score_player1: u32,
    pub score_player2: u32,
    pub round: Round,
}

impl Session {
    pub fn new(local_identity: impl Into<String>, is_ai_opponent: bool) -> Self {
        Session {
            local_identity: local_identity.into(),
            room_id: None,
            player1: None,
            player2: None,
            is_ai_opponent,
            score_player1: 0,
            score_player2: 0,
            round: Round::default(),
        }
    }

    pub fn local_identity(&self) -> &str {
        &self.local_identity
    }

    pub fn in_room(&self) -> bool {
        self.room_id.is_some()
    }

    /// Seat occupied by the local user, if either seat matches our identity
    pub fn local_seat(&self) -> Option<Seat> {
        if self.player1.as_deref() == Some(self.local_identity.as_str()) {
            Some(Seat::Player1)
        } else if self.player2.as_deref() == Some(self.local_identity.as_str()) {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn display_name(&self, seat: Seat) -> String {
        match seat {
            Seat::Player2 if self.is_ai_opponent => AGENT_LABEL.to_string(),
            Seat::Player1 => self.player1.clone().unwrap_or_else(|| seat.to_string()),
            Seat::Player2 => self.player2.clone().unwrap_or_else(|| seat.to_string()),
        }
    }

    /// Returns false (and changes nothing) when another room is already active
    pub fn apply_player_info(
        &mut self,
        room_id: RoomId,
        player1: Option<String>,
        player2: Option<String>,
        ui: &mut dyn UiNotifier,
    ) -> bool {
        if let Some(current) = &self.room_id {
            if *current != room_id {
                warn!(%current, incoming = %room_id, "players_assigned for a different room, ignored");
                return false;
            }
        }

        info!(%room_id, ?player1, ?player2, "players assigned");
        self.room_id = Some(room_id);
        self.player1 = player1;
        self.player2 = player2;

        ui.set_participant_names(&self.display_name(Seat::Player1), &self.display_name(Seat::Player2));
        true
    }

    pub fn apply_result(&mut self, outcome: RoundOutcome, ui: &mut dyn UiNotifier) {
        let message = match outcome.winner() {
            Some(seat) => {
                match seat {
                    Seat::Player1 => self.score_player1 += 1,
                    Seat::Player2 => self.score_player2 += 1,
                }
                format!("{} won!", self.display_name(seat))
            }
            None => "It's a tie!".to_string(),
        };

        info!(?outcome, score1 = self.score_player1, score2 = self.score_player2, "round resolved");
        ui.set_scoreboard(self.score_player1, self.score_player2);
        ui.show_message(&message);
    }

    pub fn clear(&mut self, triggering_participant: &str, ui: &mut dyn UiNotifier) {
        info!(room_id = ?self.room_id, triggering_participant, "room closed");
        self.room_id = None;
        self.player1 = None;
        self.player2 = None;
        self.score_player1 = 0;
        self.score_player2 = 0;

        ui.set_scoreboard(0, 0);
        ui.show_message(ROOM_CLOSED_MESSAGE);
        ui.set_room_visible(false);
        ui.alert(&format!("{triggering_participant} left the room."));
    }

    /// Asks the server to close the room. Local state is left alone until the
    /// server echoes `room_closed`.
    pub fn leave(&self, acting_seat: Seat, transport: &dyn Transport) -> bool {
        let Some(room_id) = self.room_id.clone() else {
            warn!("leave requested outside of a room");
            return false;
        };

        info!(%room_id, seat = %acting_seat, "leaving room");
        if let Err(e) = transport.send(ClientMessage::LeaveRoom { seat: acting_seat, room_id }) {
            warn!("failed to send leave_room: {e}");
            return false;
        }
        true
    }

    /// Outbound payload for a choice made from `seat`
    pub fn submission(&self, seat: Seat, choice: Choice) -> Option<ClientMessage> {
        let room_id = self.room_id.clone()?;
        let player2 = if self.is_ai_opponent {
            AGENT_LABEL.to_string()
        } else {
            self.player2.clone().unwrap_or_default()
        };

        Some(ClientMessage::SubmitChoice {
            seat,
            player1: self.player1.clone().unwrap_or_default(),
            player2,
            choice,
            room_id,
        })
    }
}
