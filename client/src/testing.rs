//! Recording collaborators for router and state tests.

use rpsroom_common::{Choice, ClientMessage, Seat};
use std::cell::RefCell;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::timer::{ScheduledReset, Scheduler};
use crate::transport::Transport;
use crate::ui::UiNotifier;

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: RefCell<Vec<ClientMessage>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<ClientMessage> {
        self.sent.borrow().clone()
    }

    pub fn submissions(&self) -> Vec<ClientMessage> {
        self.sent()
            .into_iter()
            .filter(|msg| matches!(msg, ClientMessage::SubmitChoice { .. }))
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        if self.fail {
            return Err(ClientError::NotConnected);
        }
        self.sent.borrow_mut().push(message);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    Message(String),
    Alert(String),
    Glyph(Seat, Option<Choice>),
    Scoreboard(u32, u32),
    Names(String, String),
    RoomVisible(bool),
    ChoicesVisible(bool),
    Confirm(String),
}

pub struct RecordingUi {
    pub calls: Vec<UiCall>,
    pub confirm_answer: bool,
}

impl Default for RecordingUi {
    fn default() -> Self {
        RecordingUi { calls: Vec::new(), confirm_answer: true }
    }
}

impl RecordingUi {
    pub fn last_message(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_glyph(&self, seat: Seat) -> Option<Option<Choice>> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::Glyph(s, choice) if *s == seat => Some(*choice),
            _ => None,
        })
    }

    pub fn last_choices_visible(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::ChoicesVisible(visible) => Some(*visible),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Alert(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl UiNotifier for RecordingUi {
    fn show_message(&mut self, text: &str) {
        self.calls.push(UiCall::Message(text.to_string()));
    }

    fn alert(&mut self, text: &str) {
        self.calls.push(UiCall::Alert(text.to_string()));
    }

    fn set_seat_choice_glyph(&mut self, seat: Seat, choice: Option<Choice>) {
        self.calls.push(UiCall::Glyph(seat, choice));
    }

    fn set_scoreboard(&mut self, score_player1: u32, score_player2: u32) {
        self.calls.push(UiCall::Scoreboard(score_player1, score_player2));
    }

    fn set_participant_names(&mut self, name1: &str, name2: &str) {
        self.calls.push(UiCall::Names(name1.to_string(), name2.to_string()));
    }

    fn set_room_visible(&mut self, visible: bool) {
        self.calls.push(UiCall::RoomVisible(visible));
    }

    fn set_choice_affordances_visible(&mut self, visible: bool) {
        self.calls.push(UiCall::ChoicesVisible(visible));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.calls.push(UiCall::Confirm(prompt.to_string()));
        self.confirm_answer
    }
}

/// Hands out tokens without timing anything; tests fire resets themselves
#[derive(Default)]
pub struct ManualScheduler {
    pub scheduled: Vec<(Duration, ScheduledReset)>,
}

impl ManualScheduler {
    pub fn last(&self) -> Option<&ScheduledReset> {
        self.scheduled.last().map(|(_, scheduled)| scheduled)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_reset(&mut self, delay: Duration) -> ScheduledReset {
        let scheduled = ScheduledReset {
            ticket: self.scheduled.len() as u64 + 1,
            token: CancellationToken::new(),
        };
        self.scheduled.push((delay, scheduled.clone()));
        scheduled
    }
}
