use rpsroom_common::{Choice, Seat};
use tracing::{debug, warn};

use crate::timer::ScheduledReset;
use crate::ui::UiNotifier;

pub const NEW_ROUND_MESSAGE: &str = "Select your new move";

/// Lifecycle of the live round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingOpponent,
    ChoiceOpen,
    AwaitingResult,
    ResultShown,
}

/// Round coordinator: owns the phase and both choice slots.
///
/// The two slots are filled independently and never advance the phase on
/// their own. Only the server's result does, since adjudication is remote.
#[derive(Debug, Default)]
pub struct Round {
    phase: Phase,
    local_choice: Option<Choice>,
    opponent_choice: Option<Choice>,
    pending_reset: Option<ScheduledReset>,
}

impl Round {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn local_choice(&self) -> Option<Choice> {
        self.local_choice
    }

    pub fn opponent_choice(&self) -> Option<Choice> {
        self.opponent_choice
    }

    /// One seat is in the room, the other has not joined (or not chosen yet)
    pub fn on_waiting(&mut self, participant: &str, ui: &mut dyn UiNotifier) {
        match self.phase {
            Phase::Idle | Phase::AwaitingOpponent => self.phase = Phase::AwaitingOpponent,
            phase => debug!(?phase, "waiting notice during a round, message only"),
        }
        ui.show_message(&format!("{participant} is waiting..."));
    }

    /// Opens the first round. Returns false when the event is out of sequence.
    pub fn on_room_ready(&mut self, name1: &str, name2: &str, ui: &mut dyn UiNotifier) -> bool {
        if !matches!(self.phase, Phase::Idle | Phase::AwaitingOpponent) {
            warn!(phase = ?self.phase, "room_ready outside of the waiting phases, ignored");
            return false;
        }

        self.phase = Phase::ChoiceOpen;
        ui.set_participant_names(name1, name2);
        ui.set_room_visible(true);
        ui.set_choice_affordances_visible(true);
        ui.show_message(&format!("Game Started! {name1} VS {name2}"));
        true
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::ChoiceOpen && self.local_choice.is_none()
    }

    /// Records the local choice and closes the affordances.
    /// The caller transmits the submission only when this returns true.
    pub fn begin_submission(&mut self, seat: Seat, choice: Choice, ui: &mut dyn UiNotifier) -> bool {
        if !self.can_submit() {
            debug!(phase = ?self.phase, ?choice, "submission rejected locally");
            return false;
        }

        self.local_choice = Some(choice);
        self.phase = Phase::AwaitingResult;
        ui.set_seat_choice_glyph(seat, Some(choice));
        ui.set_choice_affordances_visible(false);
        true
    }

    pub fn record_opponent_choice(&mut self, seat: Seat, choice: Choice, ui: &mut dyn UiNotifier) {
        self.opponent_choice = Some(choice);
        ui.set_seat_choice_glyph(seat, Some(choice));
    }

    /// Enters result display. Returns false when no round is open.
    pub fn on_result(&mut self) -> bool {
        if !matches!(self.phase, Phase::ChoiceOpen | Phase::AwaitingResult) {
            warn!(phase = ?self.phase, "round_result with no open round, ignored");
            return false;
        }

        self.phase = Phase::ResultShown;
        true
    }

    pub fn arm_reset(&mut self, scheduled: ScheduledReset) {
        if let Some(previous) = self.pending_reset.replace(scheduled) {
            previous.cancel();
        }
    }

    /// Deferred end of result display: back to a neutral board, next round open.
    /// A stale or cancelled ticket leaves everything untouched.
    pub fn on_reset_due(&mut self, ticket: u64, ui: &mut dyn UiNotifier) -> bool {
        match &self.pending_reset {
            Some(pending) if pending.ticket == ticket && !pending.is_cancelled() => {}
            _ => {
                debug!(ticket, "reset timer is stale, nothing to do");
                return false;
            }
        }

        self.pending_reset = None;
        self.local_choice = None;
        self.opponent_choice = None;
        self.phase = Phase::ChoiceOpen;

        ui.set_seat_choice_glyph(Seat::Player1, None);
        ui.set_seat_choice_glyph(Seat::Player2, None);
        ui.set_choice_affordances_visible(true);
        ui.show_message(NEW_ROUND_MESSAGE);
        true
    }

    /// Room is gone: drop everything and cancel the pending reset
    pub fn close(&mut self, ui: &mut dyn UiNotifier) {
        if let Some(pending) = self.pending_reset.take() {
            pending.cancel();
        }

        self.phase = Phase::Idle;
        self.local_choice = None;
        self.opponent_choice = None;

        ui.set_seat_choice_glyph(Seat::Player1, None);
        ui.set_seat_choice_glyph(Seat::Player2, None);
        ui.set_choice_affordances_visible(false);
    }
}
