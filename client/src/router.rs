use rpsroom_common::{Choice, ClientMessage, RoomId, RoundOutcome, Seat, SeatChoices, ServerMessage};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::state::Session;
use crate::timer::Scheduler;
use crate::transport::Transport;
use crate::ui::UiNotifier;

pub const LEAVE_PROMPT: &str = "Are you sure you want to leave the room?";
pub const UNLOAD_WARNING: &str = "Are you sure you want to leave the game? The room will be closed.";

/// Translates server events and user actions into session mutations.
///
/// The router owns the collaborators; the [`Session`] is lent to every call.
pub struct EventRouter<T: Transport, U: UiNotifier, S: Scheduler> {
    transport: T,
    ui: U,
    scheduler: S,
    result_delay: Duration,
}

impl<T: Transport, U: UiNotifier, S: Scheduler> EventRouter<T, U, S> {
    pub fn new(transport: T, ui: U, scheduler: S, result_delay: Duration) -> Self {
        EventRouter { transport, ui, scheduler, result_delay }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Requests our room from the server, once per session
    pub fn start(&self) {
        self.send(ClientMessage::StartGame);
    }

    pub fn handle(&mut self, session: &mut Session, message: ServerMessage) {
        debug!(event = message.event_name(), phase = ?session.round.phase(), "inbound");

        match message {
            ServerMessage::Alert { message } => self.ui.alert(&message),
            ServerMessage::PlayersAssigned { room_id, player1, player2 } => {
                self.on_players_assigned(session, room_id, player1, player2)
            }
            ServerMessage::RoomReady => self.on_room_ready(session),
            ServerMessage::Waiting { waiting_participant } => {
                session.round.on_waiting(&waiting_participant, &mut self.ui)
            }
            ServerMessage::OpponentChoiceUpdated { choices } => self.on_opponent_choice(session, choices),
            ServerMessage::RoundResult { outcome } => self.on_round_result(session, outcome),
            ServerMessage::RoomClosed { triggering_participant } => {
                session.round.close(&mut self.ui);
                session.clear(&triggering_participant, &mut self.ui);
            }
        }
    }

    fn on_players_assigned(
        &mut self,
        session: &mut Session,
        room_id: RoomId,
        player1: Option<String>,
        player2: Option<String>,
    ) {
        if session.apply_player_info(room_id, player1, player2, &mut self.ui)
            && session.local_seat().is_none()
        {
            error!(
                local = session.local_identity(),
                player1 = ?session.player1,
                player2 = ?session.player2,
                "local identity occupies neither seat"
            );
        }
    }

    fn on_room_ready(&mut self, session: &mut Session) {
        if !session.in_room() {
            warn!("room_ready before any room was assigned, ignored");
            return;
        }

        let name1 = session.display_name(Seat::Player1);
        let name2 = session.display_name(Seat::Player2);
        session.round.on_room_ready(&name1, &name2, &mut self.ui);
    }

    fn on_opponent_choice(&mut self, session: &mut Session, choices: SeatChoices) {
        let Some(local_seat) = session.local_seat() else {
            error!("opponent_choice_updated without a local seat, ignored");
            return;
        };

        let opponent = local_seat.other();
        match choices.get(opponent) {
            Some(choice) => session.round.record_opponent_choice(opponent, choice, &mut self.ui),
            None => debug!(seat = %opponent, "opponent has not chosen yet"),
        }
    }

    fn on_round_result(&mut self, session: &mut Session, outcome: RoundOutcome) {
        if !session.round.on_result() {
            return;
        }

        session.apply_result(outcome, &mut self.ui);
        let scheduled = self.scheduler.schedule_reset(self.result_delay);
        session.round.arm_reset(scheduled);
    }

    /// Delivered by the host when a scheduled reset comes due
    pub fn on_reset_due(&mut self, session: &mut Session, ticket: u64) {
        if !session.in_room() {
            debug!(ticket, "reset due after the room closed, ignored");
            return;
        }
        session.round.on_reset_due(ticket, &mut self.ui);
    }

    /// User picked a hand. Returns true when a submission went out.
    pub fn submit_choice(&mut self, session: &mut Session, choice: Choice) -> bool {
        if !session.round.can_submit() {
            debug!(phase = ?session.round.phase(), ?choice, "choice ignored, round not open");
            return false;
        }

        let Some(seat) = session.local_seat() else {
            error!(local = session.local_identity(), "cannot submit, local identity occupies neither seat");
            return false;
        };
        let Some(submission) = session.submission(seat, choice) else {
            warn!("cannot submit outside of a room");
            return false;
        };

        if !session.round.begin_submission(seat, choice, &mut self.ui) {
            return false;
        }

        info!(%seat, ?choice, "submitting choice");
        self.send(submission);
        true
    }

    /// User asked to leave; returns true when the request was sent
    pub fn request_leave(&mut self, session: &mut Session) -> bool {
        if !session.in_room() {
            debug!("leave ignored, not in a room");
            return false;
        }

        if !self.ui.confirm(LEAVE_PROMPT) {
            debug!("leave cancelled by user");
            return false;
        }

        self.leave_local_seat(session)
    }

    /// Warning for the host's exit confirmation while a room is active
    pub fn before_unload(&self, session: &Session) -> Option<&'static str> {
        session.in_room().then_some(UNLOAD_WARNING)
    }

    /// Host is going away: release our seat if we hold one
    pub fn on_unload(&mut self, session: &mut Session) {
        if session.in_room() {
            self.leave_local_seat(session);
        }
    }

    fn leave_local_seat(&self, session: &Session) -> bool {
        match session.local_seat() {
            Some(seat) => session.leave(seat, &self.transport),
            None => {
                error!(local = session.local_identity(), "cannot leave, local identity occupies neither seat");
                false
            }
        }
    }

    fn send(&self, message: ClientMessage) {
        debug!(?message, "outbound");
        if let Err(e) = self.transport.send(message) {
            warn!("send failed: {e}");
        }
    }
}
