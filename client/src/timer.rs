use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a pending one-shot reset
#[derive(Debug, Clone)]
pub struct ScheduledReset {
    pub ticket: u64,
    pub token: CancellationToken,
}

impl ScheduledReset {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Schedules the deferred end-of-round reset.
///
/// When the delay elapses the implementation reports the ticket back to the
/// host, which hands it to the router. Cancelling the token suppresses that.
pub trait Scheduler {
    fn schedule_reset(&mut self, delay: Duration) -> ScheduledReset;
}

/// Runs each reset as a spawned sleep and reports due tickets on a channel
pub struct TokioScheduler {
    due_tx: mpsc::UnboundedSender<u64>,
    next_ticket: u64,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (due_tx, due_rx) = mpsc::unbounded_channel();
        (TokioScheduler { due_tx, next_ticket: 0 }, due_rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_reset(&mut self, delay: Duration) -> ScheduledReset {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let token = CancellationToken::new();

        let cancelled = token.clone();
        let due_tx = self.due_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let _ = due_tx.send(ticket);
                }
                _ = cancelled.cancelled() => {
                    debug!(ticket, "reset timer cancelled");
                }
            }
        });

        ScheduledReset { ticket, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reset_fires_after_delay() {
        let (mut scheduler, mut due_rx) = TokioScheduler::new();
        let scheduled = scheduler.schedule_reset(Duration::from_secs(3));

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(due_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(due_rx.recv().await, Some(scheduled.ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reset_never_fires() {
        let (mut scheduler, mut due_rx) = TokioScheduler::new();
        let scheduled = scheduler.schedule_reset(Duration::from_secs(3));
        scheduled.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(due_rx.try_recv().is_err());
        assert!(scheduled.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tickets_are_distinct() {
        let (mut scheduler, _due_rx) = TokioScheduler::new();
        let first = scheduler.schedule_reset(Duration::from_secs(1));
        let second = scheduler.schedule_reset(Duration::from_secs(1));
        assert_ne!(first.ticket, second.ticket);
    }
}
