use std::sync::{Arc, Mutex};
use std::time::Duration;

use services::{AdvanceOutcome, AdvanceToken, QuizSession};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Delay before a correctly answered question moves on by itself.
pub const DEFAULT_AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoAdvancePolicy {
    delay: Duration,
    enabled: bool,
}

impl Default for AutoAdvancePolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_AUTO_ADVANCE_DELAY,
            enabled: true,
        }
    }
}

impl AutoAdvancePolicy {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// At most one pending delayed advance.
///
/// The task only advances if the session is still in the state the token was
/// issued for, so manual navigation in the meantime turns it into a no-op.
/// Pending work is aborted on reschedule, on `cancel` and on drop.
pub struct AutoAdvance {
    policy: AutoAdvancePolicy,
    pending: Option<JoinHandle<()>>,
    events: Option<UnboundedSender<AdvanceOutcome>>,
}

impl AutoAdvance {
    #[must_use]
    pub fn new(policy: AutoAdvancePolicy) -> Self {
        Self {
            policy,
            pending: None,
            events: None,
        }
    }

    /// Report every timer-driven advance on `events`.
    #[must_use]
    pub fn with_events(mut self, events: UnboundedSender<AdvanceOutcome>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn policy(&self) -> AutoAdvancePolicy {
        self.policy
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, session: Arc<Mutex<QuizSession>>, token: AdvanceToken) {
        self.cancel();
        if !self.policy.enabled {
            return;
        }

        let delay = self.policy.delay;
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = match session.lock() {
                Ok(mut guard) => guard.advance_if(token),
                Err(err) => {
                    tracing::warn!(error = %err, "auto-advance skipped: session lock poisoned");
                    return;
                }
            };
            if let (Some(outcome), Some(events)) = (outcome, events) {
                // The receiver may already be gone when the quiz screen closed.
                let _ = events.send(outcome);
            }
        }));
        tracing::debug!(delay_ms = delay.as_millis(), "auto-advance scheduled");
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.cancel();
    }
}
