//! Single-shot notification lifecycle.
//!
//! `Idle -> Dispatched -> {Displayed | Clicked | TimedOut | Errored | ForcedExit}`.
//! Exactly one terminal state is reached per run; the forced exit fires
//! when the backend is still blocked after `timeout + grace`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use notify_presets::RenderPlan;

/// Grace margin added to the display timeout before a forced exit, used
/// when the request carries none.
pub const FORCED_EXIT_GRACE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Dispatched,
    /// Shown without waiting for interaction.
    Displayed,
    Clicked,
    /// Closed or expired before any click.
    TimedOut,
    Errored,
    ForcedExit,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::Dispatched)
    }

    /// Process exit code for a terminal state.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Errored => 1,
            _ => 0,
        }
    }

    fn can_follow(self, prev: LifecycleState) -> bool {
        match (prev, self) {
            (Self::Idle, Self::Dispatched) => true,
            (Self::Dispatched, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dispatched => "dispatched",
            Self::Displayed => "displayed",
            Self::Clicked => "clicked",
            Self::TimedOut => "timed-out",
            Self::Errored => "errored",
            Self::ForcedExit => "forced-exit",
        };
        f.write_str(name)
    }
}

/// What the OS reported back after a notification was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted; no interaction awaited.
    Shown,
    Clicked,
    /// Dismissed or expired.
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Native notification failed: {0}")]
    Native(String),
}

/// Blocking native notification call.
///
/// When `plan.wait` is set the call returns only once the user or the
/// notification service closes the notification.
pub trait NotificationBackend: Send + Sync + 'static {
    fn deliver(&self, plan: &RenderPlan) -> Result<Delivery, BackendError>;
}

/// Recorded transitions of one run.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    history: Vec<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            history: vec![LifecycleState::Idle],
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.history
            .last()
            .copied()
            .unwrap_or(LifecycleState::Idle)
    }

    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are ignored and return `false`.
    pub fn transition(&mut self, next: LifecycleState) -> bool {
        let current = self.state();
        if !next.can_follow(current) {
            tracing::warn!(%current, %next, "Ignoring illegal lifecycle transition");
            return false;
        }
        tracing::debug!(%current, %next, "Lifecycle transition");
        self.history.push(next);
        true
    }
}

/// Show `plan` through `backend` and drive the lifecycle to a terminal state.
pub async fn run_lifecycle(
    backend: Arc<dyn NotificationBackend>,
    plan: RenderPlan,
    grace: Duration,
) -> Lifecycle {
    let mut lifecycle = Lifecycle::new();
    let deadline = Duration::from_millis(plan.timeout_ms).saturating_add(grace);

    lifecycle.transition(LifecycleState::Dispatched);
    let task = tokio::task::spawn_blocking(move || backend.deliver(&plan));

    let terminal = match tokio::time::timeout(deadline, task).await {
        Ok(Ok(Ok(Delivery::Shown))) => LifecycleState::Displayed,
        Ok(Ok(Ok(Delivery::Clicked))) => LifecycleState::Clicked,
        Ok(Ok(Ok(Delivery::Closed))) => LifecycleState::TimedOut,
        Ok(Ok(Err(e))) => {
            tracing::error!("{e}");
            LifecycleState::Errored
        }
        Ok(Err(e)) => {
            tracing::error!("Notification task failed: {e}");
            LifecycleState::Errored
        }
        Err(_) => {
            tracing::warn!(
                deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                "No notification callback before deadline; forcing exit"
            );
            LifecycleState::ForcedExit
        }
    };
    lifecycle.transition(terminal);
    lifecycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_presets::{NotificationOptions, NotificationRequest};
    use std::sync::Mutex;

    struct Fake {
        outcome: fn() -> Result<Delivery, BackendError>,
        delay: Duration,
        seen: Mutex<Vec<String>>,
    }

    impl Fake {
        fn new(outcome: fn() -> Result<Delivery, BackendError>) -> Self {
            Self {
                outcome,
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl NotificationBackend for Fake {
        fn deliver(&self, plan: &RenderPlan) -> Result<Delivery, BackendError> {
            self.seen.lock().unwrap().push(plan.title.clone());
            std::thread::sleep(self.delay);
            (self.outcome)()
        }
    }

    fn plan(timeout_ms: u64) -> RenderPlan {
        RenderPlan::from_request(&NotificationRequest::new(
            "T",
            "M",
            NotificationOptions::new().with_timeout(timeout_ms),
        ))
    }

    #[tokio::test]
    async fn shown_notification_ends_displayed() {
        let backend = Arc::new(Fake::new(|| Ok(Delivery::Shown)));
        let lc = run_lifecycle(backend.clone(), plan(1000), FORCED_EXIT_GRACE).await;
        assert_eq!(
            lc.history(),
            [
                LifecycleState::Idle,
                LifecycleState::Dispatched,
                LifecycleState::Displayed
            ]
        );
        assert_eq!(lc.state().exit_code(), 0);
        assert_eq!(*backend.seen.lock().unwrap(), ["T"]);
    }

    #[tokio::test]
    async fn click_and_close_exit_zero() {
        let lc = run_lifecycle(
            Arc::new(Fake::new(|| Ok(Delivery::Clicked))),
            plan(1000),
            FORCED_EXIT_GRACE,
        )
        .await;
        assert_eq!(lc.state(), LifecycleState::Clicked);
        assert_eq!(lc.state().exit_code(), 0);

        let lc = run_lifecycle(
            Arc::new(Fake::new(|| Ok(Delivery::Closed))),
            plan(1000),
            FORCED_EXIT_GRACE,
        )
        .await;
        assert_eq!(lc.state(), LifecycleState::TimedOut);
        assert_eq!(lc.state().exit_code(), 0);
    }

    #[tokio::test]
    async fn native_error_exits_one() {
        let lc = run_lifecycle(
            Arc::new(Fake::new(|| Err(BackendError::Native("no daemon".into())))),
            plan(1000),
            FORCED_EXIT_GRACE,
        )
        .await;
        assert_eq!(lc.state(), LifecycleState::Errored);
        assert_eq!(lc.state().exit_code(), 1);
    }

    #[tokio::test]
    async fn hung_backend_is_force_exited() {
        let mut fake = Fake::new(|| Ok(Delivery::Clicked));
        fake.delay = Duration::from_millis(500);
        let lc = run_lifecycle(Arc::new(fake), plan(20), Duration::from_millis(20)).await;
        assert_eq!(lc.state(), LifecycleState::ForcedExit);
        assert_eq!(lc.state().exit_code(), 0);
        assert_eq!(lc.history().len(), 3);
    }

    #[test]
    fn only_one_terminal_state() {
        let mut lc = Lifecycle::new();
        assert!(!lc.transition(LifecycleState::Clicked));
        assert!(lc.transition(LifecycleState::Dispatched));
        assert!(lc.transition(LifecycleState::TimedOut));
        assert!(!lc.transition(LifecycleState::Clicked));
        assert_eq!(lc.state(), LifecycleState::TimedOut);
    }
}
