use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use interview_core::model::{PacingConfig, Phase, SessionId, StatusSnapshot};
use tracing::{debug, info};

use crate::Clock;

/// Mutable per-session state, guarded as a single unit.
#[derive(Debug, Default)]
struct SessionClock {
    session_id: Option<SessionId>,
    started_at: Option<DateTime<Utc>>,
    last_phase: Option<Phase>,
}

impl SessionClock {
    fn session_label(&self) -> String {
        self.session_id
            .map_or_else(|| "-".to_string(), |id| id.to_string())
    }
}

/// Tracks elapsed interview time and recommends pacing.
///
/// The only pacing state is the session start instant. Both operations are
/// total: `status` self-initializes the start instant if `mark_session_start`
/// was never called, and neither ever returns an error. The tracker is
/// `Send + Sync`; share it behind an `Arc` if several tasks drive one session.
#[derive(Debug)]
pub struct PacingTracker {
    clock: Clock,
    config: PacingConfig,
    state: Mutex<SessionClock>,
}

impl PacingTracker {
    /// Tracker on the system clock with the default 60 minute / 10 question config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PacingConfig::default())
    }

    #[must_use]
    pub fn with_config(config: PacingConfig) -> Self {
        Self {
            clock: Clock::default_clock(),
            config,
            state: Mutex::new(SessionClock::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Tag subsequent log lines with `session_id`.
    ///
    /// `InterviewSession` binds its own id when it takes the tracker.
    pub fn bind_session(&self, session_id: SessionId) {
        self.lock().session_id = Some(session_id);
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.lock().session_id
    }

    /// Start instant of the current session, if one has been recorded.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.lock().started_at
    }

    /// Record the session start as "now" according to the tracker clock.
    ///
    /// Calling this again restarts the session clock.
    pub fn mark_session_start(&self) {
        self.mark_session_start_at(self.clock.now());
    }

    /// Record the session start at an explicit instant.
    pub fn mark_session_start_at(&self, at: DateTime<Utc>) {
        let mut state = self.lock();
        let restarted = state.started_at.is_some();
        state.started_at = Some(at);
        state.last_phase = None;
        let session_id = state.session_label();
        drop(state);

        if restarted {
            info!(%session_id, started_at = %at, "interview clock restarted");
        } else {
            info!(%session_id, started_at = %at, "interview clock started");
        }
    }

    /// Current pacing snapshot according to the tracker clock.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.status_at(self.clock.now())
    }

    /// Pacing snapshot as observed at `now`.
    ///
    /// If no session start has been recorded, `now` becomes the start.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> StatusSnapshot {
        let mut state = self.lock();
        let started_at = *state.started_at.get_or_insert(now);
        let snapshot = StatusSnapshot::compute(&self.config, started_at, now);
        let previous = state.last_phase.replace(snapshot.phase());
        let session_id = state.session_label();
        drop(state);

        debug!(
            %session_id,
            elapsed_minutes = snapshot.elapsed_minutes(),
            remaining_minutes = snapshot.remaining_minutes(),
            phase = %snapshot.phase(),
            "pacing status"
        );
        if previous.is_some_and(|p| p != snapshot.phase()) {
            info!(
                %session_id,
                phase = %snapshot.phase(),
                urgency = %snapshot.urgency(),
                elapsed_minutes = snapshot.elapsed_minutes(),
                "interview entered new phase"
            );
        }

        snapshot
    }

    // A panic elsewhere must not make the tracker unusable.
    fn lock(&self) -> MutexGuard<'_, SessionClock> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PacingTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use interview_core::model::Urgency;
    use interview_core::time::fixed_now;

    fn tracker() -> PacingTracker {
        PacingTracker::new().with_clock(Clock::fixed(fixed_now()))
    }

    #[test]
    fn status_without_start_self_initializes() {
        let tracker = tracker();
        assert!(tracker.started_at().is_none());

        let status = tracker.status();
        assert_eq!(status.elapsed_minutes(), 0);
        assert_eq!(status.phase(), Phase::Introduction);
        assert_eq!(status.urgency(), Urgency::Relaxed);
        assert_eq!(tracker.started_at(), Some(fixed_now()));
    }

    #[test]
    fn self_initialized_start_is_kept_for_later_queries() {
        let tracker = tracker();
        let _ = tracker.status_at(fixed_now());
        let later = tracker.status_at(fixed_now() + Duration::minutes(20));
        assert_eq!(later.elapsed_minutes(), 20);
    }

    #[test]
    fn mark_session_start_uses_clock() {
        let tracker = tracker();
        tracker.mark_session_start();
        assert_eq!(tracker.started_at(), Some(fixed_now()));
        assert_eq!(tracker.status().current_time(), fixed_now());
    }

    #[test]
    fn restart_resets_elapsed_to_zero() {
        let tracker = tracker();
        let start = fixed_now();
        tracker.mark_session_start_at(start);
        let before = tracker.status_at(start + Duration::minutes(47));
        assert_eq!(before.phase(), Phase::WrappingUp);

        let restart = start + Duration::minutes(48);
        tracker.mark_session_start_at(restart);
        let after = tracker.status_at(restart);
        assert_eq!(after.elapsed_minutes(), 0);
        assert_eq!(after.phase(), Phase::Introduction);
    }

    #[test]
    fn repeated_queries_within_a_minute_agree() {
        let tracker = tracker();
        let start = fixed_now();
        tracker.mark_session_start_at(start);

        let a = tracker.status_at(start + Duration::seconds(20 * 60 + 5));
        let b = tracker.status_at(start + Duration::seconds(20 * 60 + 55));
        assert!(a.same_pacing(&b));
        assert_ne!(a.current_time(), b.current_time());
    }

    #[test]
    fn elapsed_and_phase_are_monotonic() {
        let tracker = tracker();
        let start = fixed_now();
        tracker.mark_session_start_at(start);

        let mut previous = tracker.status_at(start);
        for seconds in (30..=80 * 60).step_by(30) {
            let next = tracker.status_at(start + Duration::seconds(seconds));
            assert!(next.elapsed_minutes() >= previous.elapsed_minutes());
            assert!(next.phase().ordinal() >= previous.phase().ordinal());
            previous = next;
        }
        assert_eq!(previous.phase(), Phase::Conclusion);
        assert_eq!(previous.remaining_minutes(), 0);
    }

    #[test]
    fn custom_config_changes_boundaries() {
        let config = PacingConfig::new(20, 4).unwrap();
        let tracker = PacingTracker::with_config(config).with_clock(Clock::fixed(fixed_now()));
        let start = fixed_now();
        tracker.mark_session_start_at(start);

        assert_eq!(tracker.status_at(start + Duration::minutes(3)).phase(), Phase::MainQuestions);
        assert_eq!(tracker.status_at(start + Duration::minutes(15)).phase(), Phase::WrappingUp);
        assert_eq!(tracker.status_at(start + Duration::minutes(18)).phase(), Phase::Conclusion);
        assert_eq!(tracker.config().total_duration_minutes(), 20);
    }

    #[test]
    fn concurrent_callers_share_one_start() {
        use std::sync::Arc;
        use std::thread;

        let tracker = Arc::new(tracker());
        let start = fixed_now();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || tracker.status_at(start + Duration::seconds(i)))
            })
            .collect();
        for handle in handles {
            let status = handle.join().unwrap();
            assert_eq!(status.elapsed_minutes(), 0);
        }

        // Whichever thread got there first fixed the start; nobody overwrote it.
        let recorded = tracker.started_at().unwrap();
        assert!(recorded >= start && recorded <= start + Duration::seconds(7));
    }

    #[test]
    fn restart_racing_status_is_never_lost() {
        use std::sync::Arc;
        use std::thread;

        let tracker = Arc::new(tracker());
        let start = fixed_now();
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    for round in 0..50_i64 {
                        if (i + round) % 2 == 0 {
                            tracker.mark_session_start_at(start + Duration::minutes(i));
                        } else {
                            let _ = tracker.status_at(start + Duration::minutes(100));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let restart = start + Duration::minutes(200);
        tracker.mark_session_start_at(restart);
        assert_eq!(tracker.started_at(), Some(restart));
        assert!(tracker.lock().last_phase.is_none());

        let status = tracker.status_at(restart);
        assert_eq!(status.elapsed_minutes(), 0);
        assert_eq!(status.phase(), Phase::Introduction);
        assert_eq!(tracker.lock().last_phase, Some(Phase::Introduction));
    }

    #[test]
    fn status_logs_elapsed_remaining_and_phase() {
        use std::io;
        use std::sync::Arc;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let session_id = SessionId::new();
        let tracker = tracker();
        tracker.bind_session(session_id);
        let start = fixed_now();
        tracing::subscriber::with_default(subscriber, || {
            tracker.mark_session_start_at(start);
            let _ = tracker.status_at(start + Duration::minutes(20));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("pacing status"))
            .expect("status line logged");
        assert!(line.contains("elapsed_minutes=20"), "{line}");
        assert!(line.contains("remaining_minutes=40"), "{line}");
        assert!(line.contains("phase=main_questions"), "{line}");
        assert!(line.contains(&format!("session_id={session_id}")), "{line}");
    }
}
