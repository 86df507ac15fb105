//! Periodic trigger for catalog reconciliation.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};

use super::is_run_in_progress;
use crate::domain::ports::MovieSyncCommand;
use crate::domain::{SyncReport, TraceId};

/// Background schedule that runs a sync every `period`.
///
/// The first run happens one period after the schedule starts. A tick that
/// finds a run already in progress is logged and skipped.
pub struct SyncSchedule {
    sync: Arc<dyn MovieSyncCommand>,
    period: Duration,
}

impl SyncSchedule {
    /// Build a schedule, or `None` when `period` is zero (disabled).
    pub fn new(sync: Arc<dyn MovieSyncCommand>, period: Duration) -> Option<Self> {
        (!period.is_zero()).then_some(Self { sync, period })
    }

    /// Interval between runs.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one sync inside its own trace scope and log the outcome.
    pub async fn run_once(&self) -> Option<SyncReport> {
        let trace_id = TraceId::generate();
        TraceId::scope(trace_id, async {
            match self.sync.sync_all().await {
                Ok(report) => Some(report),
                Err(err) if is_run_in_progress(&err) => {
                    info!(%trace_id, "scheduled movie sync skipped: run in progress");
                    None
                }
                Err(err) => {
                    warn!(%trace_id, error = %err, "scheduled movie sync failed");
                    None
                }
            }
        })
        .await
    }

    /// Drive the schedule on the current Tokio runtime until aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let Some(start) = Instant::now().checked_add(self.period) else {
                warn!(period_secs = self.period.as_secs(), "movie sync period out of range");
                return;
            };
            let mut ticker = interval_at(start, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(period_secs = self.period.as_secs(), "movie sync schedule started");
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Error;
    use crate::domain::movie_sync::run_in_progress_error;
    use crate::domain::ports::MockMovieSyncCommand;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    fn zero_period_disables_the_schedule() {
        let sync = Arc::new(MockMovieSyncCommand::new());
        assert!(SyncSchedule::new(sync, Duration::ZERO).is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn run_once_executes_inside_a_trace_scope() {
        let mut sync = MockMovieSyncCommand::new();
        sync.expect_sync_all().times(1).returning(|| {
            assert!(TraceId::current().is_some(), "scheduled runs carry a trace id");
            Ok(SyncReport {
                fetched: 6,
                unchanged: 6,
                ..SyncReport::default()
            })
        });
        let schedule =
            SyncSchedule::new(Arc::new(sync), Duration::from_secs(60)).expect("enabled");

        let report = schedule.run_once().await.expect("run succeeds");

        assert_eq!(report.unchanged, 6);
    }

    #[rstest]
    #[case(run_in_progress_error())]
    #[case(Error::conflict("movie already exists: A New Hope by George Lucas"))]
    #[case(Error::service_unavailable("film feed unavailable"))]
    #[tokio::test]
    async fn failed_runs_are_swallowed(#[case] failure: Error) {
        let mut sync = MockMovieSyncCommand::new();
        sync.expect_sync_all().return_once(move || Err(failure));
        let schedule =
            SyncSchedule::new(Arc::new(sync), Duration::from_secs(60)).expect("enabled");

        assert!(schedule.run_once().await.is_none());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn spawned_schedule_waits_one_period_before_the_first_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut sync = MockMovieSyncCommand::new();
        sync.expect_sync_all().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(SyncReport::default())
        });
        let handle = SyncSchedule::new(Arc::new(sync), Duration::from_secs(30))
            .expect("enabled")
            .spawn();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        handle.abort();
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn unreachable_first_tick_stops_the_schedule() {
        let mut sync = MockMovieSyncCommand::new();
        sync.expect_sync_all().never();
        let handle = SyncSchedule::new(Arc::new(sync), Duration::MAX)
            .expect("enabled")
            .spawn();

        handle.await.expect("schedule task exits cleanly");
    }
}
