//! Timed execution of health checks

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::check::HealthCheck;
use crate::clock::{Clock, SystemClock};
use crate::result::CheckResult;

/// Runs health checks, measuring how long each evaluation takes and
/// guaranteeing the caller always gets a [`CheckResult`] back.
///
/// An evaluation fault is caught here and reported as an unhealthy result;
/// it is never propagated to the runner's caller. The clock is an explicit
/// dependency so tests can inject a manual one.
#[derive(Debug, Clone)]
pub struct Runner {
    clock: Arc<dyn Clock>,
}

impl Runner {
    /// Creates a runner backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a runner backed by the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Executes one health check.
    ///
    /// The result, whether returned by the check or substituted for a
    /// fault, comes back with its duration stamped. The duration is
    /// measured from monotonic ticks, independent of the wall clock that
    /// stamps the result's creation time.
    pub fn execute(&self, check: &dyn HealthCheck) -> CheckResult {
        let start = self.clock.tick();
        let result = match check.check() {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "health check raised an error");
                CheckResult::unhealthy_fault(error, self.clock.as_ref())
            }
        };
        let elapsed = Duration::from_nanos(self.clock.tick().saturating_sub(start));
        let result = result.with_duration(elapsed);
        debug!(
            healthy = result.is_healthy(),
            duration_ms = elapsed.as_millis() as u64,
            "health check complete"
        );
        result
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use anyhow::bail;

    #[test]
    fn test_duration_is_measured_from_ticks() {
        let clock = Arc::new(ManualClock::at(1_000));
        let runner = Runner::with_clock(Arc::clone(&clock) as Arc<dyn Clock>);

        let check = move || -> anyhow::Result<CheckResult> {
            clock.advance_tick(5_000_000);
            Ok(CheckResult::healthy())
        };
        let result = runner.execute(&check);

        assert_eq!(result.duration(), Duration::from_millis(5));
    }

    #[test]
    fn test_fault_result_is_stamped_with_the_runner_clock() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::at(42_000));
        let runner = Runner::with_clock(Arc::clone(&clock) as Arc<dyn Clock>);

        let check = || -> anyhow::Result<CheckResult> { bail!("boom") };
        let result = runner.execute(&check);

        assert_eq!(result.time(), 42_000);
    }
}
