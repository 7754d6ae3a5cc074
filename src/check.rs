//! The health check extension point

use crate::result::CheckResult;

/// A health check for one component of an application.
///
/// Implementors supply the evaluation logic. A check reports trouble in one
/// of two ways, and the two are never conflated:
///
/// - returning `Ok(CheckResult::unhealthy(..))`: the component is genuinely
///   unhealthy, a routine business outcome;
/// - returning `Err`: the check logic itself malfunctioned, an evaluation
///   fault the [`Runner`](crate::runner::Runner) converts into an unhealthy
///   result carrying the error.
pub trait HealthCheck {
    /// Performs one evaluation of the component
    fn check(&self) -> anyhow::Result<CheckResult>;
}

/// Plain closures work as checks
impl<F> HealthCheck for F
where
    F: Fn() -> anyhow::Result<CheckResult>,
{
    fn check(&self) -> anyhow::Result<CheckResult> {
        self()
    }
}
