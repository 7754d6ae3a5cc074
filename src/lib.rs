//! Health check core: a data model and execution wrapper for reporting
//! the health of an application component.
//!
//! A check is a single-shot evaluation that produces an immutable
//! [`CheckResult`] describing success or failure, optional diagnostic
//! details, and timing. The [`Runner`] wraps an evaluation, measures how
//! long it took, and converts an unexpected error into an unhealthy result
//! rather than letting it escape; its caller always receives a result.
//!
//! Registries, reporters, and schedulers are collaborators that consume
//! [`CheckResult`] values through its accessors; none of that lives here.
//!
//! # Example
//!
//! ```
//! use checkup::{CheckResult, HealthCheck, Runner};
//!
//! struct DiskSpaceCheck {
//!     free_bytes: u64,
//! }
//!
//! impl HealthCheck for DiskSpaceCheck {
//!     fn check(&self) -> anyhow::Result<CheckResult> {
//!         if self.free_bytes > 0 {
//!             Ok(CheckResult::healthy())
//!         } else {
//!             Ok(CheckResult::unhealthy("disk full"))
//!         }
//!     }
//! }
//!
//! let result = Runner::new().execute(&DiskSpaceCheck { free_bytes: 512 });
//! assert!(result.is_healthy());
//! ```

pub mod check;
pub mod clock;
pub mod result;
pub mod runner;

pub use check::HealthCheck;
pub use clock::{Clock, ManualClock, SystemClock};
pub use result::{CheckResult, ResultBuilder};
pub use runner::Runner;
