//! The health check result value and its builder

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use indexmap::IndexMap;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};

/// Label used for the nested detail group unless a builder overrides it
const DEFAULT_NESTED_DETAILS_NAME: &str = "details";

/// Pattern for rendered timestamps: ISO-8601 with millisecond precision
/// and a numeric UTC offset
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// The outcome of a single health check evaluation.
///
/// A result is healthy (with an optional message and optional details) or
/// unhealthy (with a message, an optional error, and optional details). It
/// is an immutable snapshot: every field is fixed at construction, except
/// that the runner stamps the elapsed duration onto it exactly once via
/// [`CheckResult::with_duration`] before handing it to anyone else.
#[derive(Debug, Clone)]
pub struct CheckResult {
    healthy: bool,
    message: Option<String>,
    error: Option<Arc<anyhow::Error>>,
    details: Option<IndexMap<String, Value>>,
    nested_details_name: String,
    nested_details: Option<IndexMap<String, Value>>,
    time: i64,
    duration: Duration,
}

impl CheckResult {
    /// Returns a healthy result with no message and no details
    pub fn healthy() -> Self {
        Self::new(true, None, None, &SystemClock)
    }

    /// Returns a healthy result with an informative message.
    ///
    /// For formatted messages, build the string at the call site with
    /// `format!`; argument mismatches are then caught at compile time.
    pub fn healthy_with_message(message: impl Into<String>) -> Self {
        Self::new(true, Some(message.into()), None, &SystemClock)
    }

    /// Returns an unhealthy result with a message describing the failure
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(false, Some(message.into()), None, &SystemClock)
    }

    /// Returns an unhealthy result carrying an error raised during the
    /// check. The message defaults to the error's own description.
    pub fn unhealthy_from(error: anyhow::Error) -> Self {
        Self::unhealthy_fault(error, &SystemClock)
    }

    /// Returns a new [`ResultBuilder`] in its default state
    pub fn builder() -> ResultBuilder {
        ResultBuilder::default()
    }

    pub(crate) fn unhealthy_fault(error: anyhow::Error, clock: &dyn Clock) -> Self {
        let message = Some(error.to_string());
        Self::new(false, message, Some(Arc::new(error)), clock)
    }

    fn new(
        healthy: bool,
        message: Option<String>,
        error: Option<Arc<anyhow::Error>>,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            healthy,
            message,
            error,
            details: None,
            nested_details_name: DEFAULT_NESTED_DETAILS_NAME.to_string(),
            nested_details: None,
            time: clock.wall_time(),
            duration: Duration::ZERO,
        }
    }

    /// Returns true if the checked component is healthy
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Returns the message attached to this result, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the error raised by the check, if the evaluation itself
    /// failed. Absent for results that are unhealthy by explicit verdict.
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_deref()
    }

    /// Returns the creation time in milliseconds since the Unix epoch
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Returns the creation time as a formatted string.
    ///
    /// The stored instant is rendered in the local system time zone at the
    /// moment of rendering, not the zone in effect when the result was
    /// created; only the instant itself is persisted. Out-of-range epoch
    /// values render as the raw millisecond count.
    pub fn timestamp(&self) -> String {
        match chrono::DateTime::from_timestamp_millis(self.time) {
            Some(utc) => utc
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            None => self.time.to_string(),
        }
    }

    /// Returns how long the check took to run.
    ///
    /// Zero until the runner has stamped the measured elapsed time.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns this result with the given elapsed duration stamped on it.
    ///
    /// Called exactly once, by the runner, before the result is published.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns the top-level diagnostic details, if any. An absent map is
    /// distinct from an empty one.
    pub fn details(&self) -> Option<&IndexMap<String, Value>> {
        self.details.as_ref()
    }

    /// Returns the label under which nested details are reported
    pub fn nested_details_name(&self) -> &str {
        &self.nested_details_name
    }

    /// Returns the nested diagnostic details, if any
    pub fn nested_details(&self) -> Option<&IndexMap<String, Value>> {
        self.nested_details.as_ref()
    }

    // anyhow::Error has no structural equality, so errors take part in
    // identity through their rendered description.
    fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Identity covers the verdict, message, error, and creation time only.
/// Details and duration are diagnostic payload and deliberately excluded,
/// so equality stays stable however much context a check attaches.
impl PartialEq for CheckResult {
    fn eq(&self, other: &Self) -> bool {
        self.healthy == other.healthy
            && self.message == other.message
            && self.error_text() == other.error_text()
            && self.time == other.time
    }
}

impl Eq for CheckResult {}

impl Hash for CheckResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.healthy.hash(state);
        self.message.hash(state);
        self.error_text().hash(state);
        self.time.hash(state);
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckResult{{healthy={}", self.healthy)?;
        if let Some(message) = &self.message {
            write!(f, ", message={message}")?;
        }
        if let Some(error) = &self.error {
            write!(f, ", error={error}")?;
        }
        write!(f, ", duration={}", self.duration.as_millis())?;
        write!(f, ", timestamp={}", self.timestamp())?;
        write_details(f, self.details.as_ref(), "")?;
        write_details(
            f,
            self.nested_details.as_ref(),
            &format!("{}.", self.nested_details_name),
        )?;
        write!(f, "}}")
    }
}

fn write_details(
    f: &mut fmt::Formatter<'_>,
    details: Option<&IndexMap<String, Value>>,
    prefix: &str,
) -> fmt::Result {
    let Some(details) = details else {
        return Ok(());
    };
    for (key, value) in details {
        // Strings render bare, without JSON quoting
        match value {
            Value::String(s) => write!(f, ", {prefix}{key}={s}")?,
            other => write!(f, ", {prefix}{key}={other}")?,
        }
    }
    Ok(())
}

/// A builder for [`CheckResult`].
///
/// Starts healthy with empty detail maps and the system clock. Each call to
/// [`ResultBuilder::build`] snapshots the current state into a fresh
/// immutable result, so the builder stays usable afterwards.
#[derive(Debug)]
pub struct ResultBuilder {
    healthy: bool,
    message: Option<String>,
    error: Option<Arc<anyhow::Error>>,
    details: IndexMap<String, Value>,
    nested_details_name: String,
    nested_details: IndexMap<String, Value>,
    clock: Arc<dyn Clock>,
}

impl Default for ResultBuilder {
    fn default() -> Self {
        Self {
            healthy: true,
            message: None,
            error: None,
            details: IndexMap::new(),
            nested_details_name: DEFAULT_NESTED_DETAILS_NAME.to_string(),
            nested_details: IndexMap::new(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl ResultBuilder {
    /// Creates a builder in its default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the verdict to healthy
    pub fn healthy(mut self) -> Self {
        self.healthy = true;
        self
    }

    /// Sets the verdict to unhealthy
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Sets the verdict to unhealthy and stores the given error. The
    /// message is set to the error's description; a later
    /// [`ResultBuilder::with_message`] overrides it.
    pub fn with_error(mut self, error: anyhow::Error) -> Self {
        self.message = Some(error.to_string());
        self.error = Some(Arc::new(error));
        self.unhealthy()
    }

    /// Sets the message. Use `format!` at the call site for formatted
    /// messages.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a top-level detail. New keys keep their insertion order;
    /// writing an existing key replaces its value in place.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Sets the label under which nested details are reported
    pub fn with_nested_details_name(mut self, name: impl Into<String>) -> Self {
        self.nested_details_name = name.into();
        self
    }

    /// Adds a nested detail
    pub fn with_nested_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.nested_details.insert(key.into(), value.into());
        self
    }

    /// Uses the given clock to stamp the result's creation time, instead
    /// of the system clock. Useful for deterministic tests.
    pub fn using_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshots the builder's current state into an immutable result.
    ///
    /// The detail maps are copied, so mutating the builder afterwards
    /// cannot leak into a result that was already built.
    pub fn build(&self) -> CheckResult {
        CheckResult {
            healthy: self.healthy,
            message: self.message.clone(),
            error: self.error.clone(),
            details: Some(self.details.clone()),
            nested_details_name: self.nested_details_name.clone(),
            nested_details: Some(self.nested_details.clone()),
            time: self.clock.wall_time(),
            duration: Duration::ZERO,
        }
    }
}
