//! Device readiness polling
//!
//! A mount point such as `/sdcard` can exist but stay empty until the
//! device finishes mounting it. The poller waits for any output from a
//! listing of the path, not for mere existence.

use crate::device::adb::Adb;
use crate::error::{KilnError, KilnResult};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// State of a wait on a device path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Deadline not reached, path still empty
    Waiting,
    /// The path listed non-empty output
    Ready,
    /// The deadline passed before the path became ready
    TimedOut,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Ready => write!(f, "ready"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Shortest delay between checks; keeps a zero interval from spinning on `ls`
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Waits, with a deadline, for a device directory to become non-empty
#[derive(Clone)]
pub struct ReadinessPoller {
    adb: Adb,
    timeout: Duration,
    interval: Duration,
}

impl ReadinessPoller {
    /// Create a poller with the overall `timeout` and the delay between checks.
    ///
    /// The interval is raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub fn new(adb: Adb, timeout: Duration, interval: Duration) -> Self {
        Self {
            adb,
            timeout,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    /// Same poller with a different overall timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overall timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay between checks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll until `path_arg` lists non-empty output or the deadline passes.
    ///
    /// Returns [`PollState::Ready`] or [`PollState::TimedOut`]. Launch
    /// failures of the bridge itself are returned as errors.
    pub async fn poll(&self, path_arg: &str) -> KilnResult<PollState> {
        let deadline = Instant::now() + self.timeout;
        let mut state = PollState::Waiting;
        let mut attempts = 0u32;

        while state == PollState::Waiting {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                state = PollState::TimedOut;
                break;
            }

            attempts += 1;
            match self.adb.ls(path_arg, Some(remaining)).await {
                Ok(output) if !output.lines.is_empty() => state = PollState::Ready,
                Ok(_) => {
                    warn!("Waiting on {} to be mounted", path_arg);
                    tokio::time::sleep(self.interval).await;
                }
                Err(KilnError::CommandTimeout { .. }) => state = PollState::TimedOut,
                Err(e) => return Err(e),
            }
        }

        debug!("{} is {} after {} check(s)", path_arg, state, attempts);
        Ok(state)
    }

    /// Wait for `path_arg` to become non-empty, failing on timeout
    pub async fn wait_for_non_empty_directory(&self, path_arg: &str) -> KilnResult<()> {
        match self.poll(path_arg).await? {
            PollState::Ready => Ok(()),
            _ => Err(KilnError::DeviceTimeout {
                path: path_arg.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}
