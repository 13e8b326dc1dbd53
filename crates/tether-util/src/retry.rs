//! Bounded retries with a fixed wait between attempts.

use std::thread;
use std::time::Duration;

/// How many times to attempt an operation and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub wait: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, wait: Duration) -> Self {
        Self { attempts, wait }
    }

    /// A policy that tries exactly once.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds or the attempts are exhausted.
    ///
    /// Only I/O errors are retried. The last error is returned when every
    /// attempt fails. A policy with zero attempts still runs `op` once.
    pub fn run<T>(
        &self,
        label: &str,
        mut op: impl FnMut() -> std::io::Result<T>,
    ) -> std::io::Result<T> {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "{label}: attempt {attempt}/{attempts} failed ({e}), retrying in {:?}",
                        self.wait
                    );
                    thread::sleep(self.wait);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(500))
    }
}
