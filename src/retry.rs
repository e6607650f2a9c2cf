//! Bounded retry wrapper for whole scenario invocations.
//!
//! Geofence delivery is flaky end to end, so the harness re-executes a
//! failed scenario a bounded number of times. The budget wraps the whole
//! scenario, never individual polls or trigger strategies — those have
//! their own fallback behavior. State lives in the call, so concurrent
//! scenarios retry independently.

use std::fmt::Display;

use tracing::info;

/// Allows up to `max_retries` re-executions after an initial failure.
pub struct RetryBudget {
    max_retries: u32,
}

impl RetryBudget {
    /// Creates a budget permitting the given number of re-executions.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Runs the operation, retrying on failure until the budget is spent.
    ///
    /// The closure receives the attempt number, starting at 0 for the
    /// initial execution. The last error is returned once the budget is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns the final attempt's error when every execution failed.
    pub fn run<T, E: Display>(
        &self,
        name: &str,
        mut operation: impl FnMut(u32) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut attempt = 0;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_retries {
                        return Err(error);
                    }
                    attempt += 1;
                    info!(
                        scenario = name,
                        %error,
                        "retrying - attempt {attempt}/{}",
                        self.max_retries
                    );
                }
            }
        }
    }
}
