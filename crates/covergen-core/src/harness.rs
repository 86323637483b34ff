//! Runs a test function over a covering sequence.
//!
//! Cases are taken from the sequence in chunks. In parallel mode each chunk
//! is decoded and tested with rayon `par_iter`; outcomes come back in
//! ordinal order, so a parallel run reports exactly what a sequential run
//! would.

use std::any::Any;
use std::fmt::{Debug, Display};
use std::panic::{catch_unwind, AssertUnwindSafe};

use covergen_explore::{CaseSpace, Identifiers};
use covergen_factory::{serialize, BigUint, FactoryError};
use num_traits::Zero;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, info_span, warn};

use crate::config::{FailurePolicy, HarnessConfig};
use crate::error::HarnessError;
use crate::report::{FailureRecord, RunReport, StopReason};

/// A failed test call: its message and the case it ran on.
struct Failure {
    message: String,
    case: String,
}

/// Result of decoding and testing one identifier.
struct Outcome {
    ordinal: u64,
    identifier: BigUint,
    verdict: Result<Option<Failure>, FactoryError>,
}

pub struct Harness<'a, T> {
    space: &'a CaseSpace<T>,
    config: HarnessConfig,
}

impl<'a, T: Debug> Harness<'a, T> {
    pub fn new(space: &'a CaseSpace<T>, config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { space, config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `test` on every case of the covering sequence.
    ///
    /// A panic inside `test` counts as a failure carrying the panic message.
    /// Under [`FailurePolicy::AbortOnFirst`] the first failure in emission
    /// order is returned as [`HarnessError::CaseFailed`].
    pub fn run<F, E>(&self, test: F) -> Result<RunReport, HarnessError>
    where
        F: Fn(&T) -> Result<(), E> + Sync,
        E: Display,
    {
        let options = self.config.covering_options();
        let span = info_span!(
            "harness_run",
            strength = options.strength,
            parallel = self.config.parallel
        );
        let _enter = span.enter();

        let mut identifiers = Identifiers::new(self.space.covering(&options)?);
        info!(cases = %identifiers.remaining(), "starting run");

        let pool = self.thread_pool()?;
        let batch_size = if self.config.parallel {
            self.config.chunk_size
        } else {
            1
        };

        let mut executed: u64 = 0;
        let mut failures: Vec<FailureRecord> = Vec::new();
        let stop_reason = 'run: loop {
            let mut take = batch_size;
            if let Some(max) = self.config.max_cases {
                let left = max.saturating_sub(executed);
                if left == 0 {
                    break if identifiers.remaining().is_zero() {
                        StopReason::Complete
                    } else {
                        StopReason::CaseLimitReached
                    };
                }
                take = take.min(usize::try_from(left).unwrap_or(usize::MAX));
            }

            let batch: Vec<(u64, BigUint)> = identifiers
                .by_ref()
                .take(take)
                .zip(executed..)
                .map(|(identifier, ordinal)| (ordinal, identifier))
                .collect();
            if batch.is_empty() {
                break StopReason::Complete;
            }

            for outcome in self.execute_batch(&batch, &test, pool.as_ref()) {
                executed += 1;
                let token = serialize(&outcome.identifier);
                let Some(failure) = outcome.verdict? else {
                    debug!(ordinal = outcome.ordinal, token = %token, "case passed");
                    continue;
                };

                warn!(
                    ordinal = outcome.ordinal,
                    token = %token,
                    message = %failure.message,
                    "case failed"
                );
                if self.config.failure_policy == FailurePolicy::AbortOnFirst {
                    return Err(HarnessError::CaseFailed {
                        ordinal: Some(outcome.ordinal),
                        token,
                        message: failure.message,
                    });
                }
                failures.push(FailureRecord {
                    ordinal: outcome.ordinal,
                    token,
                    message: failure.message,
                    case: failure.case,
                });
                if failures.len() >= self.config.max_failures as usize {
                    break 'run StopReason::FailureLimitReached;
                }
            }
        };

        info!(
            executed,
            failures = failures.len(),
            stop_reason = ?stop_reason,
            "run finished"
        );
        Ok(RunReport {
            executed,
            failures,
            stop_reason,
        })
    }

    /// Decode the case named by `token` and run `test` on it once.
    pub fn reproduce<F, E>(&self, token: &str, test: F) -> Result<(), HarnessError>
    where
        F: Fn(&T) -> Result<(), E>,
        E: Display,
    {
        let case = self.space.case_from_token(token)?;
        info!(token, case = ?case, "reproducing case");
        match check(&case, &test) {
            None => Ok(()),
            Some(failure) => {
                warn!(token, message = %failure.message, "reproduced failure");
                Err(HarnessError::CaseFailed {
                    ordinal: None,
                    token: token.to_string(),
                    message: failure.message,
                })
            }
        }
    }

    fn thread_pool(&self) -> Result<Option<ThreadPool>, HarnessError> {
        match (self.config.parallel, self.config.threads) {
            (true, Some(threads)) => ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map(Some)
                .map_err(|e| HarnessError::Config(e.to_string())),
            _ => Ok(None),
        }
    }

    fn execute_batch<F, E>(
        &self,
        batch: &[(u64, BigUint)],
        test: &F,
        pool: Option<&ThreadPool>,
    ) -> Vec<Outcome>
    where
        F: Fn(&T) -> Result<(), E> + Sync,
        E: Display,
    {
        if !self.config.parallel {
            return batch
                .iter()
                .map(|(ordinal, identifier)| self.execute(*ordinal, identifier, test))
                .collect();
        }

        let run = || {
            batch
                .par_iter()
                .map(|(ordinal, identifier)| self.execute(*ordinal, identifier, test))
                .collect::<Vec<_>>()
        };
        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn execute<F, E>(&self, ordinal: u64, identifier: &BigUint, test: &F) -> Outcome
    where
        F: Fn(&T) -> Result<(), E>,
        E: Display,
    {
        let verdict = self
            .space
            .case_at(identifier)
            .map(|case| check(&case, test));
        Outcome {
            ordinal,
            identifier: identifier.clone(),
            verdict,
        }
    }
}

fn check<T, F, E>(case: &T, test: &F) -> Option<Failure>
where
    T: Debug,
    F: Fn(&T) -> Result<(), E>,
    E: Display,
{
    let message = match catch_unwind(AssertUnwindSafe(|| test(case))) {
        Ok(Ok(())) => return None,
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };
    Some(Failure {
        message,
        case: format!("{case:?}"),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
