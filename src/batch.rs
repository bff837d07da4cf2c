//! Batch retrieval of many codes with bounded concurrency.
//!
//! Each code is fetched independently. Results come back in input order,
//! one `Result` per code, so a failing item never hides the others.

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use log::debug;
use serde_json::Value;
use std::num::NonZeroUsize;

use crate::code::{Icd11Code, json_type_name};
use crate::error::{IcdError, Result};

/// Looks up a single code. Implemented by the client for each endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchCode: Send + Sync {
    async fn fetch(&self, code: &Icd11Code) -> Result<Value>;
}

/// Upper bound on fetches in flight during a batch. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    pub const ONE: WorkerCount = WorkerCount(NonZeroUsize::MIN);

    pub fn new(count: i64) -> Result<Self> {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(WorkerCount)
            .ok_or_else(|| {
                IcdError::configuration(format!(
                    "You can not specify {} workers, the worker count must be at least 1",
                    count
                ))
            })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        WorkerCount::ONE
    }
}

impl TryFrom<i64> for WorkerCount {
    type Error = IcdError;

    fn try_from(count: i64) -> Result<Self> {
        WorkerCount::new(count)
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = IcdError;

    fn try_from(count: usize) -> Result<Self> {
        NonZeroUsize::new(count).map(WorkerCount).ok_or_else(|| {
            IcdError::configuration(
                "You can not specify 0 workers, the worker count must be at least 1",
            )
        })
    }
}

/// Worker counts taken from loosely typed input must be JSON integers.
impl TryFrom<&Value> for WorkerCount {
    type Error = IcdError;

    fn try_from(value: &Value) -> Result<Self> {
        match value.as_i64() {
            Some(count) => WorkerCount::new(count),
            None => Err(IcdError::configuration(format!(
                "The worker count needs to be an integer, got: {}",
                json_type_name(value)
            ))),
        }
    }
}

/// Fetches every code through `fetcher`, at most `workers` at a time.
///
/// The returned vector has one entry per input code and entry `i` always
/// belongs to `codes[i]`, whatever order the fetches complete in. Repeated
/// codes are fetched once per occurrence.
pub async fn fetch_all<F>(
    fetcher: &F,
    codes: &[Icd11Code],
    workers: WorkerCount,
) -> Vec<Result<Value>>
where
    F: FetchCode + ?Sized,
{
    debug!(
        "Fetching {} codes with {} worker(s)...",
        codes.len(),
        workers.get()
    );

    if workers.get() == 1 {
        let mut results = Vec::with_capacity(codes.len());
        for code in codes {
            results.push(fetcher.fetch(code).await);
        }
        return results;
    }

    let mut slots: Vec<Option<Result<Value>>> = codes.iter().map(|_| None).collect();

    let mut completed = stream::iter(codes.iter().enumerate())
        .map(|(index, code)| async move { (index, fetcher.fetch(code).await) })
        .buffer_unordered(workers.get());

    while let Some((index, result)) = completed.next().await {
        slots[index] = Some(result);
    }

    in_input_order(slots, codes)
}

/// Unwraps the slots filled by a concurrent batch. An empty slot becomes an
/// `Incomplete` error for its code, so the output always lines up with `codes`.
fn in_input_order(slots: Vec<Option<Result<Value>>>, codes: &[Icd11Code]) -> Vec<Result<Value>> {
    debug_assert_eq!(slots.len(), codes.len());
    slots
        .into_iter()
        .zip(codes)
        .map(|(slot, code)| {
            slot.unwrap_or_else(|| {
                Err(IcdError::Incomplete {
                    code: code.to_string(),
                })
            })
        })
        .collect()
}
