//! pipeline/parallel.rs
//! Ordered worker pool for record sealing/opening.
//!
//! Wiring (all threads scoped to the call):
//! - feeder thread: pulls `(seq, input)` jobs and pushes them into a bounded
//!   job channel;
//! - N workers: run `work(seq, input)` and push `(seq, result)` into a bounded
//!   result channel;
//! - calling thread: drains every result and slots it by `seq`, so output
//!   order never depends on completion order.
//!
//! The first failure raises an abort flag: the feeder stops, workers skip
//! what is still queued, and the lowest-sequence error seen is returned.
//! Results are always drained to the end so no thread stays blocked on a
//! full channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::channel::bounded;
use tracing::{debug, trace};

use crate::types::EceError;

/// Jobs in flight per worker, on each channel.
const INFLIGHT_PER_WORKER: usize = 4;

pub(crate) fn run_ordered<J, I, T, F>(jobs: J, workers: usize, work: F) -> Result<Vec<T>, EceError>
where
    J: Iterator<Item = (u64, I)> + Send,
    I: Send,
    T: Send,
    F: Fn(u64, I) -> Result<T, EceError> + Sync,
{
    let workers = workers.max(1);
    let depth = workers * INFLIGHT_PER_WORKER;
    let (job_tx, job_rx) = bounded::<(u64, I)>(depth);
    let (out_tx, out_rx) = bounded::<(u64, Result<T, EceError>)>(depth);
    let abort = AtomicBool::new(false);

    debug!(workers, depth, "starting ordered record pool");

    thread::scope(|scope| {
        let abort = &abort;
        let work = &work;

        let feeder = scope.spawn(move || {
            let mut fed = 0usize;
            for job in jobs {
                if abort.load(Ordering::Acquire) || job_tx.send(job).is_err() {
                    break;
                }
                fed += 1;
            }
            fed
        });

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            handles.push(scope.spawn(move || {
                trace!(worker = i, "record worker started");
                for (seq, input) in rx.iter() {
                    if abort.load(Ordering::Acquire) {
                        continue;
                    }
                    let res = work(seq, input);
                    if res.is_err() {
                        abort.store(true, Ordering::Release);
                    }
                    if tx.send((seq, res)).is_err() {
                        break;
                    }
                }
                trace!(worker = i, "record worker finished");
            }));
        }
        drop(job_rx);
        drop(out_tx);

        let mut slots: Vec<Option<T>> = Vec::new();
        let mut failure: Option<(u64, EceError)> = None;
        for (seq, res) in out_rx.iter() {
            match res {
                Ok(value) => {
                    let idx = seq as usize;
                    if slots.len() <= idx {
                        slots.resize_with(idx + 1, || None);
                    }
                    slots[idx] = Some(value);
                }
                Err(e) => {
                    if failure.as_ref().map_or(true, |(s, _)| seq < *s) {
                        failure = Some((seq, e));
                    }
                }
            }
        }

        // Join everything before bailing out: an unjoined panicked thread
        // would re-panic when the scope closes.
        let panicked = handles.into_iter().map(|h| h.join()).filter(Result::is_err).count();
        let fed = feeder.join();
        if panicked > 0 {
            return Err(EceError::Pipeline(format!("{panicked} record worker(s) panicked")));
        }
        let fed = fed.map_err(|_| EceError::Pipeline("record feeder panicked".into()))?;

        if let Some((seq, e)) = failure {
            debug!(seq, error = %e, "ordered record pool aborted");
            return Err(e);
        }
        if slots.len() != fed {
            return Err(EceError::Pipeline(format!(
                "expected {fed} record results, got {}",
                slots.len()
            )));
        }
        slots
            .into_iter()
            .collect::<Option<Vec<T>>>()
            .ok_or_else(|| EceError::Pipeline("missing record result".into()))
    })
}
