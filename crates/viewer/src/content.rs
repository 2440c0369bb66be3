//! Parallel content loading.
//!
//! Every [`LoadRequest`] runs its own material-then-geometry pipeline on the
//! rayon pool. Outcomes stream back over a channel as each pipeline ends,
//! in no particular order, so the owning thread can insert models while it
//! keeps rendering. Once every pipeline has reported, a single
//! [`ContentEvent::Finished`] closes the batch.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use modelview_assets::{LoadOutcome, LoadRequest, PipelineFailure, run_pipeline};
use rayon::prelude::*;

/// Something the loader reports back.
#[derive(Debug)]
pub enum ContentEvent {
    Outcome(LoadOutcome),
    /// All pipelines have reported.
    Finished { elapsed: Duration },
}

/// Handle to one batch of in-flight load pipelines.
#[derive(Debug)]
pub struct ContentLoader {
    events: Receiver<ContentEvent>,
    expected: usize,
    finished: bool,
}

impl ContentLoader {
    /// Start one pipeline per request on the rayon pool.
    pub fn spawn(requests: Vec<LoadRequest>) -> Self {
        let (tx, events) = mpsc::channel();
        let expected = requests.len();

        rayon::spawn(move || {
            let started = Instant::now();
            let succeeded: Vec<bool> = requests
                .par_iter()
                .map(|request| {
                    let outcome = run_pipeline(request);
                    let ok = outcome.is_ok();
                    // A dropped receiver means nobody wants the result.
                    let _ = tx.send(ContentEvent::Outcome(outcome));
                    ok
                })
                .collect();
            let elapsed = started.elapsed();
            tracing::debug!(
                succeeded = succeeded.iter().filter(|ok| **ok).count(),
                total = succeeded.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "load pipelines joined"
            );
            let _ = tx.send(ContentEvent::Finished { elapsed });
        });

        Self {
            events,
            expected,
            finished: false,
        }
    }

    /// Number of pipelines in this batch.
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Events that have arrived so far, without blocking.
    pub fn poll(&mut self) -> Vec<ContentEvent> {
        let mut out = Vec::new();
        while !self.finished {
            match self.events.try_recv() {
                Ok(event) => out.push(self.observe(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => out.push(self.disconnected()),
            }
        }
        out
    }

    /// Block until the next event. `None` once the batch is finished.
    pub fn recv(&mut self) -> Option<ContentEvent> {
        if self.finished {
            return None;
        }
        Some(match self.events.recv() {
            Ok(event) => self.observe(event),
            Err(_) => self.disconnected(),
        })
    }

    fn observe(&mut self, event: ContentEvent) -> ContentEvent {
        if matches!(event, ContentEvent::Finished { .. }) {
            self.finished = true;
        }
        event
    }

    fn disconnected(&mut self) -> ContentEvent {
        tracing::warn!("load pool went away before reporting completion");
        self.finished = true;
        ContentEvent::Finished {
            elapsed: Duration::ZERO,
        }
    }
}

/// Aggregated result of one loading batch.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names of models added to the scene, in arrival order.
    pub loaded: Vec<String>,
    pub failures: Vec<PipelineFailure>,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Loaded {}/{} models in {:.1} ms",
            self.loaded.len(),
            self.total(),
            self.elapsed.as_secs_f64() * 1000.0
        )?;
        for failure in &self.failures {
            write!(f, "\n  failed: {failure}")?;
        }
        Ok(())
    }
}
