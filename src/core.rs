//! Chain plumbing shared by the samplers: per-iteration records and progress-bar driven runs.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::stats::ChainTracker;

/// Minimum time between two refreshes of the acceptance-rate message.
const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// The two logical phases of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Iterations `0..m`: the chain moves but nothing is emitted.
    BurnIn,
    /// Iterations `m..m + n`: every state is emitted.
    Collection,
}

/// The outcome of a single Metropolis–Hastings iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Zero-based index of the iteration.
    pub iteration: usize,
    /// The state after the accept/reject decision.
    pub state: f64,
    /// Whether the candidate was accepted.
    pub accepted: bool,
    /// The phase this iteration belongs to.
    pub phase: Phase,
}

impl Transition {
    /// Whether this iteration contributes a sample to the output stream.
    pub fn is_emitted(&self) -> bool {
        self.phase == Phase::Collection
    }
}

/// Drains a finite sample stream, ticking `pb` once per emitted sample.
///
/// The bar's message shows the acceptance rate over the most recent samples, refreshed at most
/// every `UPDATE_INTERVAL` and always after the last one.
pub fn collect_with_progress<I>(samples: I, pb: &ProgressBar) -> Vec<f64>
where
    I: ExactSizeIterator<Item = f64>,
{
    let n = samples.len();
    pb.set_length(n as u64);
    let mut out = Vec::with_capacity(n);
    let mut tracker: Option<ChainTracker> = None;
    let mut last_update = Instant::now();
    for x in samples {
        tracker.get_or_insert_with(|| ChainTracker::new(x)).step(x);
        out.push(x);
        pb.inc(1);

        if last_update.elapsed() >= UPDATE_INTERVAL || out.len() == n {
            if let Some(tracker) = &tracker {
                pb.set_message(format!("p(accept)≈{:.2}", tracker.p_accept()));
            }
            last_update = Instant::now();
        }
    }
    out
}

pub(crate) fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
