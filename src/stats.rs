//! Summary statistics for scalar chains: batch summaries, a streaming tracker and histograms.

use std::collections::VecDeque;
use std::fmt;

/// Number of recent iterations the tracker's acceptance rate is computed over.
const ACCEPT_WINDOW: usize = 100;

/// Batch summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Unbiased sample variance; `0.0` for a single observation.
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarizes `samples`, or returns `None` if it is empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let (&first, _) = samples.split_first()?;
        let mut tracker = ChainTracker::new(first);
        samples.iter().for_each(|&x| tracker.step(x));
        Some(tracker.summary())
    }

    pub fn std(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.4} std={:.4} min={:.4} max={:.4}",
            self.n,
            self.mean,
            self.std(),
            self.min,
            self.max
        )
    }
}

/// Streaming statistics of a chain, updated one state at a time.
///
/// A step counts as accepted when the new state differs from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTracker {
    n: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    last_state: f64,
    accept_queue: VecDeque<bool>,
    accepted_in_window: usize,
}

impl ChainTracker {
    pub fn new(initial_state: f64) -> Self {
        Self {
            n: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            last_state: initial_state,
            accept_queue: VecDeque::with_capacity(ACCEPT_WINDOW + 1),
            accepted_in_window: 0,
        }
    }

    pub fn step(&mut self, x: f64) {
        let accepted = x != self.last_state;
        self.accept_queue.push_back(accepted);
        self.accepted_in_window += accepted as usize;
        if self.accept_queue.len() > ACCEPT_WINDOW {
            if let Some(true) = self.accept_queue.pop_front() {
                self.accepted_in_window -= 1;
            }
        }
        self.last_state = x;

        // Welford
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Acceptance rate over the last `ACCEPT_WINDOW` steps.
    pub fn p_accept(&self) -> f64 {
        if self.accept_queue.is_empty() {
            0.0
        } else {
            self.accepted_in_window as f64 / self.accept_queue.len() as f64
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.n < 2 {
            0.0
        } else {
            self.m2 / (self.n - 1) as f64
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            n: self.n,
            mean: self.mean,
            variance: self.variance(),
            min: self.min,
            max: self.max,
        }
    }
}

/// Equal-width frequency counts of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins the finite values of `samples` into `bins` equal-width bins spanning their range.
    /// Returns `None` when there are no finite values or `bins` is zero.
    pub fn new(samples: &[f64], bins: usize) -> Option<Self> {
        let finite = || samples.iter().copied().filter(|x| x.is_finite());
        let lo = finite().reduce(f64::min)?;
        let hi = finite().reduce(f64::max)?;
        Self::with_range(samples, bins, lo, hi)
    }

    /// Bins the values of `samples` inside `[lo, hi]`; everything else is ignored.
    pub fn with_range(samples: &[f64], bins: usize, lo: f64, hi: f64) -> Option<Self> {
        if bins == 0 || !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return None;
        }
        let mut counts = vec![0; bins];
        let width = (hi - lo) / bins as f64;
        for &x in samples.iter().filter(|x| (lo..=hi).contains(*x)) {
            let idx = if width > 0.0 {
                (((x - lo) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }
        Some(Self { lo, hi, counts })
    }

    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Renders one line per bin: its left edge, its count and a bar scaled to `width` characters.
    pub fn render(&self, width: usize) -> String {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let bin_width = self.bin_width();
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let bar = "#".repeat(c * width / peak);
                format!("{:>10.4} | {:>7} {}\n", self.lo + i as f64 * bin_width, c, bar)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn summary_of_small_sample() {
        let s = Summary::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.n, 4);
        assert_abs_diff_eq!(s.mean, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.variance, 5.0 / 3.0, epsilon = 1e-12);
        assert_eq!((s.min, s.max), (1.0, 4.0));
        assert!(Summary::from_samples(&[]).is_none());
        assert_eq!(Summary::from_samples(&[7.0]).unwrap().variance, 0.0);
    }

    #[test]
    fn tracker_acceptance_uses_sliding_window() {
        let mut tracker = ChainTracker::new(0.0);
        // 100 repeats of the start value: nothing accepted.
        (0..100).for_each(|_| tracker.step(0.0));
        assert_eq!(tracker.p_accept(), 0.0);
        // 50 moves push half of the rejections out of the window.
        (1..=50).for_each(|i| tracker.step(i as f64));
        assert_abs_diff_eq!(tracker.p_accept(), 0.5, epsilon = 1e-12);
        (51..=150).for_each(|i| tracker.step(i as f64));
        assert_eq!(tracker.p_accept(), 1.0);
    }

    #[test]
    fn tracker_matches_two_pass_variance() {
        let xs: Vec<f64> = (0..1_000).map(|i| ((i * 37) % 101) as f64 * 0.1 + 1e6).collect();
        let mut tracker = ChainTracker::new(xs[0]);
        xs.iter().for_each(|&x| tracker.step(x));
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
        assert_abs_diff_eq!(tracker.mean(), mean, epsilon = 1e-6);
        assert_abs_diff_eq!(tracker.variance(), var, epsilon = 1e-6);
    }

    #[test]
    fn histogram_counts_every_finite_value() {
        let xs = [0.0, 0.1, 0.5, 0.9, 1.0, f64::NAN, f64::INFINITY];
        let h = Histogram::new(&xs, 2).unwrap();
        assert_eq!((h.lo, h.hi), (0.0, 1.0));
        assert_eq!(h.counts, vec![2, 3]);
        assert_eq!(h.total(), 5);
        assert_abs_diff_eq!(h.bin_width(), 0.5);
    }

    #[test]
    fn histogram_edge_cases() {
        assert!(Histogram::new(&[], 10).is_none());
        assert!(Histogram::new(&[1.0], 0).is_none());
        let h = Histogram::new(&[3.0, 3.0], 4).unwrap();
        assert_eq!(h.counts, vec![2, 0, 0, 0]);
        let h = Histogram::with_range(&[-1.0, 0.5, 2.0], 1, 0.0, 1.0).unwrap();
        assert_eq!(h.counts, vec![1]);
    }

    #[test]
    fn render_scales_bars_to_peak() {
        let h = Histogram {
            lo: 0.0,
            hi: 2.0,
            counts: vec![4, 2],
        };
        let rendered = h.render(8);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 4 ########"));
        assert!(lines[1].ends_with(" 2 ####"));
    }
}
