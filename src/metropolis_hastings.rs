/*!
# Metropolis–Hastings Sampler

This module implements a scalar Metropolis–Hastings sampler that works with any target
distribution `D` and proposal kernel `Q` implementing [`Target`] and [`ProposalKernel`].

## Overview

- **Target Distribution (`D`)**: Provides the density of states via [`Target`].
- **Proposal Kernel (`Q`)**: Generates candidate states and evaluates transition densities via
  [`ProposalKernel`].
- **Burn-in and collection**: A run performs `burn_in + collect` iterations and emits only the
  last `collect` states, lazily, through [`Samples`].
- **Robustness**: Numerical anomalies (a candidate outside the support, a zero or non-finite ratio)
  never abort a chain. The candidate is rejected and the chain moves on.
- **Reproducibility**: [`MetropolisHastings::set_seed`] fixes the generator. Without a seed every
  run draws a fresh one from entropy.

## Example Usage

```rust
use mini_mh::distributions::{Exponential, GaussianRandomWalk};
use mini_mh::metropolis_hastings::{MetropolisHastings, SamplerConfig};

let target = Exponential::new(5.0).unwrap();
let kernel = GaussianRandomWalk::new(10.0).unwrap();
let mh = MetropolisHastings::new(target, kernel, SamplerConfig::new(100, 1_000))
    .unwrap()
    .set_seed(42);

let samples: Vec<f64> = mh.samples().collect();
assert_eq!(samples.len(), 1_000);
assert!(samples.iter().all(|&x| x > 0.0));
```
*/

use std::iter::FusedIterator;

use indicatif::{MultiProgress, ProgressBar};
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::core::{collect_with_progress, progress_style, Phase, Transition};
use crate::distributions::{ProposalKernel, Target};
use crate::error::{AcceptanceError, ConfigError};

/// Run parameters of a single chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Number of leading iterations whose states are discarded (`m`).
    pub burn_in: usize,
    /// Number of samples emitted after burn-in (`n`).
    pub collect: usize,
    /// The starting state is drawn uniformly from `[low, high)`.
    pub init_range: (f64, f64),
    /// Fixed seed for the chain's generator. `None` seeds from entropy on every run.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            burn_in: 100,
            collect: 10_000,
            init_range: (0.1, 1.0),
            seed: None,
        }
    }
}

impl SamplerConfig {
    pub fn new(burn_in: usize, collect: usize) -> Self {
        Self {
            burn_in,
            collect,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the range the starting state is drawn from. It must lie inside the target's support.
    pub fn with_init_range(mut self, low: f64, high: f64) -> Self {
        self.init_range = (low, high);
        self
    }

    /// Total number of iterations a run performs. Saturates for configurations that
    /// [`SamplerConfig::validate`] rejects.
    pub fn iterations(&self) -> usize {
        self.burn_in.saturating_add(self.collect)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collect == 0 {
            return Err(ConfigError::EmptyCollection);
        }
        if self.burn_in.checked_add(self.collect).is_none() {
            return Err(ConfigError::IterationOverflow {
                burn_in: self.burn_in,
                collect: self.collect,
            });
        }
        let (low, high) = self.init_range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ConfigError::InvalidInitRange { low, high });
        }
        Ok(())
    }
}

/**
Computes the Metropolis–Hastings acceptance probability of moving from `current` to `candidate`:

\[
\alpha = \min\left(1, \frac{p(\text{candidate})\, q(\text{current} \mid \text{candidate})}
                           {p(\text{current})\, q(\text{candidate} \mid \text{current})}\right)
\]

The ratio is evaluated in log-space. For a symmetric kernel the `q` terms cancel and are never
evaluated. A zero numerator is a valid ratio of `0`. A target density outside its support, a
zero denominator or a NaN anywhere are reported as errors; the chain maps them to `α = 0`.

# Examples

```rust
use mini_mh::distributions::{Exponential, GaussianRandomWalk};
use mini_mh::error::AcceptanceError;
use mini_mh::metropolis_hastings::acceptance_probability;

let target = Exponential::new(1.0).unwrap();
let kernel = GaussianRandomWalk::new(1.0).unwrap();

// Moving downhill towards 0 is always accepted.
assert_eq!(acceptance_probability(&target, &kernel, 2.0, 1.0).unwrap(), 1.0);
// Moving uphill by one unit is accepted with probability e^-1.
let alpha = acceptance_probability(&target, &kernel, 1.0, 2.0).unwrap();
assert!((alpha - (-1.0f64).exp()).abs() < 1e-12);
// Candidates outside the support cannot be evaluated.
assert!(matches!(
    acceptance_probability(&target, &kernel, 1.0, -1.0),
    Err(AcceptanceError::OutOfSupport(_))
));
```
*/
pub fn acceptance_probability<D, Q>(
    target: &D,
    kernel: &Q,
    current: f64,
    candidate: f64,
) -> Result<f64, AcceptanceError>
where
    D: Target + ?Sized,
    Q: ProposalKernel + ?Sized,
{
    let ln_p_candidate = target.ln_density(candidate)?;
    let ln_p_current = target.ln_density(current)?;
    let (ln_q_backward, ln_q_forward) = if kernel.is_symmetric() {
        (0.0, 0.0)
    } else {
        (
            kernel.ln_transition_density(candidate, current),
            kernel.ln_transition_density(current, candidate),
        )
    };

    let ln_numerator = ln_p_candidate + ln_q_backward;
    let ln_denominator = ln_p_current + ln_q_forward;
    if ln_numerator.is_nan() || ln_numerator == f64::INFINITY || !ln_denominator.is_finite() {
        return Err(AcceptanceError::DegenerateRatio {
            numerator: ln_numerator.exp(),
            denominator: ln_denominator.exp(),
        });
    }
    let ln_ratio = ln_numerator - ln_denominator;
    Ok(ln_ratio.min(0.0).exp())
}

/**
The Metropolis–Hastings sampler: a validated configuration together with the target and the
proposal kernel. Each call to [`MetropolisHastings::samples`] (or one of the `run` methods) starts an
independent chain from a fresh random start.

# Type Parameters
- `D`: The target distribution type. Must implement [`Target`].
- `Q`: The proposal kernel type. Must implement [`ProposalKernel`].

Both may be references, so one kernel value can be shared by several samplers.
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastings<D, Q> {
    /// The target distribution we want to sample from.
    pub target: D,
    /// The proposal kernel used to generate candidate states.
    pub kernel: Q,
    config: SamplerConfig,
}

impl<D, Q> MetropolisHastings<D, Q>
where
    D: Target,
    Q: ProposalKernel,
{
    /// Constructs a sampler, failing fast on an invalid configuration.
    pub fn new(target: D, kernel: Q, config: SamplerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            target,
            kernel,
            config,
        })
    }

    /// Fixes the seed of every subsequent run.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Starts a new chain and returns its lazy sample stream.
    pub fn samples(&self) -> Samples<'_, D, Q, SmallRng> {
        let rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.samples_with_rng(rng)
    }

    /// Starts a new chain driven by the given generator.
    pub fn samples_with_rng<R: Rng>(&self, mut rng: R) -> Samples<'_, D, Q, R> {
        let (low, high) = self.config.init_range;
        let state = rng.gen_range(low..high);
        debug!(
            "starting chain at {state} (burn-in {}, collect {})",
            self.config.burn_in, self.config.collect
        );
        Samples {
            target: &self.target,
            kernel: &self.kernel,
            rng,
            state,
            iteration: 0,
            burn_in: self.config.burn_in,
            total: self.config.iterations(),
            accepted: 0,
            anomalies: 0,
        }
    }

    /// Runs one chain to completion and returns its `collect` samples.
    pub fn run(&self) -> Vec<f64> {
        let mut samples = self.samples();
        let out: Vec<f64> = samples.by_ref().collect();
        samples.log_summary();
        out
    }

    /// Like [`MetropolisHastings::run`], with a progress bar on stderr.
    pub fn run_progress(&self) -> Vec<f64> {
        let pb = ProgressBar::new(self.config.collect as u64);
        pb.set_prefix("Chain 0");
        pb.set_style(progress_style());
        let mut samples = self.samples();
        let out = collect_with_progress(samples.by_ref(), &pb);
        pb.finish();
        samples.log_summary();
        out
    }
}

impl<D, Q> MetropolisHastings<D, Q>
where
    D: Target + Sync,
    Q: ProposalKernel + Sync,
{
    /// Chain `i` uses seed `seed + i`; unseeded samplers draw one base seed from entropy.
    fn chain_seeds(&self, n_chains: usize) -> Vec<u64> {
        let base = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        (0..n_chains)
            .map(|i| base.wrapping_add(i as u64))
            .collect()
    }

    /// Runs `n_chains` independent chains in parallel. Results are returned in chain order.
    pub fn run_chains(&self, n_chains: usize) -> Vec<Vec<f64>> {
        self.chain_seeds(n_chains)
            .into_par_iter()
            .map(|seed| {
                let mut samples = self.samples_with_rng(SmallRng::seed_from_u64(seed));
                let out: Vec<f64> = samples.by_ref().collect();
                samples.log_summary();
                out
            })
            .collect()
    }

    /// Like [`MetropolisHastings::run_chains`], with one progress bar per chain.
    pub fn run_chains_progress(&self, n_chains: usize) -> Vec<Vec<f64>> {
        let multi = MultiProgress::new();
        let style = progress_style();
        self.chain_seeds(n_chains)
            .into_par_iter()
            .enumerate()
            .map(|(i, seed)| {
                let pb = multi.add(ProgressBar::new(self.config.collect as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(style.clone());
                let mut samples = self.samples_with_rng(SmallRng::seed_from_u64(seed));
                let out = collect_with_progress(samples.by_ref(), &pb);
                pb.finish();
                samples.log_summary();
                out
            })
            .collect()
    }
}

/**
A running chain: the lazy, finite, single-pass stream of post-burn-in samples.

Iterating yields exactly `collect` values. Dropping the stream early simply stops the chain.
[`Samples::advance`] exposes every iteration, burn-in included.

# Examples

```rust
use mini_mh::core::Phase;
use mini_mh::distributions::{Normal, GaussianRandomWalk};
use mini_mh::metropolis_hastings::{MetropolisHastings, SamplerConfig};

let target = Normal::new(3.0, 2.0).unwrap();
let kernel = GaussianRandomWalk::new(1.0).unwrap();
let mh = MetropolisHastings::new(target, kernel, SamplerConfig::new(2, 3).with_seed(1)).unwrap();

let mut chain = mh.samples();
let phases: Vec<Phase> = std::iter::from_fn(|| chain.advance()).map(|t| t.phase).collect();
assert_eq!(
    phases,
    [Phase::BurnIn, Phase::BurnIn, Phase::Collection, Phase::Collection, Phase::Collection]
);
assert!(chain.advance().is_none());
```
*/
#[derive(Debug)]
pub struct Samples<'a, D, Q, R> {
    target: &'a D,
    kernel: &'a Q,
    rng: R,
    state: f64,
    iteration: usize,
    burn_in: usize,
    total: usize,
    accepted: usize,
    anomalies: usize,
}

impl<D, Q, R> Samples<'_, D, Q, R>
where
    D: Target,
    Q: ProposalKernel,
    R: Rng,
{
    /// Performs the next iteration, or returns `None` once all `burn_in + collect` are done.
    pub fn advance(&mut self) -> Option<Transition> {
        if self.iteration >= self.total {
            return None;
        }
        let accepted = self.update();
        let phase = if self.iteration < self.burn_in {
            Phase::BurnIn
        } else {
            Phase::Collection
        };
        let transition = Transition {
            iteration: self.iteration,
            state: self.state,
            accepted,
            phase,
        };
        self.iteration += 1;
        Some(transition)
    }

    /// The state the chain currently sits in.
    pub fn current_state(&self) -> f64 {
        self.state
    }

    /// One Metropolis–Hastings update; reports whether the candidate was accepted.
    fn update(&mut self) -> bool {
        let candidate = self.kernel.propose(self.state, &mut self.rng);
        let alpha = match acceptance_probability(self.target, self.kernel, self.state, candidate) {
            Ok(alpha) => alpha,
            Err(err) => {
                trace!("rejecting candidate {candidate} from {}: {err}", self.state);
                self.anomalies += 1;
                0.0
            }
        };
        let u: f64 = self.rng.gen();
        let accept = u < alpha;
        if accept {
            self.state = candidate;
            self.accepted += 1;
        }
        accept
    }

    /// Number of iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Fraction of iterations whose candidate was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iteration == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iteration as f64
        }
    }

    /// Number of iterations whose acceptance ratio was undefined.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn log_summary(&self) {
        debug!(
            "chain finished after {} iterations: acceptance rate {:.3}, {} rejected as undefined",
            self.iteration,
            self.acceptance_rate(),
            self.anomalies
        );
    }
}

impl<D, Q, R> Iterator for Samples<'_, D, Q, R>
where
    D: Target,
    Q: ProposalKernel,
    R: Rng,
{
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        while let Some(transition) = self.advance() {
            if transition.is_emitted() {
                return Some(transition.state);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.iteration.max(self.burn_in);
        (remaining, Some(remaining))
    }
}

impl<D, Q, R> ExactSizeIterator for Samples<'_, D, Q, R>
where
    D: Target,
    Q: ProposalKernel,
    R: Rng,
{
}

impl<D, Q, R> FusedIterator for Samples<'_, D, Q, R>
where
    D: Target,
    Q: ProposalKernel,
    R: Rng,
{
}
