/*!
Defines the two collaborators of the Metropolis–Hastings engine: target densities and proposal
kernels. Both are stateless; any randomness comes from a generator passed in by the caller.

- [`Target`] evaluates the density of the distribution we want to sample from. Evaluating it
  outside the support yields [`OutOfSupport`] instead of a meaningless number.
- [`ProposalKernel`] draws a candidate from the current state and evaluates the transition
  density between two states, in either direction.
- [`IndependentSampler`] draws i.i.d. reference samples. The sampler never calls it; it exists to
  compare a chain against ground truth.

# Examples

```rust
use mini_mh::distributions::{Exponential, GaussianRandomWalk, ProposalKernel, Target};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let target = Exponential::new(5.0).unwrap();
assert!((target.density(0.0001).unwrap() - 0.2).abs() < 1e-4);
assert!(target.density(-1.0).is_err());

let kernel = GaussianRandomWalk::new(10.0).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let candidate = kernel.propose(1.0, &mut rng);
assert_eq!(
    kernel.transition_density(1.0, candidate),
    kernel.transition_density(candidate, 1.0)
);
```
*/

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use special::Gamma as SpecialGamma;

use crate::error::{ConfigError, OutOfSupport};

/// `ln(sqrt(2 * pi))`
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// A (normalized) density on the real line that the sampler targets.
pub trait Target {
    /// Evaluates the density at `x`.
    fn density(&self, x: f64) -> Result<f64, OutOfSupport>;

    /// Evaluates the log-density at `x`. Implementors should override this when the
    /// density underflows long before its logarithm does.
    fn ln_density(&self, x: f64) -> Result<f64, OutOfSupport> {
        self.density(x).map(f64::ln)
    }
}

/// Draws independent samples from a distribution.
pub trait IndependentSampler {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64>;
}

/// A transition kernel q(to | from) used to generate candidate states.
pub trait ProposalKernel {
    /// Draws a candidate next state given the current state `from`.
    fn propose<R: Rng + ?Sized>(&self, from: f64, rng: &mut R) -> f64;

    /// Evaluates q(to | from).
    fn transition_density(&self, from: f64, to: f64) -> f64;

    /// Evaluates ln q(to | from).
    fn ln_transition_density(&self, from: f64, to: f64) -> f64 {
        self.transition_density(from, to).ln()
    }

    /// Whether `q(b | a) == q(a | b)` holds for all states.
    fn is_symmetric(&self) -> bool {
        false
    }
}

impl<D: Target> Target for &D {
    fn density(&self, x: f64) -> Result<f64, OutOfSupport> {
        (**self).density(x)
    }

    fn ln_density(&self, x: f64) -> Result<f64, OutOfSupport> {
        (**self).ln_density(x)
    }
}

impl<Q: ProposalKernel> ProposalKernel for &Q {
    fn propose<R: Rng + ?Sized>(&self, from: f64, rng: &mut R) -> f64 {
        (**self).propose(from, rng)
    }

    fn transition_density(&self, from: f64, to: f64) -> f64 {
        (**self).transition_density(from, to)
    }

    fn ln_transition_density(&self, from: f64, to: f64) -> f64 {
        (**self).ln_transition_density(from, to)
    }

    fn is_symmetric(&self) -> bool {
        (**self).is_symmetric()
    }
}

/**
Exponential distribution with mean `scale`, i.e. density `λ·exp(−λx)` on `(0, ∞)` with
`λ = 1 / scale`.

# Examples

```rust
use mini_mh::distributions::{Exponential, Target};

let exp = Exponential::new(5.0).unwrap();
assert_eq!(exp.rate(), 0.2);
assert!(exp.density(0.0).is_err());
assert!(Exponential::new(-1.0).is_err());
```
*/
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    scale: f64,
    lambda: f64,
    dist: rand_distr::Exp<f64>,
}

impl Exponential {
    /// Creates an exponential distribution with the given mean.
    pub fn new(scale: f64) -> Result<Self, ConfigError> {
        let scale = ConfigError::check_positive("scale", scale)?;
        let lambda = ConfigError::check_positive("rate", 1.0 / scale)?;
        let dist = rand_distr::Exp::new(lambda).map_err(|_| ConfigError::NonPositive {
            name: "scale",
            value: scale,
        })?;
        Ok(Self {
            scale,
            lambda,
            dist,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The rate parameter `λ = 1 / scale`.
    pub fn rate(&self) -> f64 {
        self.lambda
    }
}

impl Target for Exponential {
    fn density(&self, x: f64) -> Result<f64, OutOfSupport> {
        self.ln_density(x).map(f64::exp)
    }

    fn ln_density(&self, x: f64) -> Result<f64, OutOfSupport> {
        if !(x > 0.0) {
            return Err(OutOfSupport {
                x,
                support: "(0, inf)",
            });
        }
        Ok(self.lambda.ln() - self.lambda * x)
    }
}

impl IndependentSampler for Exponential {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.dist.sample(rng)).collect()
    }
}

/**
Normal distribution with the given mean and standard deviation.

# Examples

```rust
use mini_mh::distributions::{Normal, Target};

let norm = Normal::new(3.0, 2.0).unwrap();
let peak = norm.density(3.0).unwrap();
assert!((peak - 0.19947114020071635).abs() < 1e-12);
assert!(Normal::new(0.0, 0.0).is_err());
```
*/
#[derive(Debug, Clone, Copy)]
pub struct Normal {
    mean: f64,
    std: f64,
    dist: rand_distr::Normal<f64>,
}

impl Normal {
    pub fn new(mean: f64, std: f64) -> Result<Self, ConfigError> {
        let mean = ConfigError::check_finite("mean", mean)?;
        let std = ConfigError::check_positive("std", std)?;
        let dist = rand_distr::Normal::new(mean, std).map_err(|_| ConfigError::NonPositive {
            name: "std",
            value: std,
        })?;
        Ok(Self { mean, std, dist })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}

impl Target for Normal {
    fn density(&self, x: f64) -> Result<f64, OutOfSupport> {
        self.ln_density(x).map(f64::exp)
    }

    fn ln_density(&self, x: f64) -> Result<f64, OutOfSupport> {
        if x.is_nan() {
            return Err(OutOfSupport {
                x,
                support: "(-inf, inf)",
            });
        }
        let z = (x - self.mean) / self.std;
        Ok(-0.5 * z * z - self.std.ln() - LN_SQRT_2PI)
    }
}

impl IndependentSampler for Normal {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.dist.sample(rng)).collect()
    }
}

/**
Beta distribution with shape parameters `a` and `b` on the open interval `(0, 1)`.

The normalizing constant `B(a, b)` is computed from log-gamma values.

# Examples

```rust
use mini_mh::distributions::{Beta, Target};

let beta = Beta::new(0.5, 0.5).unwrap();
// Arcsine density: 1 / (pi * sqrt(x (1 - x)))
let expected = 1.0 / (std::f64::consts::PI * (0.25f64 * 0.75).sqrt());
assert!((beta.density(0.25).unwrap() - expected).abs() < 1e-10);
assert!(beta.density(1.0).is_err());
```
*/
#[derive(Debug, Clone, Copy)]
pub struct Beta {
    a: f64,
    b: f64,
    ln_norm: f64,
    dist: rand_distr::Beta<f64>,
}

impl Beta {
    pub fn new(a: f64, b: f64) -> Result<Self, ConfigError> {
        let a = ConfigError::check_positive("a", a)?;
        let b = ConfigError::check_positive("b", b)?;
        let dist = rand_distr::Beta::new(a, b).map_err(|_| ConfigError::NonPositive {
            name: "a",
            value: a,
        })?;
        Ok(Self {
            a,
            b,
            ln_norm: ln_beta(a, b),
            dist,
        })
    }

    pub fn shape(&self) -> (f64, f64) {
        (self.a, self.b)
    }
}

/// `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a + b)`
fn ln_beta(a: f64, b: f64) -> f64 {
    SpecialGamma::ln_gamma(a).0 + SpecialGamma::ln_gamma(b).0 - SpecialGamma::ln_gamma(a + b).0
}

impl Target for Beta {
    fn density(&self, x: f64) -> Result<f64, OutOfSupport> {
        self.ln_density(x).map(f64::exp)
    }

    fn ln_density(&self, x: f64) -> Result<f64, OutOfSupport> {
        if !(x > 0.0 && x < 1.0) {
            return Err(OutOfSupport {
                x,
                support: "(0, 1)",
            });
        }
        Ok((self.a - 1.0) * x.ln() + (self.b - 1.0) * (-x).ln_1p() - self.ln_norm)
    }
}

impl IndependentSampler for Beta {
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.dist.sample(rng)).collect()
    }
}

/**
Symmetric Gaussian random walk: the candidate is `current + sigma * z` with `z ~ N(0, 1)`.

# Examples

```rust
use mini_mh::distributions::{GaussianRandomWalk, ProposalKernel};

let kernel = GaussianRandomWalk::new(10.0).unwrap();
assert!(kernel.is_symmetric());
assert_eq!(kernel.transition_density(0.0, 3.0), kernel.transition_density(3.0, 0.0));
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianRandomWalk {
    sigma: f64,
}

impl GaussianRandomWalk {
    pub fn new(sigma: f64) -> Result<Self, ConfigError> {
        let sigma = ConfigError::check_positive("sigma", sigma)?;
        Ok(Self { sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl ProposalKernel for GaussianRandomWalk {
    fn propose<R: Rng + ?Sized>(&self, from: f64, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        from + self.sigma * z
    }

    fn transition_density(&self, from: f64, to: f64) -> f64 {
        self.ln_transition_density(from, to).exp()
    }

    fn ln_transition_density(&self, from: f64, to: f64) -> f64 {
        let z = (to - from) / self.sigma;
        -0.5 * z * z - self.sigma.ln() - LN_SQRT_2PI
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/**
Multiplicative random walk on `(0, ∞)`: the candidate is `current * exp(sigma * z)` with
`z ~ N(0, 1)`, so `ln(candidate) ~ N(ln(current), sigma)`.

This kernel is asymmetric; `q(to | from)` is the log-normal density of `to` and vanishes when
either state is non-positive.

# Examples

```rust
use mini_mh::distributions::{LogNormalRandomWalk, ProposalKernel};

let kernel = LogNormalRandomWalk::new(0.5).unwrap();
assert!(!kernel.is_symmetric());
assert_ne!(kernel.transition_density(1.0, 2.0), kernel.transition_density(2.0, 1.0));
assert_eq!(kernel.transition_density(-1.0, 2.0), 0.0);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalRandomWalk {
    sigma: f64,
}

impl LogNormalRandomWalk {
    pub fn new(sigma: f64) -> Result<Self, ConfigError> {
        let sigma = ConfigError::check_positive("sigma", sigma)?;
        Ok(Self { sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl ProposalKernel for LogNormalRandomWalk {
    fn propose<R: Rng + ?Sized>(&self, from: f64, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        from * (self.sigma * z).exp()
    }

    fn transition_density(&self, from: f64, to: f64) -> f64 {
        self.ln_transition_density(from, to).exp()
    }

    fn ln_transition_density(&self, from: f64, to: f64) -> f64 {
        if !(from > 0.0 && to > 0.0) {
            return f64::NEG_INFINITY;
        }
        let z = (to.ln() - from.ln()) / self.sigma;
        -0.5 * z * z - self.sigma.ln() - LN_SQRT_2PI - to.ln()
    }
}
