//! # Mini MH
//!
//! A compact library for scalar Metropolis–Hastings sampling: give it a target density and a
//! proposal kernel, and it produces a chain whose samples follow the target.
//!
//! ```rust
//! use mini_mh::distributions::{GaussianRandomWalk, Normal};
//! use mini_mh::metropolis_hastings::{MetropolisHastings, SamplerConfig};
//! use mini_mh::stats::Summary;
//!
//! let target = Normal::new(3.0, 2.0).unwrap();
//! let kernel = GaussianRandomWalk::new(4.0).unwrap();
//! let mh = MetropolisHastings::new(target, kernel, SamplerConfig::new(500, 20_000))
//!     .unwrap()
//!     .set_seed(42);
//!
//! let summary = Summary::from_samples(&mh.run()).unwrap();
//! assert!((summary.mean - 3.0).abs() < 0.3);
//! ```

pub mod core;
pub mod distributions;
pub mod error;
pub mod io;
pub mod ks_test;
pub mod metropolis_hastings;
pub mod stats;
