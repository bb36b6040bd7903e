//! Samples Exponential(5), N(3, 2) and Beta(0.5, 0.5) with one shared Gaussian random-walk
//! kernel and prints the simulated histograms next to histograms of independent draws.

use clap::Parser;
use log::info;
use mini_mh::distributions::{
    Beta, Exponential, GaussianRandomWalk, IndependentSampler, Normal, Target,
};
use mini_mh::metropolis_hastings::{MetropolisHastings, SamplerConfig};
use mini_mh::stats::{Histogram, Summary};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

#[derive(Parser, Debug)]
#[command(version, about = "Metropolis-Hastings demo on three targets")]
struct Args {
    /// Burn-in iterations per chain
    #[arg(long, default_value_t = 100)]
    burn_in: usize,

    /// Samples collected per chain
    #[arg(short = 'n', long, default_value_t = 10_000)]
    samples: usize,

    /// Standard deviation of the random-walk kernel
    #[arg(long, default_value_t = 10.0)]
    sigma: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Histogram bins
    #[arg(long, default_value_t = 30)]
    bins: usize,

    /// Write the three simulated chains to this CSV file (requires the `csv` feature)
    #[arg(long)]
    csv: Option<String>,
}

fn simulate<D>(
    name: &str,
    target: D,
    kernel: &GaussianRandomWalk,
    config: SamplerConfig,
    bins: usize,
    rng: &mut SmallRng,
) -> Result<Vec<f64>, Box<dyn Error>>
where
    D: Target + IndependentSampler,
{
    let mh = MetropolisHastings::new(target, kernel, config)?;
    let simulated = mh.run_progress();
    let reference = mh.target.sample(simulated.len(), rng);

    for (label, samples) in [("Simulated", &simulated), ("True", &reference)] {
        let summary = Summary::from_samples(samples).ok_or("empty sample")?;
        println!("{label} X ~ {name}: {summary}");
        if let Some(hist) = Histogram::new(samples, bins) {
            println!("{}", hist.render(60));
        }
    }
    Ok(simulated)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = SamplerConfig::new(args.burn_in, args.samples);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
        None => SmallRng::from_entropy(),
    };

    let kernel = GaussianRandomWalk::new(args.sigma)?;
    info!("transition kernel N(0, {})", kernel.sigma());

    let chains = vec![
        simulate(
            "Exponential(1/5)",
            Exponential::new(5.0)?,
            &kernel,
            config,
            args.bins,
            &mut rng,
        )?,
        simulate(
            "N(3, 2)",
            Normal::new(3.0, 2.0)?,
            &kernel,
            config,
            args.bins,
            &mut rng,
        )?,
        simulate(
            "Beta(0.5, 0.5)",
            Beta::new(0.5, 0.5)?,
            &kernel,
            config,
            args.bins,
            &mut rng,
        )?,
    ];

    if let Some(path) = args.csv {
        save(&chains, &path)?;
    }
    Ok(())
}

#[cfg(feature = "csv")]
fn save(chains: &[Vec<f64>], path: &str) -> Result<(), Box<dyn Error>> {
    mini_mh::io::csv::save_csv(chains, path)?;
    println!("Saved chains to {path}");
    Ok(())
}

#[cfg(not(feature = "csv"))]
fn save(_chains: &[Vec<f64>], _path: &str) -> Result<(), Box<dyn Error>> {
    Err("CSV output requires building with `--features csv`".into())
}
