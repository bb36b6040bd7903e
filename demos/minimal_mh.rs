use mini_mh::distributions::{Exponential, GaussianRandomWalk};
use mini_mh::metropolis_hastings::{MetropolisHastings, SamplerConfig};

fn main() {
    let target = Exponential::new(5.0).expect("valid scale");
    let kernel = GaussianRandomWalk::new(10.0).expect("valid sigma");

    // Run 1,100 steps, discarding the first 100 as burn-in
    let mh = MetropolisHastings::new(target, kernel, SamplerConfig::new(100, 1_000))
        .expect("valid configuration");

    // The stream is lazy: stop pulling and the chain stops
    let first_ten: Vec<f64> = mh.samples().take(10).collect();
    println!("First ten samples: {first_ten:?}");

    let samples = mh.run();
    assert_eq!(samples.len(), 1_000);
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    println!("Sample mean: {mean:.3} (target mean 5)");
}
