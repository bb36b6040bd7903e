/*!
# I/O Utilities for Saving Chains to CSV

This module saves scalar MCMC chains to CSV files. Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

/**
Saves one or more chains as a CSV file.

The resulting CSV file will have:
- A header row `chain,sample,value`.
- One row per sample, in chain order and then sample order.

# Examples

```rust
use mini_mh::io::csv::save_csv;

let chains = vec![vec![0.5, 0.7], vec![1.5]];
let path = std::env::temp_dir().join("mini_mh_doc_chains.csv");
save_csv(&chains, &path)?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_csv<P: AsRef<Path>>(chains: &[Vec<f64>], filename: P) -> Result<(), Box<dyn Error>> {
    write_csv(chains, File::create(filename)?)
}

/// Writes chains as CSV to an arbitrary writer.
pub fn write_csv<W: Write>(chains: &[Vec<f64>], writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["chain", "sample", "value"])?;
    for (chain_idx, chain) in chains.iter().enumerate() {
        for (sample_idx, value) in chain.iter().enumerate() {
            wtr.write_record([
                chain_idx.to_string(),
                sample_idx.to_string(),
                value.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
