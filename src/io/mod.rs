//! Writing chains to disk.

#[cfg(feature = "csv")]
pub mod csv;
