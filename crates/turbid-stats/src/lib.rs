//! turbid-stats - Summary statistics for generated turbulence data
//!
//! [`SummaryStats`] describes velocity profiles and noise grids in log output,
//! and checks stochastic amplitude models against their expected centre.

pub mod summary;

pub use summary::*;
