//! Monte Carlo trial aggregation for deck depletion.
//!
//! Runs thousands of independent trials of the round simulator per
//! configuration point to estimate:
//! - How many token types have every copy in the discard after N rounds
//! - How many distinct types show up in an opening batch
//! - How both trend as the copy count per type grows

mod analysis;
mod config;
mod report;
mod runner;

pub use analysis::{linear_fit, mean, normalize, population_std_dev, LinearFit};
pub use config::{FuzzMode, SimConfig};
pub use report::{BalanceTrend, CopiesSeries, RoundStats, SimReport};
pub use runner::{run_sweep, simulate_opening_variety, simulate_point};
