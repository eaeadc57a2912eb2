pub mod chart;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod git;

mod api;

pub use api::{Fabrikit, FabrikitBuilder};
