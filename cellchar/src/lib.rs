pub mod cell;
pub mod characterize;
pub mod config;
pub mod deps;
pub mod diagnostics;
pub mod error;
pub mod family;
pub mod geometry;
pub mod io;
pub mod library;
pub mod measure;
pub mod netlist;
pub mod port;
pub mod testbench;
pub mod units;
pub mod verification;

pub(crate) mod log;
