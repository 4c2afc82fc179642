//! Plugin APIs for the external tools driven during characterization.

pub mod check;
pub mod extract;
pub mod simulation;
