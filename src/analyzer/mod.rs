// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod performance;
pub mod price_analysis;
pub mod regime;
pub mod returns;
pub mod rolling;
pub mod statistics;

// Re-export the main Analyzer implementation for ease of use.
pub use price_analysis::{Analyzer, AnalyzerImpl};
pub use returns::compute_returns;
