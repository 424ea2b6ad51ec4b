pub mod charts;
pub mod console;

pub use charts::render_charts;
pub use console::print_report;
