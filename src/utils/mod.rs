pub mod constants;
pub mod filename;

pub use constants::*;
pub use filename::{build_filename, parse_filename, SeriesFileName};
