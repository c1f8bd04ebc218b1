pub mod audit;
pub mod cli;
pub mod error;
pub mod io;
pub mod models;
pub mod qc;
pub mod render;
pub mod utils;

pub use error::{QcError, Result};
