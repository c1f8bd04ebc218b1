pub mod context;

pub use context::{ComparisonRenderer, ConsoleRenderer, ContextRenderer, ContextSlice};
