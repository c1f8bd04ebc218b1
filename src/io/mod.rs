pub mod resolver;
pub mod snapshot;

pub use resolver::{CsvSeriesResolver, Provenance, ResolvedSeries, SeriesResolver};
pub use snapshot::{read_series, write_series, CsvSnapshotStore, SnapshotSink};
