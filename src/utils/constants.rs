/// Canonical missing-observation marker
pub const MISSING_SENTINEL: f64 = -99.0;

/// Historically-used decimal spellings of the sentinel, normalized on load
pub const SENTINEL_SPELLINGS: [f64; 3] = [-99.0, -99.9, -99.99];

/// File suffixes for the three provenance states
pub const SUFFIX_ORIGINAL: &str = "org";
pub const SUFFIX_IN_PROGRESS: &str = "tmp";
pub const SUFFIX_FINALIZED: &str = "QC";

/// Journal file name inside the output directory
pub const JOURNAL_FILE: &str = "changes_applied.json";

/// Date format used in snapshot files (compact numeric)
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y%m%d";

/// QC parameter defaults
pub const DEFAULT_LOWER_PERCENTILE: f64 = 0.1;
pub const DEFAULT_UPPER_PERCENTILE: f64 = 0.9;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_CONTEXT_WINDOW_DAYS: i64 = 7;

/// Bounds narrower than this are treated as degenerate (no outlier detection)
pub const DEGENERATE_BOUNDS_SPAN: f64 = 1e-6;

/// IQR multiple beyond which an outlier is suggested for blanking
pub const EXTREME_OUTLIER_IQR: f64 = 3.0;
