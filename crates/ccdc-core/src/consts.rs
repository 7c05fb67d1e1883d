/// Harmonic regression term names, in the order they appear in each
/// segment's coefficient vector.
pub const HARMONIC_TERMS: [&str; 8] = ["INTP", "SLP", "COS", "SIN", "COS2", "SIN2", "COS3", "SIN3"];

/// Number of harmonic regression terms per band and segment.
pub const HARMONIC_TERM_COUNT: usize = HARMONIC_TERMS.len();

/// Optical bands of the harmonized Landsat/Sentinel-2 collection.
pub const DEFAULT_BANDS: [&str; 7] = ["ca", "blue", "green", "red", "nir", "swir1", "swir2"];

/// Field holding the sample's query date (ms since epoch).
pub const DEFAULT_MILLIS_FIELD: &str = "millis";

/// Per-band field suffixes in the sampled table.
pub const COEFS_SUFFIX: &str = "_coefs";
pub const MAGNITUDE_SUFFIX: &str = "_magnitude";
pub const RMSE_SUFFIX: &str = "_rmse";

/// Pixel-wide per-segment series.
pub const T_START_FIELD: &str = "tStart";
pub const T_END_FIELD: &str = "tEnd";
pub const T_BREAK_FIELD: &str = "tBreak";
pub const NUM_OBS_FIELD: &str = "numObs";

/// Per-segment change probability; part of the model, never extracted.
pub const CHANGE_PROB_FIELD: &str = "changeProb";

/// Output columns added ahead of the segment attributes.
pub const SEG_COLUMN: &str = "seg";
pub const NSEGS_COLUMN: &str = "nsegs";

/// Metadata column carrying a GeoJSON feature's geometry.
pub const GEOMETRY_COLUMN: &str = ".geo";

/// Rows per export file used when splitting large sample sets.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;

/// Number of samples extracted per parallel batch, between progress updates.
pub const EXTRACTION_BATCH_SIZE: usize = 4_096;

/// Minimum batch length to use Rayon parallelism.
pub const PARALLEL_SAMPLE_THRESHOLD: usize = 256;
