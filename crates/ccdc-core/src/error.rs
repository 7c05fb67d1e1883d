use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcdcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Pixel model has no segments")]
    EmptySegmentSeries,

    #[error("Segment index {index} out of range for {series} (length: {len})")]
    IndexOutOfRange {
        series: String,
        index: usize,
        len: usize,
    },

    #[error("Malformed pixel model: {0}")]
    MalformedModel(String),

    #[error("No segment applies at {millis} ms")]
    NoSegmentForDate { millis: i64 },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Input contains no samples")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, CcdcError>;
