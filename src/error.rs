use std::path::PathBuf;

use thiserror::Error;

use crate::geo::Point;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("cannot read input file {}: {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: `{value}` is not a valid integer")]
    Parse { context: String, value: String },

    #[error("a polyline needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// Start and end coincide, so neither the line nor its perpendicular exists.
    #[error("segment {index} from {start} to {end} has zero length")]
    DegenerateSegment { index: usize, start: Point, end: Point },

    #[error("cannot render report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProjectError>;
