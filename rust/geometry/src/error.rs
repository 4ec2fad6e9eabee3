use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a floor plan into meshes
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate corner {index}: interior angle {angle:.6} rad has no finite miter")]
    DegenerateCorner { index: usize, angle: f64 },

    #[error("Degenerate edge starting at corner {index}: zero length")]
    DegenerateEdge { index: usize },

    #[error("Invalid floor plan: {0}")]
    InvalidPlan(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Invalid interior wall {index}: {reason}")]
    InvalidPartition { index: usize, reason: String },

    #[error("CSG operation failed: {0}")]
    CsgError(String),

    #[error("Invalid field size {width}x{height}: both sides must be positive")]
    InvalidFieldSize { width: f64, height: f64 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
