use thiserror::Error;

/// Errors that can occur while extracting or editing a glyph outline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("pixel buffer is {len} bytes, expected {expected} for {width}x{height} rgba")]
    BufferSize {
        len: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("selection is {width:.1}x{height:.1} display px, need at least {min:.0} per side")]
    SelectionTooSmall { width: f64, height: f64, min: f64 },

    #[error("boundary walk exceeded {steps} steps without closing")]
    TraceDiverged { steps: usize },

    #[error("unsupported path command '{0}'")]
    UnsupportedPathCommand(char),

    #[error("invalid coordinate '{0}' in path description")]
    InvalidCoordinate(String),

    #[error("path description ended mid-command")]
    UnexpectedEnd,

    #[error("path description must start with a move")]
    PathMustStartWithMove,

    #[error("path description contains more than one move")]
    DuplicateMove,

    #[error("outline needs 0 or at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("point index {index} out of bounds for outline of {len} points")]
    PointIndexOutOfBounds { index: usize, len: usize },

    #[error("failed to encode preview: {0}")]
    PreviewEncode(String),
}
