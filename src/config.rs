use serde::{Deserialize, Serialize};

/// All extraction parameters in one struct.
/// Designed to be serializable (for saving presets) and
/// adjustable at runtime (for editor sliders).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Threshold method for classifying pixels as foreground.
    pub threshold: ThresholdMethod,
    /// If true, swap foreground/background before tracing
    /// (for white-on-black scans).
    pub invert: bool,
    /// Minimum selection side length in display pixels. Smaller
    /// selections are rejected as accidental clicks.
    pub min_selection: f64,
}

/// Threshold method for converting sampled luma to binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Fixed brightness threshold (0-255). Luma below it is foreground.
    Fixed(u8),
    /// Otsu's method (automatic, from the selection's histogram).
    Otsu,
}

/// Default fixed threshold: mid-gray.
pub const DEFAULT_THRESHOLD: u8 = 128;

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdMethod::Fixed(DEFAULT_THRESHOLD),
            invert: false,
            min_selection: 5.0,
        }
    }
}

impl Default for ThresholdMethod {
    fn default() -> Self {
        ThresholdMethod::Fixed(DEFAULT_THRESHOLD)
    }
}
