//! The glyph record handed back to callers: an id, the serialized
//! outline, and the traced region's pixel dimensions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Process-wide counter so records minted in the same millisecond still
/// get distinct ids.
static NEXT_GLYPH: AtomicU64 = AtomicU64::new(1);

/// A traced glyph. Owned by the caller's collection; editing sessions
/// return updated copies under the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorGlyph {
    /// Stable identity, unique within the process.
    pub id: String,
    /// Canonical outline text form (`M … L … Z`).
    pub path_description: String,
    /// Width of the traced pixel region.
    pub width: u32,
    /// Height of the traced pixel region.
    pub height: u32,
    /// Editable display name.
    pub name: String,
}

impl VectorGlyph {
    /// Mint a fresh record with a generated id and default name.
    pub fn build(path_description: String, width: u32, height: u32) -> Self {
        let n = NEXT_GLYPH.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: format!("glyph-{millis:x}-{n}"),
            path_description,
            width,
            height,
            name: format!("Glyph {n}"),
        }
    }

    /// The same record with a new outline. Identity, name, and
    /// dimensions carry over.
    pub fn with_path_description(&self, path_description: String) -> Self {
        Self {
            path_description,
            ..self.clone()
        }
    }
}
