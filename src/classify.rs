// src/classify.rs

//! Decide from captured output whether an apt run finished.
//!
//! apt exits 0 even when downloads were cut short, so the only signal is
//! the text it leaves on stderr. Markers are matched verbatim.

use crate::exec::AttemptResult;

/// Printed by `apt upgrade` when packages could not be downloaded.
pub const ARCHIVES_MARKER: &str = "Unable to fetch some archives";

/// Printed by `apt update` when index downloads failed.
pub const INDEX_MARKER: &str = "Some index files failed to download";

pub const INTERRUPTION_MARKERS: [&str; 2] = [ARCHIVES_MARKER, INDEX_MARKER];

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputClassifier;

impl OutputClassifier {
    pub fn is_interrupted(&self, result: &AttemptResult) -> bool {
        INTERRUPTION_MARKERS
            .iter()
            .any(|marker| result.stderr.contains(marker))
    }
}
