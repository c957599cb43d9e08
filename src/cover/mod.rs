//! Sibling cover art lookup.
//!
//! A track's cover is resolved from image files next to it: the candidate
//! stems and extensions below are probed in order and the first existing
//! file wins. The report references the path; image data is never loaded.

use std::path::{Path, PathBuf};

/// Candidate file stems, in priority order.
const COVER_STEMS: &[&str] = &["cover", "folder", "front", "album"];

/// Candidate extensions, in priority order.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "jpeg"];

/// Find a cover image in the audio file's directory.
pub fn find_sidecar_cover(audio_path: &Path) -> Option<PathBuf> {
    let parent = audio_path.parent()?;
    for stem in COVER_STEMS {
        for ext in IMAGE_EXTENSIONS {
            let candidate = parent.join(format!("{stem}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
