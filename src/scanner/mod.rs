//! Directory scanning for audio files.
//!
//! Walks the tree recursively, keeps files whose extension matches the
//! configured list (case-insensitive), and returns the paths sorted so the
//! initial record order is deterministic across platforms.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Default extensions considered audio files.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "m4a"];

/// Recursively collect audio file paths under `root`, sorted.
pub fn scan(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_audio_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    debug!(target: "scanner", root = %root.display(), count = paths.len(), "scan complete");
    paths
}

fn has_audio_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}
