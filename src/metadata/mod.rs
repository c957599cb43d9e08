//! Audio file metadata reading.
//!
//! Uses the lofty crate for format-independent tag access. Extraction never
//! fails from the caller's point of view: a file whose tags cannot be read
//! still yields a record, with the file stem standing in for the title and
//! "Unknown ..." sentinels for the naming fields, so every scanned path is
//! represented in the grid.

use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use tracing::warn;

use crate::cover;
use crate::model::TrackRecord;

/// Read one audio file into a fully-populated record.
///
/// Tag failures degrade to sentinel defaults; the sibling cover lookup runs
/// either way.
pub fn read_record(path: &Path) -> TrackRecord {
    let mut record = match read_tags(path) {
        Ok(record) => record,
        Err(e) => {
            warn!(target: "metadata", path = %path.display(), error = %e, "tag read failed, using defaults");
            fallback_record(path)
        }
    };
    record.cover = cover::find_sidecar_cover(path);
    record
}

fn read_tags(path: &Path) -> lofty::error::Result<TrackRecord> {
    let tagged_file = Probe::open(path)?.read()?;

    // Primary tag, or the first available one.
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
    let properties = tagged_file.properties();

    let mut record = TrackRecord {
        file_path: path.to_path_buf(),
        bitrate_kbps: properties.audio_bitrate().unwrap_or(0),
        sample_rate_hz: properties.sample_rate().unwrap_or(0),
        ..TrackRecord::default()
    };
    record.set_length_seconds(properties.duration().as_secs_f64());

    match tag {
        Some(tag) => {
            record.track_name = tag
                .title()
                .map(|s| s.to_string())
                .unwrap_or_else(|| file_stem(path));
            record.artist = tag
                .artist()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Unknown Artist".to_string());
            record.album_name = tag
                .album()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Unknown Album".to_string());
            // Compilations without an album artist fall back to the artist.
            record.album_artist = item(tag, &ItemKey::AlbumArtist)
                .unwrap_or_else(|| record.artist.clone());
            record.genre = tag.genre().map(|s| s.to_string()).unwrap_or_default();
            record.comment = tag.comment().map(|s| s.to_string()).unwrap_or_default();
            record.year = tag.year().unwrap_or(0);
            record.track_number = tag.track().unwrap_or(0);
            record.disc_number = tag.disk().unwrap_or(0);
            record.composer = item(tag, &ItemKey::Composer).unwrap_or_default();
            record.lyricist = item(tag, &ItemKey::Lyricist).unwrap_or_default();
            record.language = item(tag, &ItemKey::Language).unwrap_or_default();
            record.copyright = item(tag, &ItemKey::CopyrightMessage).unwrap_or_default();
            record.publisher = item(tag, &ItemKey::Publisher).unwrap_or_default();
            record.isrc = item(tag, &ItemKey::Isrc).unwrap_or_default();
            record.bpm = item(tag, &ItemKey::Bpm)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
            // POPM is binary in most formats; take a textual rating if the
            // tag offers one.
            record.rating = item(tag, &ItemKey::Popularimeter)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
        }
        None => {
            record.track_name = file_stem(path);
            record.artist = "Unknown Artist".to_string();
            record.album_artist = "Unknown Album Artist".to_string();
            record.album_name = "Unknown Album".to_string();
        }
    }

    Ok(record)
}

/// Sentinel record for an unreadable file.
fn fallback_record(path: &Path) -> TrackRecord {
    TrackRecord {
        file_path: path.to_path_buf(),
        track_name: file_stem(path),
        artist: "Unknown Artist".to_string(),
        album_artist: "Unknown Album Artist".to_string(),
        album_name: "Unknown Album".to_string(),
        ..TrackRecord::default()
    }
}

fn item(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get_string(key).map(|s| s.to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown Title")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_unreadable_file_yields_sentinel_record() {
        let mut file = NamedTempFile::with_suffix(".mp3").expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write");

        let record = read_record(file.path());
        assert_eq!(record.artist, "Unknown Artist");
        assert_eq!(record.album_artist, "Unknown Album Artist");
        assert_eq!(record.album_name, "Unknown Album");
        assert_eq!(record.year, 0);
        assert_eq!(record.length_seconds, 0.0);
        assert_eq!(record.length_display, "0:00");
        assert_eq!(record.file_path, file.path());
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My Great Song.mp3");
        std::fs::write(&path, b"not audio").unwrap();

        let record = read_record(&path);
        assert_eq!(record.track_name, "My Great Song");
    }

    #[test]
    fn test_non_existent_file_still_yields_record() {
        let record = read_record(Path::new("/no/such/file.flac"));
        assert_eq!(record.track_name, "file");
        assert_eq!(record.artist, "Unknown Artist");
    }

    #[test]
    fn test_cover_resolved_even_on_tag_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.mp3");
        std::fs::write(&path, b"not audio").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"fake jpeg").unwrap();

        let record = read_record(&path);
        assert_eq!(record.cover, Some(dir.path().join("cover.jpg")));
    }
}
