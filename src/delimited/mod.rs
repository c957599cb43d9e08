//! Delimited-text export and import.
//!
//! Export serializes the visible record set for a selected, ordered subset
//! of columns; import parses a blob back into records, replacing the
//! dataset wholesale. Quoting is RFC-4180 style in both directions (a field
//! containing the delimiter, a quote, or a newline is wrapped in double
//! quotes with embedded quotes doubled), handled by the `csv` crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ColumnKey, TrackRecord, ValueType};

/// Field separator for export and import.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    pub const fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
            Delimiter::Pipe => b'|',
        }
    }

    /// Output file extension for this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            _ => "txt",
        }
    }
}

/// Serialize records to delimited text: a header row of column labels, then
/// one row per record. Duration cells use their display string.
///
/// Image columns are not part of the export schema and are dropped from the
/// selection; an empty remainder is a user-visible error.
pub fn export(
    records: &[&TrackRecord],
    selected: &[ColumnKey],
    delimiter: Delimiter,
) -> Result<String> {
    let keys: Vec<ColumnKey> = selected
        .iter()
        .copied()
        .filter(|key| key.value_type() != ValueType::Image)
        .collect();
    if keys.is_empty() {
        return Err(Error::EmptyExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(Vec::new());
    writer.write_record(keys.iter().map(|key| key.label()))?;
    for record in records {
        writer.write_record(keys.iter().map(|key| record.export_value(*key).into_owned()))?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::config(format!("export was not UTF-8: {e}")))
}

/// Write exported text to a file, prepending a UTF-8 BOM when requested.
///
/// The BOM is for files only; clipboard/preview output goes out bare.
pub fn write_file(path: &Path, content: &str, with_bom: bool) -> Result<()> {
    let mut data = String::with_capacity(content.len() + 3);
    if with_bom {
        data.push('\u{feff}');
    }
    data.push_str(content);
    std::fs::write(path, data)?;
    Ok(())
}

/// Parse delimited text into records.
///
/// The first line is the header; each cell maps case-insensitively to a
/// column by label or key, and unmatched cells are dropped. Every field
/// starts at its type default, then mapped cells overwrite it with lenient
/// coercion (non-numeric cells become 0, durations accept raw seconds or
/// `M:SS`/`H:MM:SS`). Fewer than two non-empty lines is an error and leaves
/// nothing to replace.
pub fn import(text: &str, delimiter: Delimiter) -> Result<Vec<TrackRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.lines().filter(|line| !line.trim().is_empty()).count() < 2 {
        return Err(Error::EmptyImport);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .from_reader(text.as_bytes());

    let mapping: Vec<Option<ColumnKey>> = reader
        .headers()?
        .iter()
        .map(|cell| {
            ColumnKey::parse(cell).filter(|key| key.value_type() != ValueType::Image)
        })
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = TrackRecord::default();
        for (index, key) in mapping.iter().enumerate() {
            if let Some(key) = key
                && let Some(cell) = row.get(index)
            {
                record.set_field(*key, cell);
            }
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str, year: u32, seconds: f64) -> TrackRecord {
        let mut record = TrackRecord {
            track_name: name.to_string(),
            artist: artist.to_string(),
            year,
            ..TrackRecord::default()
        };
        record.set_length_seconds(seconds);
        record
    }

    #[test]
    fn test_export_header_and_rows() {
        let records = vec![track("Dreams", "Fleetwood Mac", 1977, 257.0)];
        let refs: Vec<&TrackRecord> = records.iter().collect();
        let out = export(
            &refs,
            &[ColumnKey::TrackName, ColumnKey::Artist, ColumnKey::Year],
            Delimiter::Comma,
        )
        .unwrap();
        assert_eq!(out, "Title,Artist,Year\nDreams,Fleetwood Mac,1977\n");
    }

    #[test]
    fn test_export_quotes_delimiter_quote_and_newline() {
        let records = vec![track("Song \"A\"", "Me, Myself", 0, 0.0)];
        let refs: Vec<&TrackRecord> = records.iter().collect();
        let out = export(
            &refs,
            &[ColumnKey::TrackName, ColumnKey::Artist],
            Delimiter::Comma,
        )
        .unwrap();
        assert_eq!(out, "Title,Artist\n\"Song \"\"A\"\"\",\"Me, Myself\"\n");
    }

    #[test]
    fn test_export_duration_uses_display_string() {
        let records = vec![track("Echoes", "Pink Floyd", 1971, 1412.0)];
        let refs: Vec<&TrackRecord> = records.iter().collect();
        let out = export(
            &refs,
            &[ColumnKey::TrackName, ColumnKey::Length],
            Delimiter::Comma,
        )
        .unwrap();
        assert!(out.contains("23:32"));
    }

    #[test]
    fn test_export_zero_columns_is_an_error() {
        let records = vec![track("Dreams", "Fleetwood Mac", 1977, 257.0)];
        let refs: Vec<&TrackRecord> = records.iter().collect();
        assert!(matches!(
            export(&refs, &[], Delimiter::Comma),
            Err(Error::EmptyExport)
        ));
        // An image-only selection reduces to zero exportable columns.
        assert!(matches!(
            export(&refs, &[ColumnKey::Cover], Delimiter::Comma),
            Err(Error::EmptyExport)
        ));
    }

    #[test]
    fn test_import_quote_doubling() {
        let text = "Title,Artist\n\"Song \"\"A\"\"\",Artist1\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].track_name, "Song \"A\"");
        assert_eq!(records[0].artist, "Artist1");
    }

    #[test]
    fn test_import_header_matches_label_or_key_case_insensitively() {
        let text = "TITLE,albumartist,Bitrate (kbps)\nDreams,Fleetwood Mac,192\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].track_name, "Dreams");
        assert_eq!(records[0].album_artist, "Fleetwood Mac");
        assert_eq!(records[0].bitrate_kbps, 192);
    }

    #[test]
    fn test_import_unmatched_header_cells_are_dropped() {
        let text = "Title,Mood,Artist\nDreams,chill,Fleetwood Mac\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].track_name, "Dreams");
        assert_eq!(records[0].artist, "Fleetwood Mac");
        // The unknown "Mood" value lands nowhere.
        assert_eq!(records[0].comment, "");
    }

    #[test]
    fn test_import_unmapped_fields_get_type_defaults() {
        let text = "Title\nDreams\n";
        let records = import(text, Delimiter::Comma).unwrap();
        let record = &records[0];
        assert_eq!(record.artist, "");
        assert_eq!(record.year, 0);
        assert_eq!(record.length_seconds, 0.0);
        assert_eq!(record.length_display, "0:00");
    }

    #[test]
    fn test_import_numeric_coercion_defaults_to_zero() {
        let text = "Title,Year\nDreams,not-a-year\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].year, 0);
    }

    #[test]
    fn test_import_duration_accepts_both_forms() {
        let text = "Title,Length\nA,4:17\nB,257\nC,1:01:01\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].length_seconds, 257.0);
        assert_eq!(records[0].length_display, "4:17");
        assert_eq!(records[1].length_seconds, 257.0);
        assert_eq!(records[2].length_seconds, 3661.0);
    }

    #[test]
    fn test_import_rejects_fewer_than_two_lines() {
        assert!(matches!(
            import("Title,Artist\n", Delimiter::Comma),
            Err(Error::EmptyImport)
        ));
        assert!(matches!(import("", Delimiter::Comma), Err(Error::EmptyImport)));
        // Blank lines do not count.
        assert!(matches!(
            import("\n\nTitle\n\n", Delimiter::Comma),
            Err(Error::EmptyImport)
        ));
    }

    #[test]
    fn test_import_skips_cover_header() {
        let text = "Cover,Title\n/somewhere/cover.jpg,Dreams\n";
        let records = import(text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].cover, None);
        assert_eq!(records[0].track_name, "Dreams");
    }

    #[test]
    fn test_round_trip_all_delimiters() {
        let records = vec![
            track("Song \"A\" (live; 2nd take)", "Me, Myself | I", 1999, 61.0),
            track("Plain", "Artist", 0, 0.0),
        ];
        let refs: Vec<&TrackRecord> = records.iter().collect();
        let keys = [
            ColumnKey::TrackName,
            ColumnKey::Artist,
            ColumnKey::Year,
            ColumnKey::Length,
        ];

        for delimiter in [
            Delimiter::Comma,
            Delimiter::Tab,
            Delimiter::Semicolon,
            Delimiter::Pipe,
        ] {
            let text = export(&refs, &keys, delimiter).unwrap();
            let back = import(&text, delimiter).unwrap();
            assert_eq!(back.len(), records.len());
            for (orig, parsed) in records.iter().zip(&back) {
                assert_eq!(parsed.track_name, orig.track_name);
                assert_eq!(parsed.artist, orig.artist);
                assert_eq!(parsed.year, orig.year);
                assert_eq!(parsed.length_seconds, orig.length_seconds);
            }
        }
    }

    #[test]
    fn test_write_file_bom_control() {
        let dir = tempfile::tempdir().unwrap();
        let with_bom = dir.path().join("with.csv");
        let without_bom = dir.path().join("without.csv");

        write_file(&with_bom, "Title\nDreams\n", true).unwrap();
        write_file(&without_bom, "Title\nDreams\n", false).unwrap();

        let bytes = std::fs::read(&with_bom).unwrap();
        assert_eq!(&bytes[..3], [0xEF, 0xBB, 0xBF]);
        let bytes = std::fs::read(&without_bom).unwrap();
        assert_eq!(&bytes[..1], [b'T']);

        // Our own BOM-prefixed files import cleanly.
        let text = std::fs::read_to_string(&with_bom).unwrap();
        let records = import(&text, Delimiter::Comma).unwrap();
        assert_eq!(records[0].track_name, "Dreams");
    }

    #[test]
    fn test_extension_by_delimiter() {
        assert_eq!(Delimiter::Comma.extension(), "csv");
        assert_eq!(Delimiter::Tab.extension(), "txt");
        assert_eq!(Delimiter::Pipe.extension(), "txt");
    }
}
