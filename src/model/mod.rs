//! Core data model: one audio file's normalized metadata row.
//!
//! Every declared attribute always holds a value - missing tag data is
//! represented by a type-appropriate default (empty string, zero), never by
//! an absent field, so filtering and sorting never see an undefined value.
//! The one derived field is `length_display`, recomputed whenever
//! `length_seconds` changes.

use std::borrow::Cow;
use std::path::PathBuf;

/// How a column's values behave for display, sorting, and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Number,
    Duration,
    /// Not filterable or sortable by value, only by presence.
    Image,
}

/// Identifier for one record attribute, doubling as the column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    Cover,
    TrackName,
    Artist,
    AlbumArtist,
    AlbumName,
    Year,
    DiscNumber,
    TrackNumber,
    Genre,
    Composer,
    Lyricist,
    Publisher,
    Language,
    Comment,
    Rating,
    Length,
    Bpm,
    Bitrate,
    SampleRate,
    Copyright,
    Isrc,
}

impl ColumnKey {
    /// All keys in default catalog order.
    pub const ALL: [ColumnKey; 21] = [
        ColumnKey::Cover,
        ColumnKey::TrackName,
        ColumnKey::Artist,
        ColumnKey::AlbumArtist,
        ColumnKey::AlbumName,
        ColumnKey::Year,
        ColumnKey::DiscNumber,
        ColumnKey::TrackNumber,
        ColumnKey::Genre,
        ColumnKey::Composer,
        ColumnKey::Lyricist,
        ColumnKey::Publisher,
        ColumnKey::Language,
        ColumnKey::Comment,
        ColumnKey::Rating,
        ColumnKey::Length,
        ColumnKey::Bpm,
        ColumnKey::Bitrate,
        ColumnKey::SampleRate,
        ColumnKey::Copyright,
        ColumnKey::Isrc,
    ];

    /// Stable identifier, matching the record field it projects.
    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnKey::Cover => "cover",
            ColumnKey::TrackName => "trackName",
            ColumnKey::Artist => "artist",
            ColumnKey::AlbumArtist => "albumArtist",
            ColumnKey::AlbumName => "albumName",
            ColumnKey::Year => "year",
            ColumnKey::DiscNumber => "discNumber",
            ColumnKey::TrackNumber => "trackNumber",
            ColumnKey::Genre => "genre",
            ColumnKey::Composer => "composer",
            ColumnKey::Lyricist => "lyricist",
            ColumnKey::Publisher => "publisher",
            ColumnKey::Language => "language",
            ColumnKey::Comment => "comment",
            ColumnKey::Rating => "rating",
            ColumnKey::Length => "lengthSeconds",
            ColumnKey::Bpm => "bpm",
            ColumnKey::Bitrate => "bitrateKbps",
            ColumnKey::SampleRate => "sampleRateHz",
            ColumnKey::Copyright => "copyright",
            ColumnKey::Isrc => "isrc",
        }
    }

    /// Display name used for table headers and export header cells.
    pub const fn label(self) -> &'static str {
        match self {
            ColumnKey::Cover => "Cover",
            ColumnKey::TrackName => "Title",
            ColumnKey::Artist => "Artist",
            ColumnKey::AlbumArtist => "Album Artist",
            ColumnKey::AlbumName => "Album",
            ColumnKey::Year => "Year",
            ColumnKey::DiscNumber => "Disc #",
            ColumnKey::TrackNumber => "Track #",
            ColumnKey::Genre => "Genre",
            ColumnKey::Composer => "Composer",
            ColumnKey::Lyricist => "Lyricist",
            ColumnKey::Publisher => "Publisher",
            ColumnKey::Language => "Language",
            ColumnKey::Comment => "Comment",
            ColumnKey::Rating => "Rating",
            ColumnKey::Length => "Length",
            ColumnKey::Bpm => "BPM",
            ColumnKey::Bitrate => "Bitrate (kbps)",
            ColumnKey::SampleRate => "Sample Rate (Hz)",
            ColumnKey::Copyright => "Copyright",
            ColumnKey::Isrc => "ISRC",
        }
    }

    pub const fn value_type(self) -> ValueType {
        match self {
            ColumnKey::Cover => ValueType::Image,
            ColumnKey::Length => ValueType::Duration,
            ColumnKey::Year
            | ColumnKey::DiscNumber
            | ColumnKey::TrackNumber
            | ColumnKey::Rating
            | ColumnKey::Bpm
            | ColumnKey::Bitrate
            | ColumnKey::SampleRate => ValueType::Number,
            _ => ValueType::Text,
        }
    }

    /// Resolve a key or label, case-insensitively.
    ///
    /// This is the single matching rule shared by import header mapping and
    /// CLI column arguments.
    pub fn parse(s: &str) -> Option<ColumnKey> {
        let s = s.trim();
        ColumnKey::ALL.into_iter().find(|key| {
            key.as_str().eq_ignore_ascii_case(s) || key.label().eq_ignore_ascii_case(s)
        })
    }
}

/// One audio entry in the library.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    /// Absolute source path (identity, never displayed or exported)
    pub file_path: PathBuf,
    /// Resolved sibling cover image, if any
    pub cover: Option<PathBuf>,

    pub artist: String,
    pub album_artist: String,
    pub track_name: String,
    pub album_name: String,
    pub genre: String,
    pub composer: String,
    pub lyricist: String,
    pub language: String,
    pub comment: String,
    pub copyright: String,
    pub publisher: String,
    pub isrc: String,

    pub year: u32,
    pub track_number: u32,
    pub disc_number: u32,
    pub bpm: u32,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    pub rating: u32,

    /// Duration in seconds. Change via `set_length_seconds` so the display
    /// string stays in lockstep.
    pub length_seconds: f64,
    /// Derived `M:SS` / `H:MM:SS` form of `length_seconds`.
    pub length_display: String,
}

impl Default for TrackRecord {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            cover: None,
            artist: String::new(),
            album_artist: String::new(),
            track_name: String::new(),
            album_name: String::new(),
            genre: String::new(),
            composer: String::new(),
            lyricist: String::new(),
            language: String::new(),
            comment: String::new(),
            copyright: String::new(),
            publisher: String::new(),
            isrc: String::new(),
            year: 0,
            track_number: 0,
            disc_number: 0,
            bpm: 0,
            bitrate_kbps: 0,
            sample_rate_hz: 0,
            rating: 0,
            length_seconds: 0.0,
            length_display: format_length(0.0),
        }
    }
}

impl TrackRecord {
    /// Set the duration, recomputing its display string.
    pub fn set_length_seconds(&mut self, seconds: f64) {
        self.length_seconds = seconds.max(0.0);
        self.length_display = format_length(self.length_seconds);
    }

    /// The cell's numeric value, for numeric filter rules.
    pub fn number_value(&self, key: ColumnKey) -> Option<f64> {
        match key {
            ColumnKey::Year => Some(f64::from(self.year)),
            ColumnKey::TrackNumber => Some(f64::from(self.track_number)),
            ColumnKey::DiscNumber => Some(f64::from(self.disc_number)),
            ColumnKey::Bpm => Some(f64::from(self.bpm)),
            ColumnKey::Bitrate => Some(f64::from(self.bitrate_kbps)),
            ColumnKey::SampleRate => Some(f64::from(self.sample_rate_hz)),
            ColumnKey::Rating => Some(f64::from(self.rating)),
            ColumnKey::Length => Some(self.length_seconds),
            _ => None,
        }
    }

    /// The cell's string form as the sort comparator sees it.
    ///
    /// Numeric columns render the number and durations render raw seconds,
    /// so both compare by value; image cells reduce to a presence marker.
    pub fn sort_value(&self, key: ColumnKey) -> Cow<'_, str> {
        match key.value_type() {
            ValueType::Duration => Cow::Owned(self.length_seconds.to_string()),
            ValueType::Image => Cow::Borrowed(if self.cover.is_some() { "yes" } else { "" }),
            ValueType::Number => Cow::Owned(
                self.number_value(key)
                    .unwrap_or_default()
                    .to_string(),
            ),
            ValueType::Text => Cow::Borrowed(self.text_value(key)),
        }
    }

    /// The cell's value for export and table rendering.
    ///
    /// Identical to `sort_value` except the duration column substitutes its
    /// display string. Image cells are blank here; the renderer reads
    /// `cover` directly and export excludes the column.
    pub fn export_value(&self, key: ColumnKey) -> Cow<'_, str> {
        match key.value_type() {
            ValueType::Duration => Cow::Borrowed(self.length_display.as_str()),
            ValueType::Image => Cow::Borrowed(""),
            ValueType::Number => Cow::Owned(
                self.number_value(key)
                    .map(|n| (n as u64).to_string())
                    .unwrap_or_default(),
            ),
            ValueType::Text => Cow::Borrowed(self.text_value(key)),
        }
    }

    /// The raw text attribute behind a text column.
    pub fn text_value(&self, key: ColumnKey) -> &str {
        match key {
            ColumnKey::Artist => &self.artist,
            ColumnKey::AlbumArtist => &self.album_artist,
            ColumnKey::TrackName => &self.track_name,
            ColumnKey::AlbumName => &self.album_name,
            ColumnKey::Genre => &self.genre,
            ColumnKey::Composer => &self.composer,
            ColumnKey::Lyricist => &self.lyricist,
            ColumnKey::Language => &self.language,
            ColumnKey::Comment => &self.comment,
            ColumnKey::Copyright => &self.copyright,
            ColumnKey::Publisher => &self.publisher,
            ColumnKey::Isrc => &self.isrc,
            _ => "",
        }
    }

    /// Overwrite one attribute from a delimited-text cell.
    ///
    /// Coercion is lenient: a numeric cell that fails to parse becomes 0,
    /// a duration cell accepts raw seconds or `M:SS`/`H:MM:SS`. Image
    /// columns are not part of the import schema and are ignored.
    pub fn set_field(&mut self, key: ColumnKey, raw: &str) {
        match key.value_type() {
            ValueType::Image => {}
            ValueType::Duration => self.set_length_seconds(parse_length(raw)),
            ValueType::Number => {
                let n = coerce_number(raw);
                match key {
                    ColumnKey::Year => self.year = n,
                    ColumnKey::TrackNumber => self.track_number = n,
                    ColumnKey::DiscNumber => self.disc_number = n,
                    ColumnKey::Bpm => self.bpm = n,
                    ColumnKey::Bitrate => self.bitrate_kbps = n,
                    ColumnKey::SampleRate => self.sample_rate_hz = n,
                    ColumnKey::Rating => self.rating = n,
                    _ => {}
                }
            }
            ValueType::Text => {
                let value = raw.to_string();
                match key {
                    ColumnKey::Artist => self.artist = value,
                    ColumnKey::AlbumArtist => self.album_artist = value,
                    ColumnKey::TrackName => self.track_name = value,
                    ColumnKey::AlbumName => self.album_name = value,
                    ColumnKey::Genre => self.genre = value,
                    ColumnKey::Composer => self.composer = value,
                    ColumnKey::Lyricist => self.lyricist = value,
                    ColumnKey::Language => self.language = value,
                    ColumnKey::Comment => self.comment = value,
                    ColumnKey::Copyright => self.copyright = value,
                    ColumnKey::Publisher => self.publisher = value,
                    ColumnKey::Isrc => self.isrc = value,
                    _ => {}
                }
            }
        }
    }
}

/// Format a duration as `M:SS`, or `H:MM:SS` once it reaches an hour.
///
/// Zero and negative inputs render as `0:00`; fractional seconds truncate.
pub fn format_length(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Parse a duration cell: either raw seconds or a colon form.
///
/// Colon form is read right to left: seconds, minutes, then hours.
/// Unparsable segments count as zero; the result is clamped non-negative.
pub fn parse_length(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    if raw.contains(':') {
        let mut total = 0.0;
        let mut factor = 1.0;
        for segment in raw.rsplit(':') {
            let value: f64 = segment.trim().parse().unwrap_or(0.0);
            total += value * factor;
            factor *= 60.0;
        }
        total.max(0.0)
    } else {
        raw.parse::<f64>().unwrap_or(0.0).max(0.0)
    }
}

fn coerce_number(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>()
        .unwrap_or_else(|_| raw.parse::<f64>().map(|f| f.max(0.0) as u32).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_length_minutes() {
        assert_eq!(format_length(61.0), "1:01");
        assert_eq!(format_length(59.0), "0:59");
        assert_eq!(format_length(600.0), "10:00");
    }

    #[test]
    fn test_format_length_hours() {
        assert_eq!(format_length(3661.0), "1:01:01");
        assert_eq!(format_length(3600.0), "1:00:00");
        assert_eq!(format_length(7325.0), "2:02:05");
    }

    #[test]
    fn test_format_length_zero_and_negative() {
        assert_eq!(format_length(0.0), "0:00");
        assert_eq!(format_length(-5.0), "0:00");
    }

    #[test]
    fn test_parse_length_raw_seconds() {
        assert_eq!(parse_length("61"), 61.0);
        assert_eq!(parse_length("180.5"), 180.5);
        assert_eq!(parse_length(""), 0.0);
        assert_eq!(parse_length("abc"), 0.0);
    }

    #[test]
    fn test_parse_length_colon_forms() {
        assert_eq!(parse_length("1:01"), 61.0);
        assert_eq!(parse_length("1:01:01"), 3661.0);
        assert_eq!(parse_length("0:00"), 0.0);
        assert_eq!(parse_length("10:00"), 600.0);
    }

    #[test]
    fn test_set_length_updates_display() {
        let mut record = TrackRecord::default();
        assert_eq!(record.length_display, "0:00");
        record.set_length_seconds(125.0);
        assert_eq!(record.length_display, "2:05");
        assert_eq!(record.length_seconds, 125.0);
    }

    #[test]
    fn test_column_key_parse_matches_key_or_label() {
        assert_eq!(ColumnKey::parse("trackName"), Some(ColumnKey::TrackName));
        assert_eq!(ColumnKey::parse("Title"), Some(ColumnKey::TrackName));
        assert_eq!(ColumnKey::parse("TITLE"), Some(ColumnKey::TrackName));
        assert_eq!(ColumnKey::parse("album artist"), Some(ColumnKey::AlbumArtist));
        assert_eq!(ColumnKey::parse(" Bitrate (kbps) "), Some(ColumnKey::Bitrate));
        assert_eq!(ColumnKey::parse("loudness"), None);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(ColumnKey::Cover.value_type(), ValueType::Image);
        assert_eq!(ColumnKey::Length.value_type(), ValueType::Duration);
        assert_eq!(ColumnKey::Year.value_type(), ValueType::Number);
        assert_eq!(ColumnKey::Artist.value_type(), ValueType::Text);
    }

    #[test]
    fn test_set_field_coercion() {
        let mut record = TrackRecord::default();
        record.set_field(ColumnKey::Year, "1994");
        assert_eq!(record.year, 1994);
        record.set_field(ColumnKey::Year, "not a year");
        assert_eq!(record.year, 0);
        record.set_field(ColumnKey::Length, "3:25");
        assert_eq!(record.length_seconds, 205.0);
        assert_eq!(record.length_display, "3:25");
        record.set_field(ColumnKey::Artist, "Queen");
        assert_eq!(record.artist, "Queen");
    }

    #[test]
    fn test_sort_value_presence_marker_for_cover() {
        let mut record = TrackRecord::default();
        assert_eq!(record.sort_value(ColumnKey::Cover), "");
        record.cover = Some(PathBuf::from("/music/cover.jpg"));
        assert_eq!(record.sort_value(ColumnKey::Cover), "yes");
    }

    #[test]
    fn test_export_value_duration_uses_display() {
        let mut record = TrackRecord::default();
        record.set_length_seconds(61.0);
        assert_eq!(record.export_value(ColumnKey::Length), "1:01");
        assert_eq!(record.sort_value(ColumnKey::Length), "61");
    }
}
