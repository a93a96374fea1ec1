//! The editable tag set of a media file, and the ffmetadata text format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four editable tags of a media container.
///
/// An empty string means "this tag is not set": the parser leaves absent
/// keys empty, and the argument builder skips empty fields on write. The
/// record never distinguishes "field unknown" from "field empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The artist or performer of the track.
    pub artist: String,
    /// The year the track was released.
    pub year: String,
    /// The genre of the track.
    pub genre: String,
}

impl fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackMetadata: title={:?}, artist={:?}, year={:?}, genre={:?}",
            self.title, self.artist, self.year, self.genre
        )
    }
}

impl TrackMetadata {
    /// Creates a record with the given field values.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        year: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            year: year.into(),
            genre: genre.into(),
        }
    }

    /// Returns true if all four fields are empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.artist.is_empty()
            && self.year.is_empty()
            && self.genre.is_empty()
    }

    /// Returns true if any field is non-empty.
    pub fn has_any_metadata(&self) -> bool {
        !self.is_empty()
    }

    /// Parses the ffmetadata text export into a record.
    ///
    /// Each line is split on the first `=` only, so values containing `=`
    /// survive intact. Only the `title`, `artist`, `date` (mapped to
    /// `year`) and `genre` keys are meaningful; every other line, including
    /// the `;FFMETADATA1` header and lines without `=`, is skipped.
    pub fn parse_ffmetadata(output: &str) -> Self {
        let mut metadata = Self::default();

        for line in output.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            match key {
                "title" => metadata.title = value.to_string(),
                "artist" => metadata.artist = value.to_string(),
                "date" => metadata.year = value.to_string(),
                "genre" => metadata.genre = value.to_string(),
                _ => {}
            }
        }

        metadata
    }

    /// Builds the `-metadata key=value` argument pairs for every non-empty
    /// field, in the fixed order title, artist, date, genre.
    ///
    /// The order carries no meaning for the tool itself, but it is kept
    /// deterministic so invocations are reproducible and assertable.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let fields = [
            ("title", &self.title),
            ("artist", &self.artist),
            ("date", &self.year),
            ("genre", &self.genre),
        ];

        let mut args = Vec::new();
        for (key, value) in fields {
            if !value.is_empty() {
                args.push("-metadata".to_string());
                args.push(format!("{}={}", key, value));
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let metadata = TrackMetadata::default();
        assert!(metadata.is_empty());
        assert!(!metadata.has_any_metadata());
    }

    #[test]
    fn any_single_field_clears_is_empty() {
        for field in ["title", "artist", "year", "genre"] {
            let mut metadata = TrackMetadata::default();
            match field {
                "title" => metadata.title = "x".to_string(),
                "artist" => metadata.artist = "x".to_string(),
                "year" => metadata.year = "x".to_string(),
                _ => metadata.genre = "x".to_string(),
            }
            assert!(!metadata.is_empty(), "{} should count", field);
            assert!(metadata.has_any_metadata());
        }
    }

    #[test]
    fn parses_full_export() {
        let output = ";FFMETADATA1\ntitle=Song\nartist=Band\ndate=2024\ngenre=Rock\n";
        let metadata = TrackMetadata::parse_ffmetadata(output);

        assert_eq!(metadata, TrackMetadata::new("Song", "Band", "2024", "Rock"));
    }

    #[test]
    fn empty_output_yields_default() {
        assert_eq!(TrackMetadata::parse_ffmetadata(""), TrackMetadata::default());
    }

    #[test]
    fn splits_on_first_equals_only() {
        let metadata = TrackMetadata::parse_ffmetadata("title=A=B\n");
        assert_eq!(metadata.title, "A=B");
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let output = "album=Ignored\ncomposer=Ignored\ntitle=Kept\nTITLE=Ignored\n";
        let metadata = TrackMetadata::parse_ffmetadata(output);

        assert_eq!(metadata.title, "Kept");
        assert_eq!(metadata.artist, "");
        assert_eq!(metadata.year, "");
        assert_eq!(metadata.genre, "");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let output = "no equals here\n;FFMETADATA1\ntitle=Song\n";
        let metadata = TrackMetadata::parse_ffmetadata(output);

        assert_eq!(metadata.title, "Song");
    }

    #[test]
    fn args_keep_fixed_order() {
        let metadata = TrackMetadata::new("Song", "Band", "2024", "Rock");

        assert_eq!(
            metadata.ffmpeg_args(),
            vec![
                "-metadata",
                "title=Song",
                "-metadata",
                "artist=Band",
                "-metadata",
                "date=2024",
                "-metadata",
                "genre=Rock",
            ]
        );
    }

    #[test]
    fn args_omit_empty_fields() {
        let metadata = TrackMetadata::new("", "Band", "", "Rock");

        assert_eq!(
            metadata.ffmpeg_args(),
            vec!["-metadata", "artist=Band", "-metadata", "genre=Rock"]
        );
    }

    #[test]
    fn empty_record_yields_no_args() {
        assert!(TrackMetadata::default().ffmpeg_args().is_empty());
    }
}
