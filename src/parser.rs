//! Source document parsing.
//!
//! A progression document is optional YAML frontmatter followed by body
//! lines:
//!
//! ```text
//! ---
//! title: Meteor
//! tempo: 96
//! chord-octave: 4
//! bass-octave: 2
//! duration: 2
//! ---
//! F#m/C#, C#m, D, Fdim7/D, A/C#, Bbdim7
//! bass: C#, C#, D, D, C#, Bb
//! ```
//!
//! Lines prefixed `bass:` form the bass line; every other non-empty line
//! joins the progression. The frontmatter block may sit anywhere in the file.

use serde::{Deserialize, Serialize};

use crate::error::ChordGenError;
use crate::progression::{self, Progression};

/// Raw YAML frontmatter; every field is optional so partial metadata works.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    title: Option<String>,
    tempo: Option<u16>,
    chord_octave: Option<u8>,
    bass_octave: Option<u8>,
    duration: Option<f64>,
}

/// Resolved document metadata, defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: Option<String>,
    /// Beats per minute for the rendered file.
    pub tempo: u16,
    pub chord_octave: u8,
    pub bass_octave: u8,
    /// Beats per chord.
    pub duration: f64,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            title: None,
            tempo: 120,
            chord_octave: 4,
            bass_octave: 2,
            duration: 1.0,
        }
    }
}

/// A parsed source document: metadata plus the progression and bass text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub metadata: Metadata,
    /// Comma-delimited chord tokens.
    pub progression: String,
    /// Comma-delimited bass notes, when the document has a bass line.
    pub bass: Option<String>,
}

impl Sheet {
    /// Assemble this document's chord and bass lines into a progression,
    /// carrying the metadata octaves and duration as annotations.
    pub fn assemble(&self) -> Result<Progression, ChordGenError> {
        progression::assemble(
            &self.progression,
            self.bass.as_deref(),
            self.metadata.chord_octave,
            self.metadata.bass_octave,
            self.metadata.duration,
        )
    }
}

/// Parse a progression source document.
pub fn parse(source: &str) -> Result<Sheet, ChordGenError> {
    let (metadata_content, body) = extract_metadata(source);

    let metadata = match metadata_content {
        Some(content) => resolve_metadata(&content)?,
        None => Metadata::default(),
    };

    let mut progression_lines: Vec<&str> = Vec::new();
    let mut bass_lines: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("bass:") {
            bass_lines.push(rest.trim());
        } else {
            progression_lines.push(trimmed);
        }
    }

    if progression_lines.is_empty() {
        return Err(ChordGenError::EmptySource);
    }

    let bass = if bass_lines.is_empty() {
        None
    } else {
        Some(bass_lines.join(", "))
    };

    Ok(Sheet {
        metadata,
        progression: progression_lines.join(", "),
        bass,
    })
}

fn resolve_metadata(content: &str) -> Result<Metadata, ChordGenError> {
    let raw: RawMetadata =
        serde_yaml::from_str(content).map_err(|e| ChordGenError::MetadataError(e.to_string()))?;

    if let Some(tempo) = raw.tempo {
        if tempo == 0 {
            return Err(ChordGenError::MetadataError(
                "tempo must be positive".to_string(),
            ));
        }
        // The MIDI tempo meta event stores microseconds per quarter in three
        // bytes; below 4 BPM the value does not fit.
        if tempo < 4 {
            return Err(ChordGenError::MetadataError(
                "tempo must be at least 4 BPM".to_string(),
            ));
        }
    }
    if let Some(duration) = raw.duration {
        if duration.is_nan() || duration <= 0.0 {
            return Err(ChordGenError::MetadataError(
                "duration must be positive".to_string(),
            ));
        }
    }

    let defaults = Metadata::default();
    Ok(Metadata {
        title: raw.title,
        tempo: raw.tempo.unwrap_or(defaults.tempo),
        chord_octave: raw.chord_octave.unwrap_or(defaults.chord_octave),
        bass_octave: raw.bass_octave.unwrap_or(defaults.bass_octave),
        duration: raw.duration.unwrap_or(defaults.duration),
    })
}

/// Split out the frontmatter block (between the first pair of `---` lines),
/// returning its content and the remaining body.
fn extract_metadata(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();

    let mut start_idx = None;
    let mut end_idx = None;
    for (i, line) in lines.iter().enumerate() {
        if line.trim() == "---" {
            if start_idx.is_none() {
                start_idx = Some(i);
            } else {
                end_idx = Some(i);
                break;
            }
        }
    }

    match (start_idx, end_idx) {
        (Some(start), Some(end)) => {
            let metadata_content = lines[start + 1..end].join("\n");
            let body: Vec<&str> = lines[..start]
                .iter()
                .chain(lines[end + 1..].iter())
                .copied()
                .collect();
            (Some(metadata_content), body.join("\n"))
        }
        _ => (None, source.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_fields_resolved() {
        let source = r#"---
title: Meteor
tempo: 96
chord-octave: 3
---
C, F, G"#;
        let sheet = parse(source).unwrap();
        assert_eq!(sheet.metadata.title.as_deref(), Some("Meteor"));
        assert_eq!(sheet.metadata.tempo, 96);
        assert_eq!(sheet.metadata.chord_octave, 3);
        assert_eq!(sheet.metadata.bass_octave, 2);
        assert_eq!(sheet.metadata.duration, 1.0);
        assert_eq!(sheet.progression, "C, F, G");
    }

    #[test]
    fn test_defaults_without_frontmatter() {
        let sheet = parse("C, G7").unwrap();
        assert_eq!(sheet.metadata, Metadata::default());
        assert_eq!(sheet.progression, "C, G7");
        assert_eq!(sheet.bass, None);
    }

    #[test]
    fn test_bass_line() {
        let sheet = parse("C, F\nbass: C, F").unwrap();
        assert_eq!(sheet.progression, "C, F");
        assert_eq!(sheet.bass.as_deref(), Some("C, F"));
    }

    #[test]
    fn test_multiple_lines_join() {
        let sheet = parse("C, F\nG, Am\nbass: C, F\nbass: G, A").unwrap();
        assert_eq!(sheet.progression, "C, F, G, Am");
        assert_eq!(sheet.bass.as_deref(), Some("C, F, G, A"));
    }

    #[test]
    fn test_frontmatter_at_bottom() {
        let source = "C, F, G\n---\ntitle: Bottom\n---";
        let sheet = parse(source).unwrap();
        assert_eq!(sheet.metadata.title.as_deref(), Some("Bottom"));
        assert_eq!(sheet.progression, "C, F, G");
    }

    #[test]
    fn test_invalid_yaml_is_metadata_error() {
        let source = "---\ntempo: [not a number\n---\nC";
        let err = parse(source).unwrap_err();
        assert!(matches!(err, ChordGenError::MetadataError(_)));
    }

    #[test]
    fn test_zero_tempo_rejected() {
        let err = parse("---\ntempo: 0\n---\nC").unwrap_err();
        assert!(matches!(err, ChordGenError::MetadataError(_)));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = parse("---\nduration: -1\n---\nC").unwrap_err();
        assert!(matches!(err, ChordGenError::MetadataError(_)));
    }

    #[test]
    fn test_tempo_below_midi_range_rejected() {
        let err = parse("---\ntempo: 3\n---\nC").unwrap_err();
        assert!(matches!(err, ChordGenError::MetadataError(_)));
        assert!(parse("---\ntempo: 4\n---\nC").is_ok());
    }

    #[test]
    fn test_nan_duration_rejected() {
        let err = parse("---\nduration: .nan\n---\nC").unwrap_err();
        assert!(matches!(err, ChordGenError::MetadataError(_)));
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(parse(""), Err(ChordGenError::EmptySource)));
        assert!(matches!(
            parse("---\ntempo: 90\n---\n"),
            Err(ChordGenError::EmptySource)
        ));
        assert!(matches!(
            parse("bass: C, F"),
            Err(ChordGenError::EmptySource)
        ));
    }

    #[test]
    fn test_sheet_assemble_uses_metadata() {
        let source = r#"---
chord-octave: 5
bass-octave: 1
duration: 2
---
C, F
bass: C, F"#;
        let progression = parse(source).unwrap().assemble().unwrap();
        assert_eq!(progression.chords[0].octave, 5);
        assert_eq!(progression.chords[0].duration, 2.0);
        assert_eq!(progression.bass[0].octave, 1);
    }
}
