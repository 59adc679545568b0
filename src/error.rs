//! # Error Types
//!
//! This module defines all error and warning types for the chordgen compiler.
//!
//! Fatal conditions live in [`ChordGenError`]. Conditions that are recovered
//! per chord token (an unresolvable root, a bass note missing from its chord)
//! are [`Warning`]s instead: they are collected into the assembled
//! [`Progression`](crate::Progression) as values, so one bad token never
//! aborts its siblings.
//!
//! ## Error Types
//! - `UnknownNote` - A note name absent from the chromatic scale
//! - `UnknownRoot` - A chord root unresolvable even via its enharmonic spelling
//! - `MetadataError` - Invalid YAML metadata in frontmatter
//! - `LengthMismatch` - Chord and bass token counts differ
//! - `EmptySource` - A document with no progression content
//! - `Io` - File read/write failures from the MIDI renderer

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordGenError {
    /// A note name was not found in the chromatic scale.
    ///
    /// # Example
    /// ```
    /// # use chordgen::ChordGenError;
    /// let err = ChordGenError::UnknownNote("H".to_string());
    /// assert_eq!(err.to_string(), "Note 'H' not found in the chromatic scale");
    /// ```
    #[error("Note '{0}' not found in the chromatic scale")]
    UnknownNote(String),

    /// A chord root was not found in the triad table, even after retrying
    /// with its enharmonic spelling. Fatal only to the one chord that
    /// carried it.
    #[error("Unknown chord root '{0}'")]
    UnknownRoot(String),

    /// Invalid metadata error.
    ///
    /// Occurs when YAML frontmatter is malformed or contains unsupported
    /// values.
    ///
    /// # Example
    /// ```
    /// # use chordgen::ChordGenError;
    /// let err = ChordGenError::MetadataError("tempo must be positive".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: tempo must be positive");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// The progression and bass line carry different token counts, so no
    /// safe positional pairing exists.
    #[error("Chord progression ({chords} chords) and bass line ({basses} notes) don't match")]
    LengthMismatch { chords: usize, basses: usize },

    /// The source document has no progression line.
    #[error("Source contains no chord progression")]
    EmptySource,

    /// File read/write failure while emitting MIDI.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal conditions recovered during chord building and assembly.
///
/// Each warning names the fragment that produced it. Warnings serialize
/// alongside the progression so external consumers see them too.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// A chord token whose root could not be resolved; the token is kept in
    /// the progression as an empty slot.
    #[error("Can't find chord '{symbol}' (unknown root '{root}')")]
    UnknownRoot { symbol: String, root: String },

    /// An interval computation met a note name outside the chromatic scale;
    /// the note was left unchanged.
    #[error("Note '{name}' not found in the chromatic scale; left unchanged")]
    UnknownNote { name: String },

    /// An inversion was requested for a note absent from the chord; the
    /// chord was left in root position.
    #[error("Bass note {bass} not found in chord {notes:?}")]
    BassNotInChord { bass: String, notes: Vec<String> },
}
