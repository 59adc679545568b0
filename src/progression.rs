//! Progression assembly.
//!
//! Splits comma-delimited progression and bass text into tokens, builds each
//! chord independently, and pairs the results positionally. Octave and
//! duration ride along as annotations for the renderer; this module does not
//! interpret them.

use serde::Serialize;

use crate::chord::{self, Chord};
use crate::error::{ChordGenError, Warning};
use crate::symbol::parse_chord_symbol;

/// One chord slot of an assembled progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordEntry {
    /// The token as written, e.g. `"Fdim7/D"`.
    pub symbol: String,
    /// The built chord, or `None` when the root was unresolvable. Empty
    /// slots are kept so entries stay aligned with the input tokens and any
    /// bass line.
    pub chord: Option<Chord>,
    pub octave: u8,
    /// Beats this chord sounds for.
    pub duration: f64,
}

/// One bass note, paired positionally with the chord entry at the same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BassEntry {
    /// The note name as written in the bass line.
    pub note: String,
    pub octave: u8,
    pub duration: f64,
}

/// An assembled progression: one chord entry per input token, in input
/// order, plus the warnings gathered while building.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub chords: Vec<ChordEntry>,
    /// Parallel bass entries; empty when no bass line was given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bass: Vec<BassEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Assemble a progression from comma-delimited chord text and an optional
/// comma-delimited bass line.
///
/// Tokens are processed independently: a token whose root cannot be resolved
/// becomes an empty slot plus a warning, and its siblings proceed. The only
/// hard failure at this level is a bass line whose token count differs from
/// the progression's, since no positional pairing would be safe.
pub fn assemble(
    progression: &str,
    bass: Option<&str>,
    chord_octave: u8,
    bass_octave: u8,
    duration: f64,
) -> Result<Progression, ChordGenError> {
    let tokens: Vec<&str> = progression.split(',').map(str::trim).collect();
    let bass_tokens: Option<Vec<&str>> = bass.map(|b| b.split(',').map(str::trim).collect());

    if let Some(basses) = &bass_tokens {
        if basses.len() != tokens.len() {
            return Err(ChordGenError::LengthMismatch {
                chords: tokens.len(),
                basses: basses.len(),
            });
        }
    }

    let mut chords = Vec::with_capacity(tokens.len());
    let mut warnings = Vec::new();

    for token in &tokens {
        let descriptor = parse_chord_symbol(token);
        let chord = match chord::build_chord(&descriptor) {
            Ok(built) => {
                warnings.extend(built.warnings);
                Some(built.chord)
            }
            Err(ChordGenError::UnknownRoot(root)) => {
                log::debug!("skipping '{}': unknown root '{}'", token, root);
                warnings.push(Warning::UnknownRoot {
                    symbol: (*token).to_string(),
                    root,
                });
                None
            }
            Err(e) => return Err(e),
        };
        chords.push(ChordEntry {
            symbol: (*token).to_string(),
            chord,
            octave: chord_octave,
            duration,
        });
    }

    let bass = bass_tokens
        .map(|basses| {
            basses
                .into_iter()
                .map(|note| BassEntry {
                    note: note.to_string(),
                    octave: bass_octave,
                    duration,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Progression {
        chords,
        bass,
        warnings,
    })
}
