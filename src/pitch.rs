//! The 12-tone chromatic scale with dual sharp/flat spellings.
//!
//! Index 0 is C. Five positions carry two common spellings (C#/Db and so on);
//! the sharp form is the canonical one and the flat form is used where
//! diminished-chord convention prefers it.

use crate::error::ChordGenError;

/// A position in the chromatic scale, always in `[0, 12)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Resolve a note name, in either sharp or flat spelling, to its
    /// chromatic index.
    pub fn from_name(name: &str) -> Option<PitchClass> {
        let index = match name {
            "C" => 0,
            "C#" | "Db" => 1,
            "D" => 2,
            "D#" | "Eb" => 3,
            "E" => 4,
            "F" => 5,
            "F#" | "Gb" => 6,
            "G" => 7,
            "G#" | "Ab" => 8,
            "A" => 9,
            "A#" | "Bb" => 10,
            "B" => 11,
            _ => return None,
        };
        Some(PitchClass(index))
    }

    /// Move by a number of semitones, which may be negative. Wraps modulo 12,
    /// so stepping by a full octave returns the same pitch class.
    pub fn step(self, semitones: i8) -> PitchClass {
        let index = (self.0 as i16 + semitones as i16).rem_euclid(12);
        PitchClass(index as u8)
    }

    /// The canonical (sharp-form) spelling.
    pub fn name(self) -> &'static str {
        self.spelled(false)
    }

    /// The spelling used when rendering: the flat form when requested and one
    /// exists, the canonical form otherwise.
    pub fn spelled(self, prefer_flat: bool) -> &'static str {
        match self.0 {
            0 => "C",
            1 => {
                if prefer_flat {
                    "Db"
                } else {
                    "C#"
                }
            }
            2 => "D",
            3 => {
                if prefer_flat {
                    "Eb"
                } else {
                    "D#"
                }
            }
            4 => "E",
            5 => "F",
            6 => {
                if prefer_flat {
                    "Gb"
                } else {
                    "F#"
                }
            }
            7 => "G",
            8 => {
                if prefer_flat {
                    "Ab"
                } else {
                    "G#"
                }
            }
            9 => "A",
            10 => {
                if prefer_flat {
                    "Bb"
                } else {
                    "A#"
                }
            }
            _ => "B",
        }
    }

    /// The raw chromatic index.
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Alternate spelling of the same pitch class, if one exists.
///
/// The map is involutive: applying it twice returns the original spelling.
/// Naturals have no alternate and return `None`.
pub fn enharmonic(name: &str) -> Option<&'static str> {
    match name {
        "C#" => Some("Db"),
        "Db" => Some("C#"),
        "D#" => Some("Eb"),
        "Eb" => Some("D#"),
        "F#" => Some("Gb"),
        "Gb" => Some("F#"),
        "G#" => Some("Ab"),
        "Ab" => Some("G#"),
        "A#" => Some("Bb"),
        "Bb" => Some("A#"),
        _ => None,
    }
}

/// Step a named note by `semitones`, yielding the canonical spelling of the
/// result. Fails when the name is not in the chromatic scale.
pub fn step_name(name: &str, semitones: i8) -> Result<&'static str, ChordGenError> {
    let pc = PitchClass::from_name(name)
        .ok_or_else(|| ChordGenError::UnknownNote(name.to_string()))?;
    Ok(pc.step(semitones).name())
}
