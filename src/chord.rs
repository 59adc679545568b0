//! Chord construction.
//!
//! Turns a [`ChordDescriptor`] into concrete note names: look the root up in
//! the major-triad table, adjust the triad for quality, append the seventh,
//! then rotate for the bass-note inversion.

use serde::Serialize;

use crate::error::{ChordGenError, Warning};
use crate::pitch::{self, PitchClass};
use crate::symbol::{ChordDescriptor, ChordQuality, SeventhKind};

/// An ordered set of pitch-class names. Position 0 sounds as the bass.
///
/// Built chords hold three or four notes; inversion only reorders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Chord {
    pub notes: Vec<String>,
}

/// A built chord plus the non-fatal diagnostics gathered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltChord {
    pub chord: Chord,
    pub warnings: Vec<Warning>,
}

/// Major triads for the 17 common root spellings.
///
/// Entries are literal idiomatic spellings, not derived by semitone math;
/// some mix sharp and flat forms (the C# triad is spelled with an F, the Gb
/// triad entirely in flats). That spelling fidelity is deliberate.
fn major_triad(root: &str) -> Option<[&'static str; 3]> {
    match root {
        "A" => Some(["A", "C#", "E"]),
        "A#" => Some(["A#", "D", "F"]),
        "Bb" => Some(["Bb", "D", "F"]),
        "B" => Some(["B", "D#", "F#"]),
        "C" => Some(["C", "E", "G"]),
        "C#" => Some(["C#", "F", "G#"]),
        "Db" => Some(["Db", "F", "Ab"]),
        "D" => Some(["D", "F#", "A"]),
        "D#" => Some(["D#", "G", "A#"]),
        "Eb" => Some(["Eb", "G", "Bb"]),
        "E" => Some(["E", "G#", "B"]),
        "F" => Some(["F", "A", "C"]),
        "F#" => Some(["F#", "A#", "C#"]),
        "Gb" => Some(["Gb", "Bb", "Db"]),
        "G" => Some(["G", "B", "D"]),
        "G#" => Some(["G#", "C", "D#"]),
        "Ab" => Some(["Ab", "C", "Eb"]),
        _ => None,
    }
}

/// Build a chord from a parsed descriptor.
///
/// The root is resolved against the triad table, retrying once with its
/// enharmonic spelling. An unresolvable root fails this chord only; every
/// other problem is recovered in place and reported as a [`Warning`].
pub fn build_chord(descriptor: &ChordDescriptor) -> Result<BuiltChord, ChordGenError> {
    let triad = major_triad(&descriptor.root)
        .or_else(|| pitch::enharmonic(&descriptor.root).and_then(major_triad))
        .ok_or_else(|| ChordGenError::UnknownRoot(descriptor.root.clone()))?;

    let mut warnings = Vec::new();
    let mut notes: Vec<String> = triad.iter().map(|n| n.to_string()).collect();

    match descriptor.quality {
        ChordQuality::Major => {}
        ChordQuality::Minor => {
            notes[1] = lowered(&notes[1], &mut warnings);
        }
        ChordQuality::Diminished => {
            notes[1] = lowered(&notes[1], &mut warnings);
            notes[2] = lowered(&notes[2], &mut warnings);
        }
    }

    if let Some(kind) = descriptor.seventh {
        add_seventh(&mut notes, kind, &mut warnings);
    }

    if let Some(bass) = &descriptor.bass {
        invert(&mut notes, bass, &mut warnings);
    }

    log::debug!("built {:?} from {:?}", notes, descriptor);
    Ok(BuiltChord {
        chord: Chord { notes },
        warnings,
    })
}

/// One semitone down, canonical spelling. A name outside the chromatic scale
/// is left unchanged and recorded as a warning.
fn lowered(note: &str, warnings: &mut Vec<Warning>) -> String {
    match pitch::step_name(note, -1) {
        Ok(name) => name.to_string(),
        Err(_) => {
            warnings.push(Warning::UnknownNote {
                name: note.to_string(),
            });
            note.to_string()
        }
    }
}

/// Append the seventh: the note `kind.interval()` semitones above the chord's
/// first note. Diminished sevenths take their flat spelling.
fn add_seventh(notes: &mut Vec<String>, kind: SeventhKind, warnings: &mut Vec<Warning>) {
    let root = &notes[0];
    let pc = match PitchClass::from_name(root) {
        Some(pc) => pc,
        None => {
            warnings.push(Warning::UnknownNote { name: root.clone() });
            return;
        }
    };
    let seventh = pc.step(kind.interval() as i8);
    let name = match kind {
        SeventhKind::Diminished7 => seventh.spelled(true),
        _ => seventh.name(),
    };
    notes.push(name.to_string());
}

/// Rotate the chord so the bass note sounds first. The bass's enharmonic
/// spelling is checked before the literal one; a bass matching neither
/// leaves the chord in root position with a warning.
fn invert(notes: &mut Vec<String>, bass: &str, warnings: &mut Vec<Warning>) {
    let target = match pitch::enharmonic(bass) {
        Some(alt) if notes.iter().any(|n| n == alt) => alt,
        _ if notes.iter().any(|n| n == bass) => bass,
        _ => {
            warnings.push(Warning::BassNotInChord {
                bass: bass.to_string(),
                notes: notes.clone(),
            });
            return;
        }
    };
    if let Some(pos) = notes.iter().position(|n| n == target) {
        notes.rotate_left(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::parse_chord_symbol;

    const ALL_ROOTS: [&str; 17] = [
        "A", "A#", "Bb", "B", "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#",
        "Ab",
    ];

    fn descriptor(
        root: &str,
        quality: ChordQuality,
        seventh: Option<SeventhKind>,
    ) -> ChordDescriptor {
        ChordDescriptor {
            root: root.to_string(),
            quality,
            seventh,
            bass: None,
        }
    }

    fn index_of(name: &str) -> u8 {
        PitchClass::from_name(name).unwrap().index()
    }

    #[test]
    fn test_major_triad_literal_spellings() {
        let built = build_chord(&descriptor("C#", ChordQuality::Major, None)).unwrap();
        assert_eq!(built.chord.notes, vec!["C#", "F", "G#"]);
        let built = build_chord(&descriptor("Gb", ChordQuality::Major, None)).unwrap();
        assert_eq!(built.chord.notes, vec!["Gb", "Bb", "Db"]);
    }

    #[test]
    fn test_minor_lowers_only_the_third() {
        for root in ALL_ROOTS {
            let major = build_chord(&descriptor(root, ChordQuality::Major, None))
                .unwrap()
                .chord
                .notes;
            let minor = build_chord(&descriptor(root, ChordQuality::Minor, None))
                .unwrap()
                .chord
                .notes;
            assert_eq!(minor[0], major[0]);
            assert_eq!(minor[2], major[2]);
            assert_eq!(
                index_of(&minor[1]),
                (index_of(&major[1]) + 11) % 12,
                "third of {} minor",
                root
            );
        }
    }

    #[test]
    fn test_diminished_lowers_third_and_fifth() {
        for root in ALL_ROOTS {
            let major = build_chord(&descriptor(root, ChordQuality::Major, None))
                .unwrap()
                .chord
                .notes;
            let dim = build_chord(&descriptor(root, ChordQuality::Diminished, None))
                .unwrap()
                .chord
                .notes;
            assert_eq!(dim[0], major[0]);
            assert_eq!(index_of(&dim[1]), (index_of(&major[1]) + 11) % 12);
            assert_eq!(index_of(&dim[2]), (index_of(&major[2]) + 11) % 12);
        }
    }

    #[test]
    fn test_seventh_interval_from_root() {
        for kind in [
            SeventhKind::Major7,
            SeventhKind::Dominant7,
            SeventhKind::Minor7,
            SeventhKind::Diminished7,
            SeventhKind::Augmented7,
        ] {
            for root in ["C", "Eb", "F#"] {
                let quality = match kind {
                    SeventhKind::Minor7 => ChordQuality::Minor,
                    SeventhKind::Diminished7 => ChordQuality::Diminished,
                    _ => ChordQuality::Major,
                };
                let notes = build_chord(&descriptor(root, quality, Some(kind)))
                    .unwrap()
                    .chord
                    .notes;
                assert_eq!(notes.len(), 4);
                assert_eq!(
                    index_of(&notes[3]),
                    (index_of(root) + kind.interval()) % 12,
                    "{}{}",
                    root,
                    kind.symbol()
                );
            }
        }
    }

    #[test]
    fn test_dim7_spells_seventh_flat() {
        let built = build_chord(&parse_chord_symbol("Adim7")).unwrap();
        assert_eq!(built.chord.notes, vec!["A", "C", "D#", "Gb"]);
    }

    #[test]
    fn test_dim7_natural_seventh_unchanged() {
        let built = build_chord(&parse_chord_symbol("Bbdim7")).unwrap();
        assert_eq!(built.chord.notes, vec!["Bb", "C#", "E", "G"]);
    }

    #[test]
    fn test_inversion_puts_bass_first() {
        let built = build_chord(&parse_chord_symbol("Dm7/F")).unwrap();
        assert_eq!(built.chord.notes, vec!["F", "A", "C", "D"]);
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_inversion_preserves_multiset() {
        let upright = build_chord(&parse_chord_symbol("Dm7")).unwrap().chord.notes;
        let inverted = build_chord(&parse_chord_symbol("Dm7/F"))
            .unwrap()
            .chord
            .notes;
        let mut a = upright.clone();
        let mut b = inverted.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inversion_matches_enharmonic_bass() {
        // "F#m/C#": the parser rewrites the bass as Db, the chord holds C#.
        let built = build_chord(&parse_chord_symbol("F#m/C#")).unwrap();
        assert_eq!(built.chord.notes, vec!["C#", "F#", "A"]);
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_bass_not_in_chord_warns_and_leaves_chord() {
        let built = build_chord(&parse_chord_symbol("C/F#")).unwrap();
        assert_eq!(built.chord.notes, vec!["C", "E", "G"]);
        assert_eq!(built.warnings.len(), 1);
        assert!(matches!(
            &built.warnings[0],
            Warning::BassNotInChord { bass, .. } if bass == "Gb"
        ));
    }

    #[test]
    fn test_unknown_root_fails_chord() {
        let err = build_chord(&descriptor("H", ChordQuality::Major, None)).unwrap_err();
        assert!(matches!(err, ChordGenError::UnknownRoot(root) if root == "H"));
    }

    #[test]
    fn test_empty_root_fails_chord() {
        assert!(build_chord(&descriptor("", ChordQuality::Major, None)).is_err());
    }

    #[test]
    fn test_lowered_falls_back_on_unknown_name() {
        let mut warnings = Vec::new();
        assert_eq!(lowered("H", &mut warnings), "H");
        assert_eq!(warnings.len(), 1);
    }
}
