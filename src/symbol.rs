//! Chord symbol parsing.
//!
//! Dissects tokens like `"F#m7/C#"` into a structured descriptor. Parsing is
//! total: any fragment that matches no marker is treated as a root name and
//! left for the builder to resolve or reject.

use crate::pitch;

/// The shape of a chord's triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

/// Seventh kinds, each a fixed semitone distance above the chord root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeventhKind {
    Major7,
    Dominant7,
    Minor7,
    Diminished7,
    Augmented7,
}

impl SeventhKind {
    /// Semitones from the chord root to the seventh.
    pub fn interval(self) -> u8 {
        match self {
            SeventhKind::Major7 => 11,
            SeventhKind::Dominant7 => 10,
            SeventhKind::Minor7 => 10,
            SeventhKind::Diminished7 => 9,
            SeventhKind::Augmented7 => 10,
        }
    }

    /// Parse a seventh marker as written in chord symbols. Returns `None`
    /// for an unrecognized marker, in which case no seventh applies.
    pub fn from_symbol(s: &str) -> Option<SeventhKind> {
        match s {
            "maj7" => Some(SeventhKind::Major7),
            "7" => Some(SeventhKind::Dominant7),
            "m7" => Some(SeventhKind::Minor7),
            "dim7" => Some(SeventhKind::Diminished7),
            "aug7" => Some(SeventhKind::Augmented7),
            _ => None,
        }
    }

    /// The marker as written in chord symbols.
    pub fn symbol(self) -> &'static str {
        match self {
            SeventhKind::Major7 => "maj7",
            SeventhKind::Dominant7 => "7",
            SeventhKind::Minor7 => "m7",
            SeventhKind::Diminished7 => "dim7",
            SeventhKind::Augmented7 => "aug7",
        }
    }
}

/// Parsed form of a single chord token. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDescriptor {
    /// Root note name as written (unvalidated; the builder resolves it).
    pub root: String,
    pub quality: ChordQuality,
    pub seventh: Option<SeventhKind>,
    /// Inversion bass note, if the token carried a slash part.
    pub bass: Option<String>,
}

/// Parse a chord token like `"Dm7/F"` into a descriptor.
///
/// Markers are matched in a fixed precedence: the slash split first, then
/// "dim7", "dim", minor ("m" anywhere, unless the token ends in "maj7"),
/// "maj7", and a trailing "7". Whatever remains after the matched marker is
/// removed is the root.
pub fn parse_chord_symbol(token: &str) -> ChordDescriptor {
    let token = token.trim();

    let (chord_part, bass_part) = match token.split_once('/') {
        Some((chord, bass)) => (chord.trim(), Some(bass.trim())),
        None => (token, None),
    };
    // An empty slash part ("C/") means no bass at all.
    let bass_part = bass_part.filter(|b| !b.is_empty());

    let mut quality = ChordQuality::Major;
    let mut seventh = None;
    let root;

    if chord_part.contains("dim7") {
        quality = ChordQuality::Diminished;
        seventh = Some(SeventhKind::Diminished7);
        root = chord_part.replace("dim7", "");
    } else if chord_part.contains("dim") {
        quality = ChordQuality::Diminished;
        root = chord_part.replace("dim", "");
    } else if chord_part.contains('m') && !chord_part.ends_with("maj7") {
        quality = ChordQuality::Minor;
        if let Some(stripped) = chord_part.strip_suffix("m7") {
            seventh = Some(SeventhKind::Minor7);
            root = stripped.to_string();
        } else if let Some(stripped) = chord_part.strip_suffix('m') {
            root = stripped.to_string();
        } else {
            root = chord_part.to_string();
        }
    } else if let Some(stripped) = chord_part.strip_suffix("maj7") {
        seventh = Some(SeventhKind::Major7);
        root = stripped.to_string();
    } else if let Some(stripped) = chord_part.strip_suffix('7') {
        seventh = Some(SeventhKind::Dominant7);
        root = stripped.to_string();
    } else {
        root = chord_part.to_string();
    }

    let root = root.trim().to_string();

    // Sharp-spelled bass notes become their flat equivalents so inversion
    // and rendering see one consistent spelling.
    let bass = bass_part.map(|b| match pitch::enharmonic(b) {
        Some(flat) if b.contains('#') && flat.contains('b') => flat.to_string(),
        _ => b.to_string(),
    });

    let descriptor = ChordDescriptor {
        root,
        quality,
        seventh,
        bass,
    };
    log::debug!("parsed '{}': {:?}", token, descriptor);
    descriptor
}
