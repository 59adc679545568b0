use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use midly::{
    num::{u4, u7, u15, u24, u28},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::error::ChordGenError;
use crate::parser::Metadata;
use crate::pitch::PitchClass;
use crate::progression::Progression;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Note-on velocity for both parts.
const VELOCITY: u8 = 80;

/// General MIDI programs: acoustic grand piano and acoustic bass.
const PIANO: u8 = 0;
const ACOUSTIC_BASS: u8 = 32;

/// Render an assembled progression as an SMF: Format 1 with a tempo track,
/// a piano track for the chords, and an acoustic-bass track when the
/// progression carries bass entries.
pub fn to_smf<'a>(
    progression: &Progression,
    metadata: &'a Metadata,
) -> Result<Smf<'a>, ChordGenError> {
    if metadata.tempo == 0 {
        return Err(ChordGenError::MetadataError(
            "tempo must be positive".to_string(),
        ));
    }
    let tempo_microseconds = 60_000_000 / metadata.tempo as u32;
    // The tempo meta event stores microseconds per quarter in three bytes,
    // so tempos below 4 BPM do not fit.
    if tempo_microseconds > 0xFF_FFFF {
        return Err(ChordGenError::MetadataError(
            "tempo must be at least 4 BPM".to_string(),
        ));
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut tempo_track: Track = Vec::new();
    if let Some(title) = &metadata.title {
        tempo_track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(title.as_bytes())),
        });
    }
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(end_of_track(0));
    smf.tracks.push(tempo_track);

    smf.tracks.push(chord_track(progression)?);
    if !progression.bass.is_empty() {
        smf.tracks.push(bass_track(progression)?);
    }

    Ok(smf)
}

/// Encode the progression as Standard MIDI File bytes.
pub fn to_bytes(progression: &Progression, metadata: &Metadata) -> Result<Vec<u8>, ChordGenError> {
    let smf = to_smf(progression, metadata)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Render the progression and write it to `path`.
///
/// A permission-denied error on the destination (a player holding the file
/// open, typically) triggers one retry under a timestamped name in the same
/// directory. Returns the path actually written.
pub fn write_midi(
    progression: &Progression,
    metadata: &Metadata,
    path: &Path,
) -> Result<PathBuf, ChordGenError> {
    let bytes = to_bytes(progression, metadata)?;
    match fs::write(path, &bytes) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            let fallback = unique_path(path);
            log::warn!(
                "'{}' is in use; writing '{}' instead",
                path.display(),
                fallback.display()
            );
            fs::write(&fallback, &bytes)?;
            Ok(fallback)
        }
        Err(e) => Err(e.into()),
    }
}

fn chord_track(progression: &Progression) -> Result<Track<'static>, ChordGenError> {
    let channel = u4::new(0);
    let mut track = track_header(b"Chords", channel, PIANO);

    // Ticks accumulated from empty slots, so silence holds their place.
    let mut rest_ticks: u32 = 0;
    for entry in &progression.chords {
        let ticks = beats_to_ticks(entry.duration);
        let chord = match &entry.chord {
            Some(chord) => chord,
            None => {
                rest_ticks += ticks;
                continue;
            }
        };

        let mut keys = Vec::with_capacity(chord.notes.len());
        for note in &chord.notes {
            keys.push(midi_key(note, entry.octave)?);
        }

        for (i, key) in keys.iter().enumerate() {
            track.push(TrackEvent {
                delta: u28::new(if i == 0 { rest_ticks } else { 0 }),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(*key),
                        vel: u7::new(VELOCITY),
                    },
                },
            });
        }
        for (i, key) in keys.iter().enumerate() {
            track.push(TrackEvent {
                delta: u28::new(if i == 0 { ticks } else { 0 }),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(*key),
                        vel: u7::new(0),
                    },
                },
            });
        }
        rest_ticks = 0;
    }

    track.push(end_of_track(rest_ticks));
    Ok(track)
}

fn bass_track(progression: &Progression) -> Result<Track<'static>, ChordGenError> {
    let channel = u4::new(1);
    let mut track = track_header(b"Bass", channel, ACOUSTIC_BASS);

    for entry in &progression.bass {
        let key = midi_key(&entry.note, entry.octave)?;
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(VELOCITY),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(beats_to_ticks(entry.duration)),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(0),
                },
            },
        });
    }

    track.push(end_of_track(0));
    Ok(track)
}

fn track_header(name: &'static [u8], channel: u4, program: u8) -> Track<'static> {
    vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(name)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
        },
    ]
}

fn end_of_track(delta: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

/// Convert a note name and octave to a MIDI key number, clamped to 0..=127.
/// Octave 4 maps C to 60.
fn midi_key(name: &str, octave: u8) -> Result<u8, ChordGenError> {
    let pc = PitchClass::from_name(name)
        .ok_or_else(|| ChordGenError::UnknownNote(name.to_string()))?;
    let key = (octave as u32 + 1) * 12 + pc.index() as u32;
    Ok(key.min(127) as u8)
}

fn beats_to_ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_QUARTER as f64) as u32
}

/// `out.mid` becomes `out_1724198400.mid` (unix seconds).
fn unique_path(path: &Path) -> PathBuf {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("mid");
    path.with_file_name(format!("{}_{}.{}", stem, seconds, ext))
}
