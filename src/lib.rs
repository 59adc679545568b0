pub mod chord;
pub mod error;
pub mod midi;
pub mod parser;
pub mod pitch;
pub mod progression;
pub mod symbol;

pub use chord::*;
pub use error::*;
pub use midi::{to_bytes, to_smf, write_midi};
pub use parser::{parse, Metadata, Sheet};
pub use pitch::PitchClass;
pub use progression::*;
pub use symbol::*;

/// Compile a chord sheet to Standard MIDI File bytes.
/// This is the main entry point for the library.
pub fn compile(source: &str) -> Result<Vec<u8>, ChordGenError> {
    let sheet = parse(source)?;
    let progression = sheet.assemble()?;
    to_bytes(&progression, &sheet.metadata)
}
