use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: chordgen <input.prog> [output.mid]");
        eprintln!("       chordgen --json <input.prog>");
        process::exit(1);
    }

    let mut json = false;
    let mut input_path = &args[1];
    let mut output_path: Option<&String> = args.get(2);

    // Parse flags
    if args[1] == "--json" {
        json = true;
        if args.len() < 3 {
            eprintln!("Usage: chordgen --json <input.prog>");
            process::exit(1);
        }
        input_path = &args[2];
        output_path = args.get(3);
    }

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    // Compile
    let sheet = match chordgen::parse(&source) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(1);
        }
    };
    let progression = match sheet.assemble() {
        Ok(progression) => progression,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(1);
        }
    };
    for warning in &progression.warnings {
        eprintln!("Warning: {}", warning);
    }

    // Output
    if json {
        let report = serde_json::json!({
            "metadata": sheet.metadata,
            "progression": progression,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let output = match output_path {
        Some(path) => PathBuf::from(path),
        None => Path::new(input_path).with_extension("mid"),
    };
    match chordgen::write_midi(&progression, &sheet.metadata, &output) {
        Ok(written) => eprintln!("Wrote MIDI to {}", written.display()),
        Err(e) => {
            eprintln!("Error writing to '{}': {}", output.display(), e);
            process::exit(1);
        }
    }
}
