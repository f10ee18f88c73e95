//! mendmark CLI - repair malformed markup in generated documents

use std::io::{self, Read, Write};
use std::process::ExitCode;

enum Mode {
    Sanitize,
    Strip,
    Check,
}

fn main() -> io::Result<ExitCode> {
    let args: Vec<String> = std::env::args().collect();

    let mut mode = Mode::Sanitize;
    let mut path: Option<&str> = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--strip" => mode = Mode::Strip,
            "--check" => mode = Mode::Check,
            other => path = Some(other),
        }
    }

    // Read from a file argument or stdin
    let input = match path {
        Some(p) if p != "-" => std::fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    match mode {
        Mode::Sanitize => {
            io::stdout().write_all(mendmark::sanitize(&input).as_bytes())?;
        }
        Mode::Strip => {
            io::stdout().write_all(mendmark::strip_all(&input).as_bytes())?;
        }
        Mode::Check => {
            let report = mendmark::validate(&input);
            for error in &report.errors {
                eprintln!("{error}");
            }
            if !report.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
