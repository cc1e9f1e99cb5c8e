//! Console output shared by the whole pipeline.
//!
//! All writes to stdout go through [`write_stdout`], which remembers the
//! last byte it wrote. Diagnostics printed to stderr call [`clean_stdout`]
//! first so they never end up glued to the tail of program output.

use lazy_static::lazy_static;
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

lazy_static! {
    static ref LAST_BYTE: Mutex<u8> = Mutex::new(b'\n');
}

fn styled(code: &str, text: &str) -> String {
    match env::var_os("NO_COLOR") {
        Some(ref val) if !val.is_empty() => text.to_string(),
        _ => format!("\x1b[{}m{}\x1b[0m", code, text),
    }
}

/// Write raw bytes to stdout.
pub fn write_stdout(buf: &[u8]) -> io::Result<()> {
    let mut last = LAST_BYTE.lock().unwrap();
    io::stdout().write_all(buf)?;
    if let Some(&byte) = buf.last() {
        *last = byte;
    }
    Ok(())
}

/// Write a string to stdout.
pub fn print(text: &str) -> io::Result<()> {
    write_stdout(text.as_bytes())
}

/// Flush stdout, appending a newline first if the last written byte
/// wasn't one.
pub fn clean_stdout() {
    let mut last = LAST_BYTE.lock().unwrap();
    let mut out = io::stdout();
    if *last != b'\n' {
        let _ = out.write_all(b"\n");
        *last = b'\n';
    }
    let _ = out.flush();
}

pub fn error<M: fmt::Display>(msg: M) {
    clean_stdout();
    eprintln!("{} {}", styled("31", "Error:"), msg);
}

pub fn warn<M: fmt::Display>(msg: M) {
    clean_stdout();
    eprintln!("{} {}", styled("33", "Warn:"), msg);
}

/// Continuation line for a warning, telling the user what was done about it.
pub fn hint<M: fmt::Display>(msg: M) {
    eprintln!("\t{} {}", styled("34;3", "->"), msg);
}
