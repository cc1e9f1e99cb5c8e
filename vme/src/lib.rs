//! Drives the full pipeline: scan and parse each source file, compose the
//! program, execute it.

use hvm::{AssembleError, ExecError, File, Program, SymbolTable, Word};
use hasm::{ParseError, ScanError};
use std::fmt;
use util::console;

#[derive(Debug)]
pub enum Error {
    Scan(ScanError),
    Parse(ParseError),
    Assemble(AssembleError),
    Exec(ExecError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => fmt::Display::fmt(err, f),
            Error::Parse(err) => fmt::Display::fmt(err, f),
            Error::Assemble(err) => fmt::Display::fmt(err, f),
            Error::Exec(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<AssembleError> for Error {
    fn from(err: AssembleError) -> Error {
        Error::Assemble(err)
    }
}

impl From<ExecError> for Error {
    fn from(err: ExecError) -> Error {
        Error::Exec(err)
    }
}

/// Scan and parse the given source files and compose them into a program.
pub fn assemble_files(filenames: &[&str]) -> Result<Program, Error> {
    let mut files = Vec::with_capacity(filenames.len());
    for &filename in filenames {
        warn_file_ext(filename);
        let tokens = hasm::scan_file(filename)?;
        let mut st = SymbolTable::new();
        let insts = hasm::parse(&tokens, Some(filename), &mut st)?;
        files.push(File::new(filename, st, insts));
    }
    Ok(Program::new(files)?)
}

/// In-memory variant of [`assemble_files`], for tests and embedders.
pub fn assemble_sources(sources: &[(&str, &str)]) -> Result<Program, Error> {
    let mut files = Vec::with_capacity(sources.len());
    for &(name, src) in sources {
        let tokens = hasm::scan_source(src.as_bytes())?;
        let mut st = SymbolTable::new();
        let insts = hasm::parse(&tokens, Some(name), &mut st)?;
        files.push(File::new(name, st, insts));
    }
    Ok(Program::new(files)?)
}

/// Execute a program and hand back its result word.
pub fn run(prog: &mut Program) -> Result<Word, Error> {
    prog.run().map_err(Error::Exec)?;
    Ok(prog.result())
}

fn warn_file_ext(filename: &str) {
    if !filename.ends_with(".vm") {
        console::warn(format!("file name `{}` doesn't end with `.vm`", filename));
    }
}
