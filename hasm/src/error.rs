use std::error::Error as StdError;
use std::fmt;
use std::io;
use util::Pos;

/// Failure while turning bytes into tokens.
#[derive(Debug)]
pub enum ScanError {
    /// Bytes that match no scan rule.
    Syntax {
        pos: Pos,
        text: String,
        filename: Option<String>,
    },
    Io { filename: String, err: io::Error },
}

impl ScanError {
    pub(crate) fn with_filename(mut self, filename: Option<&str>) -> ScanError {
        if let ScanError::Syntax {
            filename: ref mut slot,
            ..
        } = self
        {
            *slot = filename.map(str::to_string);
        }
        self
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanError::Syntax {
                pos,
                text,
                filename: Some(filename),
            } => write!(f, "couldn't scan input ({})\n {} | {}", filename, pos, text),
            ScanError::Syntax {
                pos,
                text,
                filename: None,
            } => write!(f, "couldn't scan input\n {} | {}", pos, text),
            ScanError::Io { filename, err } => write!(f, "couldn't read {}: {}", filename, err),
        }
    }
}

impl StdError for ScanError {}

/// Failure while turning tokens into instructions.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseError {
    /// A token that can't begin an instruction.
    WrongStart {
        token: String,
        pos: Pos,
        filename: Option<String>,
    },
    /// A specific token class was required and something else was found.
    /// `context` and `marker` hold the prerendered token window and its
    /// caret underline.
    Expected {
        expectation: String,
        context: String,
        marker: String,
        pos: Pos,
        filename: Option<String>,
    },
    /// A label or function was defined twice with different data.
    Redefined {
        ident: String,
        pos: Pos,
        filename: Option<String>,
    },
}

impl ParseError {
    pub(crate) fn with_filename(mut self, name: Option<&str>) -> ParseError {
        let slot = match self {
            ParseError::WrongStart {
                ref mut filename, ..
            } => filename,
            ParseError::Expected {
                ref mut filename, ..
            } => filename,
            ParseError::Redefined {
                ref mut filename, ..
            } => filename,
        };
        *slot = name.map(str::to_string);
        self
    }
}

fn in_file(filename: &Option<String>) -> String {
    match filename {
        Some(filename) => format!(" ({})", filename),
        None => String::new(),
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::WrongStart {
                token,
                pos,
                filename,
            } => write!(
                f,
                "wrong start of instruction{}\n {} | {}",
                in_file(filename),
                pos,
                token
            ),
            ParseError::Expected {
                expectation,
                context,
                marker,
                pos,
                filename,
            } => write!(
                f,
                "wrong token, expected {}{}\n {} | {}\n {}:{} | {}",
                expectation,
                in_file(filename),
                pos,
                context,
                pos.line + 2,
                pos.col + 1,
                marker
            ),
            ParseError::Redefined {
                ident,
                pos,
                filename,
            } => write!(
                f,
                "conflicting redefinition of `{}`{}\n {} | {}",
                ident,
                in_file(filename),
                pos,
                ident
            ),
        }
    }
}

impl StdError for ParseError {}
