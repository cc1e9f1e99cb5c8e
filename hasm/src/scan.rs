use crate::error::ScanError;
use hvm::constants::MAX_IDENT_LEN;
use hvm::Word;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use util::{console, Pos};

/// Input is consumed in blocks of (at most) this many bytes.
pub const SCAN_BLOCK_SIZE: usize = 0x10000;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Push,
    Pop,
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
    UInt(Word),
    Label,
    Goto,
    IfGoto,
    Function,
    Call,
    Return,
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    Ident(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::UInt(val) => write!(f, "{}", val),
            TokenKind::Ident(ident) => f.write_str(ident),
            _ => {
                let lexeme = KEYWORDS_PRE
                    .iter()
                    .chain(KEYWORDS_POST.iter())
                    .find(|(_, kind)| kind == self)
                    .map(|(lexeme, _)| *lexeme)
                    .unwrap_or("???");
                f.write_str(lexeme)
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

// Scan rules are tried in this order. Keywords come before the ident rule
// so that a whitespace-delimited `push` never scans as an identifier.
const KEYWORDS_PRE: [(&str, TokenKind); 10] = [
    ("push", TokenKind::Push),
    ("pop", TokenKind::Pop),
    ("argument", TokenKind::Argument),
    ("local", TokenKind::Local),
    ("static", TokenKind::Static),
    ("constant", TokenKind::Constant),
    ("this", TokenKind::This),
    ("that", TokenKind::That),
    ("pointer", TokenKind::Pointer),
    ("temp", TokenKind::Temp),
];

const KEYWORDS_POST: [(&str, TokenKind); 15] = [
    ("label", TokenKind::Label),
    ("goto", TokenKind::Goto),
    ("if-goto", TokenKind::IfGoto),
    ("function", TokenKind::Function),
    ("call", TokenKind::Call),
    ("return", TokenKind::Return),
    ("add", TokenKind::Add),
    ("sub", TokenKind::Sub),
    ("neg", TokenKind::Neg),
    ("eq", TokenKind::Eq),
    ("gt", TokenKind::Gt),
    ("lt", TokenKind::Lt),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
];

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'.' || byte == b':'
}

fn is_ident_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || byte == b':'
}

enum Matched {
    Token(TokenKind),
    Comment,
}

/// Converts blocks of source bytes into tokens.
///
/// The scanner is restartable: a trailing suffix that didn't complete a
/// token is reported back to the caller and has to be fed in again at the
/// start of the next block. Comment state carries over as well.
pub struct Scanner {
    tokens: Vec<Token>,
    cur: Pos,
    in_comment: bool,
}

impl Scanner {
    pub fn new() -> Scanner {
        Scanner {
            tokens: Vec::new(),
            cur: Pos::default(),
            in_comment: false,
        }
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The position the scanner will continue at.
    pub fn pos(&self) -> Pos {
        self.cur
    }

    /// Scan one block. On success, returns the number of trailing bytes
    /// that couldn't be matched because the block ended; the caller has to
    /// carry them into the next block.
    pub fn scan_block(&mut self, blk: &[u8]) -> Result<usize, ScanError> {
        let mut offset = 0;
        // A carried-over comment owns the block start; its terminating
        // newline has to be seen by the comment branch below.
        if !self.in_comment {
            self.eat_ws(blk, &mut offset);
        }

        while offset < blk.len() {
            if self.in_comment {
                if blk[offset] == b'\n' {
                    self.in_comment = false;
                    self.newline(&mut offset);
                    self.eat_ws(blk, &mut offset);
                } else {
                    self.advance(&mut offset, 1);
                }
                continue;
            }

            let start = self.cur;
            match self.next_token(blk, &mut offset) {
                Some(Matched::Token(kind)) => self.tokens.push(Token { kind, pos: start }),
                Some(Matched::Comment) => self.in_comment = true,
                None => {
                    // Nothing matched. If the rest of the block contains
                    // whitespace, a full token was available and the input
                    // is malformed. Otherwise the rest might just be the
                    // beginning of a token that continues in the next
                    // block.
                    let rest = &blk[offset..];
                    if rest.iter().any(|&byte| is_space(byte)) {
                        let mut text = String::from_utf8_lossy(rest).into_owned();
                        if text.ends_with('\n') {
                            text.pop();
                        }
                        return Err(ScanError::Syntax {
                            pos: start,
                            text,
                            filename: None,
                        });
                    }
                    return Ok(rest.len());
                }
            }
            self.eat_ws(blk, &mut offset);
        }

        Ok(0)
    }

    fn next_token(&mut self, blk: &[u8], offset: &mut usize) -> Option<Matched> {
        for (lexeme, kind) in &KEYWORDS_PRE {
            if self.keyword(blk, offset, lexeme) {
                return Some(Matched::Token(kind.clone()));
            }
        }
        if let Some(kind) = self.uint(blk, offset) {
            return Some(Matched::Token(kind));
        }
        for (lexeme, kind) in &KEYWORDS_POST {
            if self.keyword(blk, offset, lexeme) {
                return Some(Matched::Token(kind.clone()));
            }
        }
        if let Some(kind) = self.ident(blk, offset) {
            return Some(Matched::Token(kind));
        }
        if blk[*offset..].starts_with(b"//") {
            self.advance(offset, 2);
            return Some(Matched::Comment);
        }
        None
    }

    // Keywords only match as whole words: the byte after the keyword must
    // be whitespace within this block.
    fn keyword(&mut self, blk: &[u8], offset: &mut usize, lexeme: &str) -> bool {
        let bytes = lexeme.as_bytes();
        let end = *offset + bytes.len();
        if end < blk.len() && &blk[*offset..end] == bytes && is_space(blk[end]) {
            self.advance(offset, bytes.len());
            true
        } else {
            false
        }
    }

    fn uint(&mut self, blk: &[u8], offset: &mut usize) -> Option<TokenKind> {
        let mut end = *offset;
        let mut val: u32 = 0;
        let mut ndigits = 0;
        while end < blk.len() && ndigits < 5 && blk[end].is_ascii_digit() {
            val = val * 10 + u32::from(blk[end] - b'0');
            end += 1;
            ndigits += 1;
        }

        // The number has to end in whitespace. That also rejects literals
        // with more than five digits.
        if ndigits == 0 || end >= blk.len() || !is_space(blk[end]) {
            return None;
        }

        // Five decimal digits reach up to 99999, beyond the 16-bit range.
        if val > 65535 {
            warn_sat_uilit(val);
            val = 65535;
        }

        self.advance(offset, ndigits);
        Some(TokenKind::UInt(val as Word))
    }

    fn ident(&mut self, blk: &[u8], offset: &mut usize) -> Option<TokenKind> {
        let mut end = *offset;
        if end < blk.len() && is_ident_start(blk[end]) {
            end += 1;
        } else {
            return None;
        }
        while end < blk.len() && is_ident_char(blk[end]) {
            end += 1;
        }

        if end >= blk.len() || !is_space(blk[end]) {
            return None;
        }

        let text = &blk[*offset..end];
        if text.len() > MAX_IDENT_LEN {
            warn_trunc_ident(text);
        }
        let keep = text.len().min(MAX_IDENT_LEN);
        let ident = String::from_utf8_lossy(&text[..keep]).into_owned();

        self.advance(offset, text.len());
        Some(TokenKind::Ident(ident))
    }

    fn eat_ws(&mut self, blk: &[u8], offset: &mut usize) {
        while *offset < blk.len() && is_space(blk[*offset]) {
            if blk[*offset] == b'\n' {
                self.newline(offset);
            } else {
                self.advance(offset, 1);
            }
        }
    }

    fn advance(&mut self, offset: &mut usize, n: usize) {
        *offset += n;
        self.cur.col += n as u32;
    }

    fn newline(&mut self, offset: &mut usize) {
        *offset += 1;
        self.cur.line += 1;
        self.cur.col = 0;
    }
}

impl Default for Scanner {
    fn default() -> Scanner {
        Scanner::new()
    }
}

/// Scan a whole source file block by block.
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<Vec<Token>, ScanError> {
    let path = path.as_ref();
    let filename = path.to_string_lossy().into_owned();
    let file = fs::File::open(path).map_err(|err| ScanError::Io {
        filename: filename.clone(),
        err,
    })?;
    scan_blocks(file, Some(&filename))
}

/// Scan an in-memory source. Uses the same block loop as files.
pub fn scan_source(src: &[u8]) -> Result<Vec<Token>, ScanError> {
    scan_blocks(src, None)
}

fn scan_blocks<R: Read>(mut input: R, filename: Option<&str>) -> Result<Vec<Token>, ScanError> {
    let mut scanner = Scanner::new();
    // One extra byte of room for the synthetic final newline.
    let mut blk = vec![0u8; SCAN_BLOCK_SIZE + 1];
    let mut carry = 0;

    loop {
        let read = fill(&mut input, &mut blk[carry..SCAN_BLOCK_SIZE]).map_err(|err| {
            ScanError::Io {
                filename: filename.unwrap_or("input").to_string(),
                err,
            }
        })?;
        let mut len = carry + read;
        let orig_len = len;

        // A final block that doesn't end in a newline gets a synthetic
        // one, so the token at the very end of the file still has its
        // whitespace delimiter.
        if 0 < len && len < SCAN_BLOCK_SIZE && blk[len - 1] != b'\n' {
            warn_eof_nl();
            blk[len] = b'\n';
            len += 1;
        }

        carry = scanner
            .scan_block(&blk[..len])
            .map_err(|err| err.with_filename(filename))?;
        if carry == SCAN_BLOCK_SIZE {
            // A token spanning a whole block can never complete.
            let text = format!("{}...", String::from_utf8_lossy(&blk[..MAX_IDENT_LEN]));
            return Err(ScanError::Syntax {
                pos: scanner.pos(),
                text,
                filename: filename.map(str::to_string),
            });
        }
        if carry > 0 {
            blk.copy_within(len - carry..len, 0);
        }

        if orig_len < SCAN_BLOCK_SIZE {
            break;
        }
    }

    Ok(scanner.into_tokens())
}

// Fill `buf` from `input`, stopping early only at end of input.
fn fill<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match input.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(total)
}

fn warn_sat_uilit(lit: u32) {
    console::warn(format!(
        "`{}` exceeds the range possible 16-bit numbers.",
        lit
    ));
    console::hint("Saturating to maximum value 65535");
}

fn warn_trunc_ident(ident: &[u8]) {
    let full = String::from_utf8_lossy(ident);
    let trunc = String::from_utf8_lossy(&ident[..MAX_IDENT_LEN]);
    console::warn(format!("`{}` is too long to be an identifier.", full));
    console::hint(format!(
        "It's truncated to `{}` ({} chars)",
        trunc, MAX_IDENT_LEN
    ));
}

fn warn_eof_nl() {
    console::warn("no trailing newline at end of file.");
    console::hint("Automatically adding newline after the last character");
}
