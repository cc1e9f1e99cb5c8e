use crate::error::ParseError;
use crate::scan::{Token, TokenKind};
use hvm::{Inst, InstKind, InsertResult, Segment, SymKey, SymVal, SymbolTable, Word};
use matches::debug_assert_matches;
use util::Pos;

// Cursor over the scanned tokens.
struct TokenStream<'t> {
    tokens: &'t [Token],
    idx: usize,
}

impl<'t> TokenStream<'t> {
    fn next(&mut self) -> Option<&'t Token> {
        if self.idx < self.tokens.len() {
            let token = &self.tokens[self.idx];
            self.idx += 1;
            Some(token)
        } else {
            None
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.idx)
    }

    // The last `n` consumed tokens, for error context windows.
    fn consumed(&self, n: usize) -> &'t [Token] {
        &self.tokens[self.idx - n.min(self.idx)..self.idx]
    }
}

/// Parse a token sequence into instructions.
///
/// `label` and `function` definitions don't emit instructions; they are
/// entered into the symbol table at the index the next instruction will
/// get. The table's `num_inst` count keeps those indices correct when one
/// logical file is parsed over several calls.
pub fn parse(
    tokens: &[Token],
    filename: Option<&str>,
    st: &mut SymbolTable,
) -> Result<Vec<Inst>, ParseError> {
    let mut its = TokenStream { tokens, idx: 0 };
    let mut insts = Vec::new();
    let base = st.num_inst;

    while let Some(token) = its.peek() {
        let res = match token.kind {
            TokenKind::Push | TokenKind::Pop => memory_inst(&mut its).map(Some),
            TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Neg
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::Eq
            | TokenKind::Gt
            | TokenKind::Lt
            | TokenKind::Return => Ok(Some(map_inst(&mut its))),
            TokenKind::Goto | TokenKind::IfGoto => goto_inst(&mut its).map(Some),
            TokenKind::Call => call_inst(&mut its).map(Some),
            TokenKind::Label => label_meta(&mut its, st, base + insts.len()).map(|_| None),
            TokenKind::Function => function_inst(&mut its, st, base + insts.len()).map(|_| None),
            _ => Err(ParseError::WrongStart {
                token: token.kind.to_string(),
                pos: token.pos,
                filename: None,
            }),
        };

        if let Some(inst) = res.map_err(|err| err.with_filename(filename))? {
            insts.push(inst);
        }
    }

    st.num_inst += insts.len();
    Ok(insts)
}

// Tokens that map 1:1 to an instruction without operands.
fn map_inst(its: &mut TokenStream) -> Inst {
    let token = its.next().unwrap();
    let kind = match token.kind {
        TokenKind::Add => InstKind::Add,
        TokenKind::Sub => InstKind::Sub,
        TokenKind::Neg => InstKind::Neg,
        TokenKind::And => InstKind::And,
        TokenKind::Or => InstKind::Or,
        TokenKind::Not => InstKind::Not,
        TokenKind::Eq => InstKind::Eq,
        TokenKind::Gt => InstKind::Gt,
        TokenKind::Lt => InstKind::Lt,
        TokenKind::Return => InstKind::Return,
        _ => unreachable!(),
    };
    Inst::new(kind, token.pos)
}

fn memory_inst(its: &mut TokenStream) -> Result<Inst, ParseError> {
    let mem = its.next().unwrap();
    debug_assert_matches!(mem.kind, TokenKind::Push | TokenKind::Pop);

    let segment = match its.peek().map(|token| &token.kind) {
        Some(TokenKind::Argument) => Segment::Argument,
        Some(TokenKind::Local) => Segment::Local,
        Some(TokenKind::Static) => Segment::Static,
        Some(TokenKind::Constant) => Segment::Constant,
        Some(TokenKind::This) => Segment::This,
        Some(TokenKind::That) => Segment::That,
        Some(TokenKind::Pointer) => Segment::Pointer,
        Some(TokenKind::Temp) => Segment::Temp,
        _ => return Err(expect_err(its, "a segment", 1)),
    };
    its.next();

    let offset = uint_operand(its, "an offset", 2)?;

    let kind = match mem.kind {
        TokenKind::Push => InstKind::Push { segment, offset },
        _ => InstKind::Pop { segment, offset },
    };
    Ok(Inst::new(kind, mem.pos))
}

fn goto_inst(its: &mut TokenStream) -> Result<Inst, ParseError> {
    let ctrl = its.next().unwrap();
    debug_assert_matches!(ctrl.kind, TokenKind::Goto | TokenKind::IfGoto);

    let (ident, _) = ident_operand(its)?;
    let kind = match ctrl.kind {
        TokenKind::Goto => InstKind::Goto { ident },
        _ => InstKind::IfGoto { ident },
    };
    Ok(Inst::new(kind, ctrl.pos))
}

fn call_inst(its: &mut TokenStream) -> Result<Inst, ParseError> {
    let call = its.next().unwrap();
    debug_assert_matches!(call.kind, TokenKind::Call);

    let (ident, _) = ident_operand(its)?;
    let nargs = uint_operand(its, "the number of arguments", 2)?;
    Ok(Inst::new(InstKind::Call { ident, nargs }, call.pos))
}

fn label_meta(
    its: &mut TokenStream,
    st: &mut SymbolTable,
    num_inst: usize,
) -> Result<(), ParseError> {
    let label = its.next().unwrap();
    debug_assert_matches!(label.kind, TokenKind::Label);

    let (ident, pos) = ident_operand(its)?;
    match st.insert(SymKey::label(&ident), SymVal::label(num_inst)) {
        InsertResult::Inserted => Ok(()),
        InsertResult::Exists => Err(ParseError::Redefined {
            ident,
            pos,
            filename: None,
        }),
    }
}

fn function_inst(
    its: &mut TokenStream,
    st: &mut SymbolTable,
    num_inst: usize,
) -> Result<(), ParseError> {
    let func = its.next().unwrap();
    debug_assert_matches!(func.kind, TokenKind::Function);

    let (ident, pos) = ident_operand(its)?;
    let nlocals = uint_operand(its, "the number of locals", 2)?;
    match st.insert(SymKey::func(&ident), SymVal::func(num_inst, nlocals)) {
        InsertResult::Inserted => Ok(()),
        InsertResult::Exists => Err(ParseError::Redefined {
            ident,
            pos,
            filename: None,
        }),
    }
}

fn ident_operand(its: &mut TokenStream) -> Result<(String, Pos), ParseError> {
    match its.peek() {
        Some(Token {
            kind: TokenKind::Ident(ident),
            pos,
        }) => {
            let res = (ident.clone(), *pos);
            its.next();
            Ok(res)
        }
        _ => Err(expect_err(its, "an identifier", 1)),
    }
}

fn uint_operand(
    its: &mut TokenStream,
    expectation: &str,
    nctx: usize,
) -> Result<Word, ParseError> {
    match its.peek().map(|token| &token.kind) {
        Some(&TokenKind::UInt(val)) => {
            its.next();
            Ok(val)
        }
        _ => Err(expect_err(its, expectation, nctx)),
    }
}

// Build an `Expected` error showing the offending token after the last
// `nctx` consumed tokens, with a caret run underneath it. A missing token
// at the end of the input is displayed as `???` one column past its
// predecessor.
fn expect_err(its: &TokenStream, expectation: &str, nctx: usize) -> ParseError {
    let ctx = its.consumed(nctx);

    let mut context = String::new();
    let mut marker = String::new();
    for token in ctx {
        let text = token.kind.to_string();
        marker.push_str(&" ".repeat(text.chars().count()));
        marker.push(' ');
        context.push_str(&text);
        context.push(' ');
    }

    let (found, pos) = match its.peek() {
        Some(token) => (token.kind.to_string(), token.pos),
        None => {
            let last = ctx.last().expect("context can't be empty");
            let len = last.kind.to_string().chars().count() as u32;
            ("???".to_string(), Pos::new(last.pos.line, last.pos.col + len + 1))
        }
    };
    marker.push_str(&"^".repeat(found.chars().count()));
    context.push_str(&found);

    ParseError::Expected {
        expectation: expectation.to_string(),
        context,
        marker,
        pos,
        filename: None,
    }
}
