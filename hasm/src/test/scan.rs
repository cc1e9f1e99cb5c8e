use crate::error::ScanError;
use crate::scan::{scan_source, Scanner, TokenKind};
use util::Pos;

#[test]
fn keywords_roundtrip() {
    let src = "push pop argument local static constant this that pointer temp \
               label goto if-goto function call return add sub neg eq gt lt and or not\n";
    let tokens = scan_source(src.as_bytes()).unwrap();

    let lexemes: Vec<String> = tokens.iter().map(|token| token.kind.to_string()).collect();
    let expected: Vec<&str> = src.split_whitespace().collect();
    assert_eq!(lexemes, expected);
}

#[test]
fn uint_at_the_16_bit_limit_scans_exactly() {
    let tokens = scan_source(b"65535\n").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::UInt(65535));
}

#[test]
fn uint_above_the_16_bit_limit_saturates() {
    let tokens = scan_source(b"65536\n").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::UInt(65535));
}

#[test]
fn six_digit_literals_are_rejected() {
    assert!(scan_source(b"123456\n").is_err());
}

#[test]
fn ident_at_max_length_is_kept() {
    let ident = "a".repeat(24);
    let tokens = scan_source(format!("{}\n", ident).as_bytes()).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident(ident));
}

#[test]
fn over_long_ident_is_truncated() {
    let tokens = scan_source(format!("{}\n", "b".repeat(25)).as_bytes()).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident("b".repeat(24)));
}

#[test]
fn ident_charset() {
    let tokens = scan_source(b"Sys.init _tmp:0 a1.b2\n").unwrap();
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident("Sys.init".to_string()),
            TokenKind::Ident("_tmp:0".to_string()),
            TokenKind::Ident("a1.b2".to_string()),
        ]
    );
}

#[test]
fn comments_are_skipped() {
    let tokens = scan_source(b"push // a comment $%&\npop\n").unwrap();
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Push, TokenKind::Pop]);
}

#[test]
fn comment_state_survives_block_boundaries() {
    let mut scanner = Scanner::new();
    assert_eq!(scanner.scan_block(b"push // half a comment").unwrap(), 0);
    assert_eq!(scanner.scan_block(b"still the same comment\npop\n").unwrap(), 0);

    let kinds: Vec<TokenKind> = scanner
        .into_tokens()
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, vec![TokenKind::Push, TokenKind::Pop]);
}

#[test]
fn comment_terminator_at_the_block_start() {
    let mut scanner = Scanner::new();
    assert_eq!(scanner.scan_block(b"push // trailing comment").unwrap(), 0);
    // The newline ending the comment is the first byte of the next block.
    assert_eq!(scanner.scan_block(b"\npop\n").unwrap(), 0);

    let kinds: Vec<TokenKind> = scanner
        .into_tokens()
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, vec![TokenKind::Push, TokenKind::Pop]);
}

#[test]
fn unfinished_token_is_carried_over() {
    let mut scanner = Scanner::new();
    // "cons" could still become `constant` in the next block.
    assert_eq!(scanner.scan_block(b"push cons").unwrap(), 4);
    assert_eq!(scanner.scan_block(b"constant 5\n").unwrap(), 0);

    let kinds: Vec<TokenKind> = scanner
        .into_tokens()
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Push, TokenKind::Constant, TokenKind::UInt(5)]
    );
}

#[test]
fn undelimited_keyword_at_the_block_edge_is_carried() {
    let mut scanner = Scanner::new();
    assert_eq!(scanner.scan_block(b"push").unwrap(), 4);
    assert_eq!(scanner.scan_block(b"push pop\n").unwrap(), 0);

    let kinds: Vec<TokenKind> = scanner
        .into_tokens()
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, vec![TokenKind::Push, TokenKind::Pop]);
}

#[test]
fn garbage_with_whitespace_after_it_is_an_error() {
    let err = scan_source(b"push @@@ 5\n").err().unwrap();
    match err {
        ScanError::Syntax { pos, text, .. } => {
            assert_eq!(pos, Pos::new(0, 5));
            assert_eq!(text, "@@@ 5");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = scan_source(b"push constant 5\npop temp 1\n").unwrap();
    let positions: Vec<Pos> = tokens.iter().map(|token| token.pos).collect();
    assert_eq!(
        positions,
        vec![
            Pos::new(0, 0),
            Pos::new(0, 5),
            Pos::new(0, 14),
            Pos::new(1, 0),
            Pos::new(1, 4),
            Pos::new(1, 9),
        ]
    );
}

#[test]
fn missing_trailing_newline_is_tolerated() {
    let tokens = scan_source(b"push constant 5").unwrap();
    assert_eq!(tokens.len(), 3);
}

#[test]
fn empty_source_scans_to_nothing() {
    assert!(scan_source(b"").unwrap().is_empty());
}
