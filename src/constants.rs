use super::Word;

/// Heap size in words.
pub const HEAP_SIZE: usize = 0x1000;
/// Size of a file's `static` segment in words.
pub const STATIC_SIZE: usize = 0x100;
/// Size of a file's `temp` segment in words.
pub const TEMP_SIZE: usize = 0x10;

/// The operand stack grows and shrinks in blocks of this many words.
pub const STACK_BLOCK_SIZE: usize = 0x1000;
/// Initial symbol table capacity. Must be a power of two.
pub const ST_BLOCK_SIZE: usize = 0x1000;

/// Identifiers are capped at this many characters.
pub const MAX_IDENT_LEN: usize = 24;

/// Boolean encoding used by the comparison instructions. Any non-zero
/// word counts as true when branching.
pub const TRUE: Word = 0xFFFF;
pub const FALSE: Word = 0x0000;

/// Words saved on the stack by `call` before the callee's locals.
pub const FRAME_SAVE_LEN: usize = 8;

/// Entry point every program has to define.
pub const SYS_INIT: &str = "Sys.init";
