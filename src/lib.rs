mod exec;
mod instructions;
mod memory;
mod program;
mod symtab;

pub mod constants;

pub use exec::ExecError;
pub use instructions::{Inst, InstKind, Segment};
pub use memory::{FileMem, Heap, Stack};
pub use program::{AssembleError, File, Program, SYSTEM_FILENAME};
pub use symtab::{InsertResult, SymKey, SymKind, SymVal, SymbolTable};

/// Single machine word. All VM arithmetic is 16-bit and unsigned.
pub type Word = u16;
/// Address into the heap.
pub type Addr = u16;
