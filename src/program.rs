use crate::constants;
use crate::instructions::{Inst, InstKind, Segment};
use crate::memory::{FileMem, Heap, Stack};
use crate::symtab::{SymKey, SymVal, SymbolTable};
use crate::Word;
use std::error::Error as StdError;
use std::fmt;
use util::Pos;

/// Name of the generated file at index 0.
pub const SYSTEM_FILENAME: &str = "<system>";

/// A single compiled source file: its symbols, its instructions and its
/// file-local memory segments.
pub struct File {
    pub filename: String,
    pub st: SymbolTable,
    pub insts: Vec<Inst>,
    pub mem: FileMem,
    /// Execution index into `insts`.
    pub ei: usize,
}

impl File {
    pub fn new(filename: &str, st: SymbolTable, insts: Vec<Inst>) -> File {
        File {
            filename: filename.to_string(),
            st,
            insts,
            mem: FileMem::new(),
            ei: 0,
        }
    }

    /// Build the synthetic system file: one short routine per built-in,
    /// followed by the startup trampoline. Each routine pushes its
    /// arguments from the argument segment, runs the internal operation
    /// and returns a value to the caller.
    fn system() -> File {
        fn op(kind: InstKind) -> Inst {
            Inst::new(kind, Pos::default())
        }
        fn push_arg(offset: Word) -> InstKind {
            InstKind::Push {
                segment: Segment::Argument,
                offset,
            }
        }
        fn push_const(offset: Word) -> InstKind {
            InstKind::Push {
                segment: Segment::Constant,
                offset,
            }
        }

        let builtins: Vec<(&str, Vec<InstKind>)> = vec![
            (
                "Sys.print_char",
                vec![
                    push_arg(0),
                    InstKind::PrintChar,
                    push_const(0),
                    InstKind::Return,
                ],
            ),
            (
                "Sys.print_num",
                vec![
                    push_arg(0),
                    InstKind::PrintNum,
                    push_const(0),
                    InstKind::Return,
                ],
            ),
            (
                "Sys.print_str",
                vec![
                    push_arg(0),
                    push_arg(1),
                    InstKind::PrintStr,
                    push_const(0),
                    InstKind::Return,
                ],
            ),
            ("Sys.read_char", vec![InstKind::ReadChar, InstKind::Return]),
            ("Sys.read_num", vec![InstKind::ReadNum, InstKind::Return]),
            (
                "Sys.read_str",
                vec![push_arg(0), InstKind::ReadStr, InstKind::Return],
            ),
        ];

        let mut st = SymbolTable::new();
        let mut insts = Vec::new();
        for (name, body) in builtins {
            st.insert(SymKey::func(name), SymVal::func(insts.len(), 0));
            insts.extend(body.into_iter().map(op));
        }

        // The startup trampoline. Execution of the whole program begins
        // at the first of these two instructions.
        let start = insts.len();
        insts.push(op(push_const(0)));
        insts.push(op(InstKind::Call {
            ident: constants::SYS_INIT.to_string(),
            nargs: 1,
        }));

        let mut file = File::new(SYSTEM_FILENAME, st, insts);
        file.ei = start;
        file
    }
}

/// An executable program: the system file plus all user files, sharing
/// one heap and one operand stack.
pub struct Program {
    pub files: Vec<File>,
    /// Index of the file currently executing.
    pub fi: usize,
    pub heap: Heap,
    pub stack: Stack,
}

impl Program {
    /// Compose the parsed user files into a program. File 0 is always the
    /// generated system file; the user files follow in the given order.
    pub fn new(user_files: Vec<File>) -> Result<Program, AssembleError> {
        let mut files = Vec::with_capacity(user_files.len() + 1);
        files.push(File::system());
        files.extend(user_files);

        let init = SymKey::func(constants::SYS_INIT);
        if !files[1..].iter().any(|file| file.st.get(&init).is_some()) {
            return Err(AssembleError::MissingInit);
        }

        Ok(Program {
            files,
            fi: 0,
            heap: Heap::new(),
            stack: Stack::new(),
        })
    }

    /// The value the program leaves behind: the topmost stack word, or 0
    /// if the stack is empty.
    pub fn result(&self) -> Word {
        self.stack.top().unwrap_or(0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AssembleError {
    /// No user file defines the `Sys.init` entry point.
    MissingInit,
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssembleError::MissingInit => write!(
                f,
                "can't find `{}`. Write a function called `{}` to serve as \
                 the entry point of your program",
                constants::SYS_INIT,
                constants::SYS_INIT
            ),
        }
    }
}

impl StdError for AssembleError {}
