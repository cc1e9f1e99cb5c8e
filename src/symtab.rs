use crate::constants;
use crate::Word;

/// What kind of definition a symbol refers to. Labels and functions live
/// in separate namespaces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymKind {
    Func,
    Label,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymKey {
    pub ident: String,
    pub kind: SymKind,
}

impl SymKey {
    pub fn new(ident: &str, kind: SymKind) -> SymKey {
        // Identifiers are capped at MAX_IDENT_LEN everywhere, so an
        // over-long key can only refer to the truncated definition.
        let mut ident = ident.to_string();
        ident.truncate(constants::MAX_IDENT_LEN);
        SymKey { ident, kind }
    }

    pub fn func(ident: &str) -> SymKey {
        SymKey::new(ident, SymKind::Func)
    }

    pub fn label(ident: &str) -> SymKey {
        SymKey::new(ident, SymKind::Label)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SymVal {
    /// Index of the instruction the symbol points at.
    pub inst_addr: usize,
    /// Local variable count. Only meaningful for functions.
    pub nlocals: Word,
}

impl SymVal {
    pub fn label(inst_addr: usize) -> SymVal {
        SymVal {
            inst_addr,
            nlocals: 0,
        }
    }

    pub fn func(inst_addr: usize, nlocals: Word) -> SymVal {
        SymVal { inst_addr, nlocals }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct Symbol {
    key: SymKey,
    val: SymVal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertResult {
    Inserted,
    /// The key is already present with different data. The table was left
    /// unchanged.
    Exists,
}

/// Open-addressed symbol table with linear probing.
///
/// Re-inserting a symbol with the value it already has is fine and does
/// nothing; the same key with a different value is a conflict.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    cells: Vec<Option<Symbol>>,
    used: usize,
    /// Added to every retrieved instruction address. Set when code is
    /// prepended in front of the instructions this table points into.
    pub offset: usize,
    /// Instruction count carried between parse runs over the same file.
    pub num_inst: usize,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::with_capacity(constants::ST_BLOCK_SIZE)
    }

    pub(crate) fn with_capacity(capacity: usize) -> SymbolTable {
        assert!(capacity.is_power_of_two());
        SymbolTable {
            cells: vec![None; capacity],
            used: 0,
            offset: 0,
            num_inst: 0,
        }
    }

    // djb2 over the identifier bytes, with the kind tag mixed in as one
    // more character.
    fn hash(key: &SymKey) -> u64 {
        let mut hash: u64 = 5381;
        for &byte in key.ident.as_bytes() {
            hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
        }
        let kind = match key.kind {
            SymKind::Func => 1u64,
            SymKind::Label => 2u64,
        };
        hash.wrapping_mul(33).wrapping_add(kind)
    }

    // Fibonacci mixing, reduced to log2(capacity) bits.
    fn slot(&self, hash: u64) -> usize {
        let bits = self.cells.len().trailing_zeros();
        (hash.wrapping_mul(11_400_714_819_323_198_485) >> (64 - bits)) as usize
    }

    pub fn insert(&mut self, key: SymKey, val: SymVal) -> InsertResult {
        if self.used * 2 >= self.cells.len() {
            self.grow();
        }

        let mut idx = self.slot(SymbolTable::hash(&key));
        loop {
            match &self.cells[idx] {
                None => break,
                Some(sym) if sym.key == key => {
                    return if sym.val == val {
                        InsertResult::Inserted
                    } else {
                        InsertResult::Exists
                    };
                }
                Some(_) => idx = (idx + 1) & (self.cells.len() - 1),
            }
        }

        self.cells[idx] = Some(Symbol { key, val });
        self.used += 1;
        InsertResult::Inserted
    }

    pub fn get(&self, key: &SymKey) -> Option<SymVal> {
        let mut idx = self.slot(SymbolTable::hash(key));
        loop {
            match &self.cells[idx] {
                None => return None,
                Some(sym) if sym.key == *key => {
                    let mut val = sym.val;
                    val.inst_addr += self.offset;
                    return Some(val);
                }
                Some(_) => idx = (idx + 1) & (self.cells.len() - 1),
            }
        }
    }

    // Double the capacity and rehash every symbol into the new cells.
    fn grow(&mut self) {
        let next = vec![None; self.cells.len() * 2];
        let old = std::mem::replace(&mut self.cells, next);
        for sym in old.into_iter().flatten() {
            let mut idx = self.slot(SymbolTable::hash(&sym.key));
            while self.cells[idx].is_some() {
                idx = (idx + 1) & (self.cells.len() - 1);
            }
            self.cells[idx] = Some(sym);
        }
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}
