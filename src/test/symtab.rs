use crate::constants::MAX_IDENT_LEN;
use crate::symtab::{InsertResult, SymKey, SymVal, SymbolTable};

#[test]
fn insert_then_get() {
    let mut st = SymbolTable::new();
    assert_eq!(
        st.insert(SymKey::label("loop"), SymVal::label(5)),
        InsertResult::Inserted
    );
    assert_eq!(st.get(&SymKey::label("loop")), Some(SymVal::label(5)));
}

#[test]
fn offset_is_applied_on_retrieval() {
    let mut st = SymbolTable::new();
    st.insert(SymKey::func("Sys.init"), SymVal::func(3, 2));
    st.offset = 2;
    assert_eq!(st.get(&SymKey::func("Sys.init")), Some(SymVal::func(5, 2)));
}

#[test]
fn reinserting_the_same_value_is_idempotent() {
    let mut st = SymbolTable::new();
    assert_eq!(
        st.insert(SymKey::label("x"), SymVal::label(1)),
        InsertResult::Inserted
    );
    assert_eq!(
        st.insert(SymKey::label("x"), SymVal::label(1)),
        InsertResult::Inserted
    );
    assert_eq!(st.get(&SymKey::label("x")), Some(SymVal::label(1)));
}

#[test]
fn conflicting_insert_is_rejected_without_mutating() {
    let mut st = SymbolTable::new();
    st.insert(SymKey::label("x"), SymVal::label(1));
    assert_eq!(
        st.insert(SymKey::label("x"), SymVal::label(2)),
        InsertResult::Exists
    );
    assert_eq!(st.get(&SymKey::label("x")), Some(SymVal::label(1)));
}

#[test]
fn labels_and_functions_have_separate_namespaces() {
    let mut st = SymbolTable::new();
    st.insert(SymKey::label("x"), SymVal::label(1));
    st.insert(SymKey::func("x"), SymVal::func(2, 4));
    assert_eq!(st.get(&SymKey::label("x")), Some(SymVal::label(1)));
    assert_eq!(st.get(&SymKey::func("x")), Some(SymVal::func(2, 4)));
}

#[test]
fn grows_and_rehashes() {
    let mut st = SymbolTable::with_capacity(4);
    for i in 0..64 {
        let ident = format!("l{}", i);
        assert_eq!(
            st.insert(SymKey::label(&ident), SymVal::label(i)),
            InsertResult::Inserted
        );
    }
    for i in 0..64 {
        let ident = format!("l{}", i);
        assert_eq!(st.get(&SymKey::label(&ident)), Some(SymVal::label(i)));
    }
}

#[test]
fn missing_keys_are_not_found() {
    let st = SymbolTable::new();
    assert_eq!(st.get(&SymKey::label("nowhere")), None);
}

#[test]
fn over_long_idents_are_truncated() {
    let mut st = SymbolTable::new();
    let long = "a".repeat(MAX_IDENT_LEN + 6);
    st.insert(SymKey::label(&long), SymVal::label(9));

    let prefix = "a".repeat(MAX_IDENT_LEN);
    assert_eq!(st.get(&SymKey::label(&prefix)), Some(SymVal::label(9)));
}
