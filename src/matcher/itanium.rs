// Sun Aug 23 2026 - Alex
//
// Token grammar for GCC/Clang-style demangled output: no return type on
// plain functions, `Class::Class(...)` constructors, trailing
// cv-qualifiers after the closing paren.

use crate::matcher::{name_matches, unscoped_name, word_set_eq, CtorVariant, DtorVariant};

/// Match the call portion: leading name token, `(`, positional
/// parameters, `)`. Returns the token index just past the `)`.
fn match_call(tokens: &[String], expected_name: &str, params: &[String]) -> Option<usize> {
    if tokens.len() < params.len() + 3 {
        return None;
    }
    if !name_matches(&tokens[0], expected_name) {
        return None;
    }
    if tokens[1] != "(" {
        return None;
    }
    for (i, param) in params.iter().enumerate() {
        if !word_set_eq(&tokens[2 + i], param) {
            return None;
        }
    }
    let close = 2 + params.len();
    if tokens[close] != ")" {
        return None;
    }
    Some(close + 1)
}

pub fn match_function(tokens: &[String], name: &str, params: &[String]) -> bool {
    match match_call(tokens, name, params) {
        Some(rest) => rest == tokens.len(),
        None => false,
    }
}

pub fn match_mem_fn(
    tokens: &[String],
    class: &str,
    name: &str,
    params: &[String],
    is_const: bool,
    is_volatile: bool,
) -> bool {
    let expected = format!("{}::{}", class, name);
    let mut cursor = match match_call(tokens, &expected, params) {
        Some(rest) => rest,
        None => return false,
    };

    // A qualifier is consumed only when requested; an unrequested one
    // present on the candidate is a mismatch, as is a requested one
    // missing from it.
    for (wanted, keyword) in [(is_const, "const"), (is_volatile, "volatile")] {
        let present = tokens.get(cursor).map(String::as_str) == Some(keyword);
        if wanted != present {
            return false;
        }
        if present {
            cursor += 1;
        }
    }
    cursor == tokens.len()
}

pub fn match_constructor(tokens: &[String], class: &str, params: &[String]) -> bool {
    let expected = format!("{}::{}", class, unscoped_name(class));
    match match_call(tokens, &expected, params) {
        Some(rest) => rest == tokens.len(),
        None => false,
    }
}

pub fn match_destructor(tokens: &[String], class: &str) -> bool {
    let expected = format!("{}::~{}", class, unscoped_name(class));
    match match_call(tokens, &expected, &[]) {
        Some(rest) => rest == tokens.len(),
        None => false,
    }
}

/// Classify which Itanium ABI entry point a matching constructor symbol
/// is, by literal marker search inside the mangled name. Tied to the v0
/// mangling scheme (`<len><name>C0E` allocating, `C1E` complete-object,
/// `C2E` base-object), deliberately not a structural decode.
pub fn classify_ctor(mangled: &str, unscoped: &str) -> Option<CtorVariant> {
    if mangled.contains(&format!("{}C0E", unscoped)) {
        Some(CtorVariant::Allocating)
    } else if mangled.contains("C1E") {
        Some(CtorVariant::Complete)
    } else if mangled.contains("C2E") {
        Some(CtorVariant::Base)
    } else {
        None
    }
}

pub fn classify_dtor(mangled: &str) -> Option<DtorVariant> {
    if mangled.contains("D0Ev") {
        Some(DtorVariant::Deleting)
    } else if mangled.contains("D1Ev") {
        Some(DtorVariant::Complete)
    } else if mangled.contains("D2Ev") {
        Some(DtorVariant::Base)
    } else {
        None
    }
}
