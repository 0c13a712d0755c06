// Sun Aug 23 2026 - Alex
//
// Token grammar for MSVC-style undecorated output, which leads with an
// access specifier, return type and calling convention, spells class
// types with `class`/`struct` keywords and may append `__ptr64`:
//   "public: int __cdecl gui::Widget::area(int) const"

use crate::matcher::{name_matches, unscoped_name, word_set_eq, CtorVariant, DtorVariant};

const NOISE_WORDS: [&str; 5] = ["class", "struct", "enum", "union", "__ptr64"];

fn normalize_param(param: &str) -> String {
    param
        .split_whitespace()
        .filter(|w| !NOISE_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locate the call structure: the name token directly before the `(`,
/// the normalized parameter tokens, and everything after the `)`.
fn split_call<'a>(tokens: &'a [String]) -> Option<(&'a str, Vec<String>, &'a [String])> {
    let open = tokens.iter().position(|t| t == "(")?;
    if open == 0 {
        return None;
    }
    let close = open + 1 + tokens[open + 1..].iter().position(|t| t == ")")?;

    let mut params: Vec<String> = tokens[open + 1..close].iter().map(|t| normalize_param(t)).collect();
    // MSVC spells an empty parameter list as (void)
    if params.len() == 1 && params[0] == "void" {
        params.clear();
    }
    Some((tokens[open - 1].as_str(), params, &tokens[close + 1..]))
}

fn params_equal(candidate: &[String], wanted: &[String]) -> bool {
    candidate.len() == wanted.len()
        && candidate
            .iter()
            .zip(wanted)
            .all(|(c, w)| word_set_eq(c, &normalize_param(w)))
}

fn trailing_qualifiers_match(rest: &[String], is_const: bool, is_volatile: bool) -> bool {
    let mut want_const = is_const;
    let mut want_volatile = is_volatile;
    for token in rest {
        match token.as_str() {
            "const" if want_const => want_const = false,
            "volatile" if want_volatile => want_volatile = false,
            "__ptr64" => {}
            _ => return false,
        }
    }
    !want_const && !want_volatile
}

pub fn match_function(tokens: &[String], name: &str, params: &[String]) -> bool {
    match split_call(tokens) {
        Some((name_tok, candidate, rest)) => {
            name_matches(name_tok, name)
                && params_equal(&candidate, params)
                && trailing_qualifiers_match(rest, false, false)
        }
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
    match split_call(tokens) {
        Some((name_tok, candidate, rest)) => {
            name_matches(name_tok, &expected)
                && params_equal(&candidate, params)
                && trailing_qualifiers_match(rest, is_const, is_volatile)
        }
        None => false,
    }
}

pub fn match_constructor(tokens: &[String], class: &str, params: &[String]) -> bool {
    let expected = format!("{}::{}", class, unscoped_name(class));
    match split_call(tokens) {
        Some((name_tok, candidate, rest)) => {
            name_matches(name_tok, &expected)
                && params_equal(&candidate, params)
                && trailing_qualifiers_match(rest, false, false)
        }
        None => false,
    }
}

pub fn match_destructor(tokens: &[String], class: &str) -> bool {
    let expected = format!("{}::~{}", class, unscoped_name(class));
    match split_call(tokens) {
        Some((name_tok, candidate, rest)) => {
            name_matches(name_tok, &expected)
                && candidate.is_empty()
                && trailing_qualifiers_match(rest, false, false)
        }
        None => false,
    }
}

/// MSVC has one constructor entry point per overload; `??0` decorations
/// are all complete-object constructors.
pub fn classify_ctor(mangled: &str) -> Option<CtorVariant> {
    if mangled.starts_with("??0") {
        Some(CtorVariant::Complete)
    } else {
        None
    }
}

/// `??1` is the plain destructor; `??_G` (scalar) and `??_E` (vector)
/// are the deleting variants.
pub fn classify_dtor(mangled: &str) -> Option<DtorVariant> {
    if mangled.starts_with("??1") {
        Some(DtorVariant::Complete)
    } else if mangled.starts_with("??_G") || mangled.starts_with("??_E") {
        Some(DtorVariant::Deleting)
    } else {
        None
    }
}
