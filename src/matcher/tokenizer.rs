// Sun Aug 23 2026 - Alex

/// Split one demangled declaration into structural tokens.
///
/// Outside the argument list, whitespace separates tokens and a template
/// `<...>` run is swallowed into the current token whole. The opening
/// `(` of the argument list and the matching top-level `)` are emitted
/// as their own tokens. Inside the list, one token per parameter type;
/// nested parens (function-pointer parameters) and template brackets are
/// depth-tracked so only a top-level `,` splits. Trailing cv-qualifiers
/// after the `)` fall back to whitespace splitting and come out as their
/// own tokens.
pub fn tokenize(decl: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_args = false;
    let mut angle = 0usize;
    let mut paren = 0usize;

    for c in decl.chars() {
        if in_args {
            match c {
                '<' => {
                    angle += 1;
                    current.push(c);
                }
                '>' => {
                    angle = angle.saturating_sub(1);
                    current.push(c);
                }
                '(' => {
                    paren += 1;
                    current.push(c);
                }
                ')' if paren > 0 => {
                    paren -= 1;
                    current.push(c);
                }
                ')' if angle == 0 => {
                    flush(&mut tokens, &mut current);
                    tokens.push(")".to_string());
                    in_args = false;
                }
                ',' if angle == 0 && paren == 0 => {
                    flush(&mut tokens, &mut current);
                }
                _ => current.push(c),
            }
        } else {
            match c {
                '<' => {
                    angle += 1;
                    current.push(c);
                }
                '>' => {
                    angle = angle.saturating_sub(1);
                    current.push(c);
                }
                '(' if angle == 0 => {
                    flush(&mut tokens, &mut current);
                    tokens.push("(".to_string());
                    in_args = true;
                    paren = 0;
                }
                c if c.is_whitespace() && angle == 0 => {
                    flush(&mut tokens, &mut current);
                }
                _ => current.push(c),
            }
        }
    }
    flush(&mut tokens, &mut current);
    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(decl: &str) -> Vec<String> {
        tokenize(decl)
    }

    #[test]
    fn test_plain_function() {
        assert_eq!(toks("foo(int)"), vec!["foo", "(", "int", ")"]);
    }

    #[test]
    fn test_scoped_name_and_empty_args() {
        assert_eq!(toks("ns::foo()"), vec!["ns::foo", "(", ")"]);
    }

    #[test]
    fn test_multi_word_parameter_stays_one_token() {
        assert_eq!(
            toks("f(unsigned int, long long)"),
            vec!["f", "(", "unsigned int", "long long", ")"]
        );
    }

    #[test]
    fn test_nested_template_in_name() {
        assert_eq!(
            toks("std::vector<std::pair<int, long>>::push_back(int)"),
            vec![
                "std::vector<std::pair<int, long>>::push_back",
                "(",
                "int",
                ")"
            ]
        );
    }

    #[test]
    fn test_template_parameter_comma_does_not_split() {
        assert_eq!(
            toks("f(std::map<int, long>, double)"),
            vec!["f", "(", "std::map<int, long>", "double", ")"]
        );
    }

    #[test]
    fn test_function_pointer_parameter() {
        assert_eq!(
            toks("f(void (*)(int, char), double)"),
            vec!["f", "(", "void (*)(int, char)", "double", ")"]
        );
    }

    #[test]
    fn test_trailing_cv_qualifiers() {
        assert_eq!(
            toks("Widget::area() const"),
            vec!["Widget::area", "(", ")", "const"]
        );
        assert_eq!(
            toks("Widget::poll(int) const volatile"),
            vec!["Widget::poll", "(", "int", ")", "const", "volatile"]
        );
    }

    #[test]
    fn test_msvc_style_leading_tokens() {
        assert_eq!(
            toks("public: int __cdecl Widget::area(int) const"),
            vec![
                "public:",
                "int",
                "__cdecl",
                "Widget::area",
                "(",
                "int",
                ")",
                "const"
            ]
        );
    }

    #[test]
    fn test_leading_name_token_survives_round_trip() {
        // tokenizing a demangled declaration must reproduce the scoped
        // name the symbol was built from
        let tokens = toks("audio::Mixer::set_gain(float)");
        assert_eq!(tokens[0], "audio::Mixer::set_gain");
    }
}
