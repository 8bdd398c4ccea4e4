//! Tests for tokenizing behavior

use lexcraft::{
    Action, Construction, EngineKind, GrammarError, LexErrorKind, LexGrammar, Lexer, LexerConfig,
    Regex, Token,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TestTokenKind {
    Digit,
    If,
    Alphabet,
    As,
    Whitespace,
}

use TestTokenKind::{Alphabet, As, Digit, If, Whitespace};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn letters() -> Regex {
    Regex::charset(('a'..='z').chain('A'..='Z'))
}

/// DIGIT=[0-1]+, IF="if", ALPHABET=[a-zA-Z]+, AS="as", WHITESPACE={' ','\n'}
fn base_grammar() -> LexGrammar<TestTokenKind> {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Digit, Regex::range('0', '1').one_or_many());
    grammar.define_token(If, "if");
    grammar.define_token(Alphabet, letters().one_or_many());
    grammar.define_token(As, "as");
    grammar.define_token(Whitespace, Regex::charset([' ', '\n']));
    grammar
}

fn pairs<T: Copy>(tokens: &[Token<T>]) -> Vec<(T, &str)> {
    tokens.iter().map(|t| (t.kind, t.text.as_str())).collect()
}

#[test]
fn test_scenario_a_mixed_tokens() {
    init_logging();
    let lexer = base_grammar().compile();
    let tokens = lexer.tokenize("a 0 if").unwrap();
    assert_eq!(
        pairs(&tokens),
        vec![
            (Alphabet, "a"),
            (Whitespace, " "),
            (Digit, "0"),
            (Whitespace, " "),
            (If, "if"),
        ]
    );
}

#[test]
fn test_scenario_b_priority_on_ties() {
    let lexer = base_grammar().compile();
    let tokens = lexer.tokenize("if as").unwrap();
    assert_eq!(
        pairs(&tokens),
        vec![(If, "if"), (Whitespace, " "), (Alphabet, "as")]
    );
}

#[test]
fn test_scenario_c_reject_falls_back() {
    let mut grammar = base_grammar();
    grammar.token_mut(If).unwrap().set_action(|_| Action::Reject);
    let lexer = grammar.compile();
    let tokens = lexer.tokenize("if as").unwrap();
    assert_eq!(
        pairs(&tokens),
        vec![(Alphabet, "if"), (Whitespace, " "), (Alphabet, "as")]
    );
}

#[test]
fn test_longest_match_wins_over_keyword() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Alphabet, letters().one_or_many());
    grammar.define_token(If, "if");
    let tokens = grammar.compile().tokenize("ifasasa").unwrap();
    assert_eq!(pairs(&tokens), vec![(Alphabet, "ifasasa")]);
}

#[test]
fn test_reject_falls_back_to_shorter_boundary() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(As, "ab").set_action(|_| Action::Reject);
    grammar.define_token(Digit, "a");
    grammar.define_token(If, "b");
    let tokens = grammar.compile().tokenize("ab").unwrap();
    assert_eq!(pairs(&tokens), vec![(Digit, "a"), (If, "b")]);
}

#[test]
fn test_all_candidates_rejected_is_an_error() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(If, "if").set_action(|_| Action::Reject);
    let err = grammar.compile().tokenize("if").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedEof);
}

#[test]
fn test_basic_engine_cannot_reject() {
    let mut grammar = base_grammar();
    grammar.token_mut(If).unwrap().set_action(|_| Action::Reject);
    let config = LexerConfig {
        engine: EngineKind::Basic,
        ..LexerConfig::default()
    };
    let lexer = grammar.compile_with(config);
    let err = lexer.tokenize("if").unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::Unsupported(_)));
    assert_eq!(err.position.offset, 0);
}

#[test]
fn test_basic_engine_matches_stacked_without_rejects() {
    let lexer = base_grammar().compile();
    let input = "if as\n0110 asif ifas a1";
    let stacked = lexer.tokenize(input).unwrap();
    let basic = lexer
        .process_with(lexcraft::StringStream::new(input), EngineKind::Basic)
        .read_all_tokens()
        .unwrap();
    assert_eq!(stacked, basic);
}

#[test]
fn test_thompson_construction_without_minimization() {
    init_logging();
    let config = LexerConfig {
        construction: Construction::Thompson,
        minimize: false,
        ..LexerConfig::default()
    };
    let thompson = base_grammar().compile_with(config);
    let glushkov = base_grammar().compile();
    let input = "a 0 if as ifas 1010\nAs";
    assert_eq!(
        thompson.tokenize(input).unwrap(),
        glushkov.tokenize(input).unwrap()
    );
}

#[test]
fn test_unexpected_char_reports_position() {
    let lexer = base_grammar().compile();
    let mut engine = lexer.process_str("a\n $");
    assert_eq!(engine.next().unwrap().unwrap().kind, Alphabet);
    assert_eq!(engine.next().unwrap().unwrap().kind, Whitespace);
    assert_eq!(engine.next().unwrap().unwrap().kind, Whitespace);
    let err = engine.next().unwrap().unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedChar('$'));
    assert_eq!(err.to_string(), "[2:1]: Unexpected character '$'");
    // the iterator is fused after an error
    assert!(engine.next().is_none());
}

#[test]
fn test_unexpected_eof_mid_token() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(If, "iff");
    let err = grammar.compile().tokenize("if").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedEof);
    assert_eq!(err.to_string(), "[1:2]: Unexpected end of file");
}

#[test]
fn test_clean_eof() {
    let lexer = base_grammar().compile();
    let mut engine = lexer.process_str("");
    assert_eq!(engine.read_token().unwrap(), None);
    assert!(lexer.tokenize("").unwrap().is_empty());
}

#[test]
fn test_token_positions() {
    let lexer = base_grammar().compile();
    let tokens = lexer.tokenize("if\nas").unwrap();
    let last = tokens.last().unwrap();
    assert_eq!((last.position.line, last.position.column), (2, 0));
    assert_eq!(last.position.offset, 3);
}

#[test]
fn test_ignored_and_unnamed_tokens_are_skipped() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Alphabet, letters().one_or_many());
    grammar.define_token(Whitespace, Regex::single(' ')).ignore();
    grammar.define_unnamed(Regex::single('\n'));
    let tokens = grammar.compile().tokenize("a b\nc").unwrap();
    assert_eq!(
        pairs(&tokens),
        vec![(Alphabet, "a"), (Alphabet, "b"), (Alphabet, "c")]
    );
}

#[test]
fn test_accept_rewrites_kind_and_text() {
    let mut grammar = LexGrammar::new();
    grammar.declare_token(As);
    grammar
        .define_token(Alphabet, letters().one_or_many())
        .set_action(|ctx| Action::accept(As, ctx.text().to_uppercase()));
    let tokens = grammar.compile().tokenize("abc").unwrap();
    assert_eq!(pairs(&tokens), vec![(As, "ABC")]);
}

#[test]
fn test_action_failure_is_position_tagged() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Whitespace, Regex::single(' '));
    grammar
        .define_token(Digit, Regex::range('0', '9').one_or_many())
        .set_action(|ctx| {
            if ctx.text().len() > 3 {
                Action::fail("number too long")
            } else {
                Action::Continue
            }
        });
    let lexer = grammar.compile();
    assert_eq!(lexer.tokenize("12 345").unwrap().len(), 3);
    let err = lexer.tokenize("12 3456").unwrap_err();
    assert_eq!(err.to_string(), "[1:3]: number too long");
}

#[test]
fn test_pop_below_base_context() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(If, ")").set_action(|_| Action::PopContext);
    let err = grammar.compile().tokenize(")").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::EmptyContextStack);
}

#[test]
fn test_push_undefined_context() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(If, "(").set_action(|_| Action::push("nowhere"));
    let err = grammar.compile().tokenize("(").unwrap_err();
    assert_eq!(
        err.kind,
        LexErrorKind::Grammar(GrammarError::UndefinedContext("nowhere".into()))
    );
    assert_eq!(err.to_string(), "[1:0]: Undefined context: nowhere");
}

#[test]
fn test_context_without_tokens_matches_nothing() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(If, "(").set_action(|_| Action::push("void"));
    let _ = grammar.define_context("void").unwrap();
    let lexer = grammar.compile();
    let err = lexer.tokenize("(x").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedChar('x'));
    let err = lexer.tokenize("(").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::ContextStackNonEmpty("void".into()));
}

#[test]
fn test_rejected_action_leaves_context_stack_untouched() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Digit, "x");
    grammar.define_token(If, "xy").set_action(|ctx| {
        if let Err(kind) = ctx.push_context("inner") {
            return kind.into();
        }
        Action::Reject
    });
    grammar.define_token(Alphabet, Regex::charset(['x', 'y']).one_or_many());
    grammar.define_token(As, "zz");
    grammar
        .define_context("inner")
        .unwrap()
        .define_token(Whitespace, " ");
    let lexer = grammar.compile();
    let mut engine = lexer.process_str("xy");
    assert_eq!(pairs(&[engine.read_token().unwrap().unwrap()]), vec![(Alphabet, "xy")]);
    assert_eq!(engine.current_context(), "DEFAULT");
    assert_eq!(engine.context_depth(), 1);
}

#[test]
fn test_rejected_action_leaves_buffer_untouched() {
    let mut grammar = LexGrammar::new();
    grammar.define_token(Alphabet, "ab").set_action(|ctx| {
        ctx.buffer_mut().push_str("junk");
        Action::Reject
    });
    grammar
        .define_token(Digit, "a")
        .set_action(|ctx| Action::accept(Digit, format!("{}{}", ctx.buffer(), ctx.text())));
    grammar.define_token(If, "b");
    let tokens = grammar.compile().tokenize("ab").unwrap();
    assert_eq!(pairs(&tokens), vec![(Digit, "a"), (If, "b")]);
}

#[test]
fn test_accepting_an_undefined_kind_fails() {
    let mut grammar = LexGrammar::new();
    grammar
        .define_token(If, "x")
        .set_action(|_| Action::accept(As, "x"));
    let err = grammar.compile().tokenize("x").unwrap_err();
    assert_eq!(
        err.kind,
        LexErrorKind::Grammar(GrammarError::UndefinedToken("As".to_owned()))
    );
    assert_eq!(err.to_string(), "[1:0]: Undefined token: As");
}

#[test]
fn test_sub_context_may_accept_default_kinds() {
    let mut grammar = LexGrammar::new();
    grammar.declare_token(As);
    grammar.define_token(If, "(").set_action(|_| Action::push("inner"));
    grammar
        .define_context("inner")
        .unwrap()
        .define_token(Digit, ")")
        .set_action(|ctx| {
            if let Err(kind) = ctx.pop_context() {
                return kind.into();
            }
            Action::accept(As, "()")
        });
    let tokens = grammar.compile().tokenize("()").unwrap();
    assert_eq!(pairs(&tokens), vec![(As, "()")]);
}

mod strings {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Quote,
        Ident,
        Whitespace,
        Str,
    }

    fn hex_digit() -> Regex {
        Regex::charset(('0'..='9').chain('a'..='f').chain('A'..='F'))
    }

    fn string_grammar() -> LexGrammar<Kind> {
        let mut grammar = LexGrammar::new();
        grammar.define_token(Kind::Quote, "\"").set_action(|ctx| {
            ctx.buffer_mut().clear();
            Action::push("string")
        });
        grammar.define_token(Kind::Ident, letters().one_or_many());
        grammar
            .define_token(Kind::Whitespace, Regex::charset([' ', '\n', '\t']))
            .ignore();
        grammar.declare_token(Kind::Str);

        let mut string = grammar.define_context("string").unwrap();
        string.define_unnamed("\\n").set_action(|ctx| {
            ctx.buffer_mut().push('\n');
            Action::Skip
        });
        string.define_unnamed("\\\"").set_action(|ctx| {
            ctx.buffer_mut().push('"');
            Action::Skip
        });
        let hex = hex_digit();
        string
            .define_unnamed(Regex::string("\\u").concat(&Regex::sequence([&hex, &hex, &hex, &hex])))
            .set_action(|ctx| {
                let decoded = u32::from_str_radix(&ctx.text()[2..], 16)
                    .ok()
                    .and_then(char::from_u32);
                match decoded {
                    Some(c) => {
                        ctx.buffer_mut().push(c);
                        Action::Skip
                    }
                    None => Action::fail("invalid unicode escape"),
                }
            });
        string.define_token(Kind::Str, "\"").set_action(|ctx| {
            if let Err(kind) = ctx.pop_context() {
                return kind.into();
            }
            Action::accept(Kind::Str, ctx.take_buffer())
        });
        string
            .define_unnamed("\n")
            .set_action(|_| Action::fail("unterminated string literal"));
        string.define_unnamed(Regex::any_char()).set_action(|ctx| {
            let text = ctx.text();
            ctx.buffer_mut().push_str(text);
            Action::Skip
        });
        grammar
    }

    fn lexer() -> Lexer<Kind> {
        string_grammar().compile()
    }

    #[test]
    fn test_scenario_d_escapes() {
        init_logging();
        let tokens = lexer().tokenize(r#""te\"st\n""#).unwrap();
        assert_eq!(pairs(&tokens), vec![(Kind::Str, "te\"st\n")]);
    }

    #[test]
    fn test_unicode_escape() {
        let tokens = lexer().tokenize(r#"x "\u0041\u00e9" y"#).unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![(Kind::Ident, "x"), (Kind::Str, "Aé"), (Kind::Ident, "y")]
        );
    }

    #[test]
    fn test_literal_newline_in_string_fails() {
        let err = lexer().tokenize("\"te\nst\"").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::custom("unterminated string literal"));
        assert_eq!(err.to_string(), "[1:3]: unterminated string literal");
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let lexer = lexer();
        let mut engine = lexer.process_str(r#""te"st""#);
        assert_eq!(engine.read_token().unwrap().unwrap().text, "te");
        assert_eq!(engine.current_context(), "DEFAULT");
        assert_eq!(engine.read_token().unwrap().unwrap().text, "st");
        let err = engine.read_token().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::ContextStackNonEmpty("string".into()));
        assert_eq!(engine.context_depth(), 2);
        assert!(lexer.tokenize(r#""ok""#).is_ok());
    }

    #[test]
    fn test_empty_string_literal() {
        let tokens = lexer().tokenize(r#"a "" b"#).unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![(Kind::Ident, "a"), (Kind::Str, ""), (Kind::Ident, "b")]
        );
    }

    #[test]
    fn test_buffer_does_not_leak_between_strings() {
        let tokens = lexer().tokenize(r#""one" "two""#).unwrap();
        assert_eq!(pairs(&tokens), vec![(Kind::Str, "one"), (Kind::Str, "two")]);
    }
}
