//! Property-based tests for the automaton pipeline
//!
//! These tests use proptest to generate random token sets over a small
//! alphabet and verify that every compilation route tokenizes the same way.

#![cfg(test)]

use lexcraft::{Construction, EngineKind, LexGrammar, Lexer, LexerConfig, Regex, StringStream};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Regex> {
    prop_oneof![
        prop::sample::select(vec!['a', 'b', 'c']).prop_map(Regex::single),
        "[abc]{1,3}".prop_map(Regex::string),
        Just(Regex::range('a', 'b')),
        Just(Regex::empty()),
    ]
}

fn regex() -> impl Strategy<Value = Regex> {
    leaf().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.concat(&b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(&b)),
            inner.clone().prop_map(|r| r.many()),
            inner.clone().prop_map(|r| r.one_or_many()),
            inner.prop_map(|r| r.zero_or_one()),
        ]
    })
}

fn token_set() -> impl Strategy<Value = Vec<Regex>> {
    prop::collection::vec(regex(), 1..5)
}

fn input() -> impl Strategy<Value = String> {
    "[abc]{0,16}"
}

fn build(patterns: &[Regex], config: LexerConfig) -> Lexer<usize> {
    let mut grammar = LexGrammar::new();
    for (kind, pattern) in patterns.iter().enumerate() {
        grammar.define_token(kind, pattern.clone());
    }
    grammar.compile_with(config)
}

fn config(construction: Construction, minimize: bool) -> LexerConfig {
    LexerConfig {
        construction,
        minimize,
        ..LexerConfig::default()
    }
}

proptest! {
    #[test]
    fn minimization_preserves_tokenization(patterns in token_set(), text in input()) {
        for construction in [Construction::Glushkov, Construction::Thompson] {
            let plain = build(&patterns, config(construction, false));
            let minimized = build(&patterns, config(construction, true));
            prop_assert_eq!(plain.tokenize(&text), minimized.tokenize(&text));
        }
    }

    #[test]
    fn constructions_agree(patterns in token_set(), text in input()) {
        let glushkov = build(&patterns, config(Construction::Glushkov, false));
        let thompson = build(&patterns, config(Construction::Thompson, false));
        prop_assert_eq!(glushkov.tokenize(&text), thompson.tokenize(&text));
    }

    #[test]
    fn engines_agree_without_actions(patterns in token_set(), text in input()) {
        let lexer = build(&patterns, LexerConfig::default());
        let stacked = lexer.process_with(StringStream::new(&text), EngineKind::Stacked).read_all_tokens();
        let basic = lexer.process_with(StringStream::new(&text), EngineKind::Basic).read_all_tokens();
        prop_assert_eq!(stacked, basic);
    }

    #[test]
    fn tokens_cover_the_input(patterns in token_set(), text in input()) {
        let lexer = build(&patterns, LexerConfig::default());
        if let Ok(tokens) = lexer.tokenize(&text) {
            let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
            prop_assert_eq!(joined, text);
            prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].position < pair[1].position);
            }
        }
    }

    #[test]
    fn minimized_table_is_never_larger(patterns in token_set()) {
        let plain = build(&patterns, config(Construction::Glushkov, false));
        let minimized = build(&patterns, config(Construction::Glushkov, true));
        let (Some(plain), Some(minimized)) = (plain.context(0).table(), minimized.context(0).table()) else {
            return Ok(());
        };
        prop_assert!(minimized.state_count() <= plain.state_count());
    }
}
