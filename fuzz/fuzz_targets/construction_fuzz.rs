#![no_main]
use libfuzzer_sys::fuzz_target;
use lexcraft::{Construction, LexGrammar, LexerConfig, Regex};

/// Decodes bytes into a regex with a small stack machine over the alphabet
/// `{a, b, c}`. Returns the patterns left on the stack.
fn decode(ops: &[u8]) -> Vec<Regex> {
    let mut stack: Vec<Regex> = Vec::new();
    for &op in ops {
        match op % 8 {
            0 => stack.push(Regex::single(char::from(b'a' + op / 8 % 3))),
            1 => stack.push(Regex::empty()),
            2 => stack.push(Regex::range('a', 'b')),
            3 => {
                if let (Some(b), Some(a)) = (stack.pop(), stack.pop()) {
                    stack.push(a.concat(&b));
                }
            }
            4 => {
                if let (Some(b), Some(a)) = (stack.pop(), stack.pop()) {
                    stack.push(a.or(&b));
                }
            }
            5 => {
                if let Some(a) = stack.pop() {
                    stack.push(a.many());
                }
            }
            6 => {
                if let Some(a) = stack.pop() {
                    stack.push(a.one_or_many());
                }
            }
            _ => {
                // keeps the operand, so later ops build shared subtrees
                if let Some(a) = stack.last().cloned() {
                    stack.push(a.zero_or_one());
                }
            }
        }
        if stack.len() > 8 {
            break;
        }
    }
    stack
}

fuzz_target!(|data: &[u8]| {
    let split = data.len().min(48);
    let (ops, rest) = data.split_at(split);
    let patterns = decode(ops);
    let input: String = rest
        .iter()
        .take(32)
        .map(|b| char::from(b'a' + b % 3))
        .collect();

    let compile = |construction, minimize| {
        let mut grammar = LexGrammar::new();
        for (kind, pattern) in patterns.iter().enumerate() {
            grammar.define_token(kind, pattern.clone());
        }
        grammar.compile_with(LexerConfig {
            construction,
            minimize,
            ..LexerConfig::default()
        })
    };
    let reference = compile(Construction::Glushkov, false).tokenize(&input);
    for (construction, minimize) in [
        (Construction::Glushkov, true),
        (Construction::Thompson, false),
        (Construction::Thompson, true),
    ] {
        assert_eq!(compile(construction, minimize).tokenize(&input), reference);
    }
});
