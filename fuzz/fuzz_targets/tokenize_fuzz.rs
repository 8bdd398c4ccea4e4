#![no_main]
use libfuzzer_sys::fuzz_target;
use lexcraft::{Action, LexGrammar, Lexer, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FuzzTokenKind {
    Keyword,
    Ident,
    Number,
    Whitespace,
    Str,
}

fn lexer() -> &'static Lexer<FuzzTokenKind> {
    static LEXER: OnceLock<Lexer<FuzzTokenKind>> = OnceLock::new();
    LEXER.get_or_init(|| {
        let letter = Regex::charset(('a'..='z').chain('A'..='Z'));
        let mut grammar = LexGrammar::new();
        grammar.define_token(FuzzTokenKind::Keyword, "if");
        grammar.define_token(FuzzTokenKind::Ident, letter.one_or_many());
        grammar
            .define_token(FuzzTokenKind::Number, Regex::range('0', '9').one_or_many())
            .set_action(|ctx| {
                if ctx.text().starts_with('0') && ctx.text().len() > 1 {
                    Action::Reject
                } else {
                    Action::Continue
                }
            });
        grammar.define_token(FuzzTokenKind::Whitespace, Regex::single(' ')).ignore();
        grammar
            .define_token(FuzzTokenKind::Str, "\"")
            .set_action(|_| Action::push("string"));
        if let Ok(mut string) = grammar.define_context("string") {
            string.define_token(FuzzTokenKind::Str, "\"").set_action(|ctx| {
                if let Err(kind) = ctx.pop_context() {
                    return kind.into();
                }
                Action::accept(FuzzTokenKind::Str, ctx.take_buffer())
            });
            string.define_unnamed(Regex::any_char()).set_action(|ctx| {
                let text = ctx.text();
                ctx.buffer_mut().push_str(text);
                Action::Skip
            });
        }
        grammar.compile()
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // Tokenizing must never panic, whatever the input.
    let _ = lexer().tokenize(input);
});
