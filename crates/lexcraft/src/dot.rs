//! Graphviz rendering of automata
//!
//! Produces DOT text for an [`Nfa`] or a [`Dfa`], handy when debugging why a
//! grammar tokenizes the way it does:
//!
//! ```rust
//! use lexcraft::{dot, nfa::glushkov, Regex};
//! use lexcraft::id::TokenId;
//!
//! let nfa = glushkov::translate(&Regex::string("if").group(TokenId(0)));
//! let text = dot::nfa_to_dot(&nfa, |id| id.to_string());
//! assert!(text.starts_with("digraph Nfa {"));
//! ```

use crate::dfa::Dfa;
use crate::id::TokenId;
use crate::nfa::Nfa;
use std::collections::BTreeMap;
use std::fmt::Write;

fn label(c: char) -> String {
    match c {
        '"' => "\\\"".to_owned(),
        '\\' => "\\\\".to_owned(),
        c if c.is_ascii_graphic() => c.to_string(),
        c => c.escape_default().to_string().replace('\\', "\\\\"),
    }
}

fn tokens_label(tokens: &[TokenId], token_name: &impl Fn(TokenId) -> String) -> String {
    tokens
        .iter()
        .map(|&t| token_name(t))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes one edge per (source, target) pair, listing every label on it.
fn write_edges(output: &mut String, from: usize, edges: BTreeMap<usize, Vec<String>>) {
    for (to, labels) in edges {
        let _ = writeln!(output, "  s{from} -> s{to} [label=\"{}\"];", labels.join(" "));
    }
}

/// Generate a DOT representation of an NFA
///
/// Accepting states are drawn as double circles labeled with their token; epsilon
/// edges are labeled `ε`.
pub fn nfa_to_dot(nfa: &Nfa, token_name: impl Fn(TokenId) -> String) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "digraph Nfa {{");
    let _ = writeln!(output, "  rankdir=LR;");
    let _ = writeln!(output, "  entry [shape=point];");

    for (id, state) in nfa.states().iter().enumerate() {
        match state.matched() {
            Some(token) => {
                let _ = writeln!(
                    output,
                    "  s{id} [shape=doublecircle, label=\"{id}\\n{}\"];",
                    token_name(token)
                );
            }
            None => {
                let _ = writeln!(output, "  s{id} [shape=circle, label=\"{id}\"];");
            }
        }
    }

    let entry = nfa.entry();
    let entry_label = entry.label.map_or_else(|| "ε".to_owned(), label);
    let _ = writeln!(
        output,
        "  entry -> s{} [label=\"{entry_label}\"];",
        entry.target.index()
    );

    for (id, state) in nfa.states().iter().enumerate() {
        let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for edge in state.edges() {
            grouped
                .entry(edge.target.index())
                .or_default()
                .push(edge.label.map_or_else(|| "ε".to_owned(), label));
        }
        write_edges(&mut output, id, grouped);
    }

    let _ = writeln!(output, "}}");
    output
}

/// Generate a DOT representation of a DFA
pub fn dfa_to_dot(dfa: &Dfa, token_name: impl Fn(TokenId) -> String) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "digraph Dfa {{");
    let _ = writeln!(output, "  rankdir=LR;");
    let _ = writeln!(output, "  entry [shape=point];");

    for (id, state) in dfa.states().iter().enumerate() {
        if state.matched().is_empty() {
            let _ = writeln!(output, "  s{id} [shape=circle, label=\"{id}\"];");
        } else {
            let _ = writeln!(
                output,
                "  s{id} [shape=doublecircle, label=\"{id}\\n{}\"];",
                tokens_label(state.matched(), &token_name)
            );
        }
    }
    let _ = writeln!(output, "  entry -> s{};", dfa.start().index());

    for (id, state) in dfa.states().iter().enumerate() {
        let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (&c, target) in state.edges() {
            grouped.entry(target.index()).or_default().push(label(c));
        }
        write_edges(&mut output, id, grouped);
    }

    let _ = writeln!(output, "}}");
    output
}
