//! Identifier generators for the bundled grammars.
//!
//! Names are assembled from a small vocabulary of programming words and
//! rendered in one of the common identifier styles.

use crate::random::RandomSource;

const VERBS: &[&str] = &[
    "add", "apply", "build", "check", "clear", "close", "copy", "count", "create", "delete",
    "find", "flush", "get", "init", "insert", "load", "merge", "open", "parse", "push", "read",
    "remove", "reset", "resolve", "save", "scan", "send", "set", "sort", "split", "update",
    "write",
];

const NOUNS: &[&str] = &[
    "block", "buffer", "cache", "count", "data", "entry", "file", "frame", "handle", "index",
    "item", "key", "len", "line", "list", "map", "node", "offset", "page", "path", "queue",
    "record", "result", "size", "slot", "state", "table", "text", "token", "value", "width",
];

const QUALIFIERS: &[&str] = &[
    "all", "first", "last", "max", "min", "new", "next", "old", "prev", "total",
];

/// Identifier casing styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `buffer`
    Lower,
    /// `read_buffer`
    Snake,
    /// `readBuffer`
    Camel,
}

impl NameStyle {
    fn pick(rng: &mut dyn RandomSource) -> Self {
        match rng.next_index(3) {
            0 => NameStyle::Lower,
            1 => NameStyle::Snake,
            _ => NameStyle::Camel,
        }
    }

    /// Join words in this style. `Lower` concatenates without separators.
    pub fn join(self, words: &[&str]) -> String {
        match self {
            NameStyle::Lower => words.concat(),
            NameStyle::Snake => words.join("_"),
            NameStyle::Camel => {
                let mut out = String::new();
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn pick<'a>(rng: &mut dyn RandomSource, words: &[&'a str]) -> &'a str {
    words[rng.next_index(words.len())]
}

/// A function name: a verb, optionally followed by a noun.
pub fn generic_function_name(rng: &mut dyn RandomSource) -> String {
    let style = NameStyle::pick(rng);
    let verb = pick(rng, VERBS);
    if rng.next_bool(0.75) {
        let noun = pick(rng, NOUNS);
        style.join(&[verb, noun])
    } else {
        verb.to_string()
    }
}

/// A variable name: a noun, optionally preceded by a qualifier.
pub fn generic_variable_name(rng: &mut dyn RandomSource) -> String {
    let style = NameStyle::pick(rng);
    if rng.next_bool(0.3) {
        let qualifier = pick(rng, QUALIFIERS);
        let noun = pick(rng, NOUNS);
        style.join(&[qualifier, noun])
    } else {
        pick(rng, NOUNS).to_string()
    }
}
