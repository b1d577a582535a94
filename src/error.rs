use std::io;
use thiserror::Error;

/// Errors raised while loading a grammar. A grammar that fails to load is
/// never partially usable.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown rule reference in <{rule}>: no rule or terminal generator named '{name}'")]
    UnknownRuleReference { rule: String, name: String },

    #[error("Invalid alternation in <{rule}>: {reason}")]
    InvalidAlternation { rule: String, reason: String },

    #[error("Invalid optional in <{rule}>: probability {probability} is outside (0, 1]")]
    InvalidOptional { rule: String, probability: f64 },

    #[error("Invalid rule name: '{0}'")]
    InvalidRuleName(String),

    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),
}

/// Errors raised by a single expansion. The grammar and registry involved
/// stay valid for later calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpansionError {
    #[error("Recursion limit of {limit} exceeded: {}", render_chain(.chain))]
    RecursionLimitExceeded { limit: usize, chain: Vec<String> },

    #[error("Unresolved terminal '{name}' reached via {}", render_chain(.chain))]
    UnresolvedTerminal { name: String, chain: Vec<String> },

    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),

    #[error("Invalid depth limit {requested}: must be between 1 and {max}")]
    InvalidDepthLimit { requested: usize, max: usize },
}

impl ExpansionError {
    /// The reference chain that led to the failure, outermost rule first.
    pub fn chain(&self) -> &[String] {
        match self {
            ExpansionError::RecursionLimitExceeded { chain, .. }
            | ExpansionError::UnresolvedTerminal { chain, .. } => chain,
            ExpansionError::UnknownEntryPoint(_) | ExpansionError::InvalidDepthLimit { .. } => &[],
        }
    }
}

fn render_chain(chain: &[String]) -> String {
    if chain.is_empty() {
        return "<entry>".to_string();
    }
    chain.join(" -> ")
}

/// Errors surfaced by [`crate::Synthesizer`].
#[derive(Error, Debug)]
pub enum SynthError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error("Unknown grammar: {0}")]
    UnknownGrammar(String),
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursion_message_names_chain() {
        let err = ExpansionError::RecursionLimitExceeded {
            limit: 3,
            chain: vec!["start".into(), "expr".into(), "expr".into(), "expr".into()],
        };
        assert_eq!(
            err.to_string(),
            "Recursion limit of 3 exceeded: start -> expr -> expr -> expr"
        );
        assert_eq!(err.chain().len(), 4);
    }

    #[test]
    fn test_unknown_reference_message() {
        let err = GrammarError::UnknownRuleReference {
            rule: "start".into(),
            name: "nope".into(),
        };
        assert!(err.to_string().contains("'nope'"));
    }
}
