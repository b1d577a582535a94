use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{GrammarError, Result};
use crate::rule::{Definitions, Rule};

/// Name of the default entry point.
pub const DEFAULT_ENTRY: &str = "start";

static RULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid rule name pattern"));

/// A validated, read-only collection of named rules.
///
/// Every reference inside a loaded grammar names either one of its own
/// rules or one of the external terminal names it was loaded against.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// The rules, keyed by name
    rules: HashMap<String, Rule>,
    /// Published entry points, sorted
    entries: Vec<String>,
}

impl Grammar {
    /// Validate raw definitions and build a grammar.
    ///
    /// `externals` lists the names that terminal generators will supply.
    /// A reference that names neither a defined rule nor an external fails
    /// with [`GrammarError::UnknownRuleReference`].
    pub fn load<I, S>(definitions: Definitions, externals: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules: HashMap<String, Rule> = definitions
            .into_iter()
            .map(|(name, def)| (name, Rule::from(def)))
            .collect();
        Self::from_rules(rules, externals)
    }

    /// Build a grammar from already constructed rules, with the same checks as [`Grammar::load`].
    pub fn from_rules<I, S>(rules: HashMap<String, Rule>, externals: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let externals: HashSet<String> = externals
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();

        // Sorted so the first reported error does not depend on hash order
        let mut names: Vec<&String> = rules.keys().collect();
        names.sort();

        for name in &names {
            if !RULE_NAME.is_match(name) {
                return Err(GrammarError::InvalidRuleName(name.to_string()));
            }
        }

        for name in &names {
            validate_rule(name, &rules[*name], &rules, &externals)?;
        }

        let entries = names
            .iter()
            .filter(|name| is_entry_name(name))
            .map(|name| name.to_string())
            .collect::<Vec<_>>();

        debug!(rules = rules.len(), entries = ?entries, "loaded grammar");

        Ok(Grammar { rules, entries })
    }

    /// Parse and validate a grammar from its JSON text.
    pub fn from_json_str<I, S>(json: &str, externals: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definitions: Definitions = serde_json::from_str(json)?;
        Self::load(definitions, externals)
    }

    /// Parse and validate a grammar from a JSON file.
    pub fn from_file<P, I, S>(path: P, externals: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "reading grammar file");
        Self::from_json_str(&text, externals)
    }

    /// Replace the published entry points. Every name must be a defined rule.
    pub fn with_entries<I, S>(mut self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut published = Vec::new();
        for entry in entries {
            let entry = entry.as_ref();
            if !self.rules.contains_key(entry) {
                return Err(GrammarError::UnknownEntryPoint(entry.to_string()));
            }
            published.push(entry.to_string());
        }
        published.sort();
        published.dedup();
        self.entries = published;
        Ok(self)
    }

    /// Look up a rule by name.
    pub fn resolve(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Check if the grammar defines a specific rule
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Get a reference to the grammar's rules
    pub fn rules(&self) -> &HashMap<String, Rule> {
        &self.rules
    }

    /// Published entry points, sorted by name.
    pub fn entry_points(&self) -> &[String] {
        &self.entries
    }

    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn is_entry_name(name: &str) -> bool {
    name == DEFAULT_ENTRY || name.starts_with("start_")
}

fn validate_rule(
    owner: &str,
    rule: &Rule,
    rules: &HashMap<String, Rule>,
    externals: &HashSet<String>,
) -> Result<()> {
    match rule {
        Rule::Literal(_) => Ok(()),
        Rule::Sequence(children) => {
            for child in children {
                validate_rule(owner, child, rules, externals)?;
            }
            Ok(())
        }
        Rule::Alternation(branches) => {
            if branches.is_empty() {
                return Err(GrammarError::InvalidAlternation {
                    rule: owner.to_string(),
                    reason: "alternation has no branches".to_string(),
                });
            }
            for branch in branches {
                if !(branch.weight.is_finite() && branch.weight > 0.0) {
                    return Err(GrammarError::InvalidAlternation {
                        rule: owner.to_string(),
                        reason: format!("branch weight {} is not positive", branch.weight),
                    });
                }
                validate_rule(owner, &branch.rule, rules, externals)?;
            }
            let total: f64 = branches.iter().map(|b| b.weight).sum();
            if !total.is_finite() {
                return Err(GrammarError::InvalidAlternation {
                    rule: owner.to_string(),
                    reason: "total branch weight is not finite".to_string(),
                });
            }
            Ok(())
        }
        Rule::Optional { inner, probability } => {
            if !(*probability > 0.0 && *probability <= 1.0) {
                return Err(GrammarError::InvalidOptional {
                    rule: owner.to_string(),
                    probability: *probability,
                });
            }
            validate_rule(owner, inner, rules, externals)
        }
        Rule::Reference(name) => {
            if rules.contains_key(name) || externals.contains(name) {
                Ok(())
            } else {
                Err(GrammarError::UnknownRuleReference {
                    rule: owner.to_string(),
                    name: name.clone(),
                })
            }
        }
    }
}

/// Builder for constructing Grammar instances in code
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: HashMap<String, Rule>,
    externals: Vec<String>,
    entries: Option<Vec<String>>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule
    pub fn rule(mut self, name: &str, rule: impl Into<Rule>) -> Self {
        self.rules.insert(name.to_string(), rule.into());
        self
    }

    /// Declare a name supplied by a terminal generator
    pub fn external(mut self, name: &str) -> Self {
        self.externals.push(name.to_string());
        self
    }

    /// Publish an explicit set of entry points instead of the `start*` rules
    pub fn entries(mut self, entries: &[&str]) -> Self {
        self.entries = Some(entries.iter().map(|e| e.to_string()).collect());
        self
    }

    /// Validate and build the grammar
    pub fn build(self) -> Result<Grammar> {
        let grammar = Grammar::from_rules(self.rules, &self.externals)?;
        match self.entries {
            Some(entries) => grammar.with_entries(entries),
            None => Ok(grammar),
        }
    }
}
