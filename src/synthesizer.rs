use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::builtin;
use crate::error::{ExpansionError, SynthError};
use crate::expander::{ExpansionConfig, Expander};
use crate::grammar::Grammar;
use crate::output::Synthesis;
use crate::random::{RandomSource, SeededRandom};
use crate::registry::TerminalRegistry;

/// A set of loaded grammars sharing one terminal registry.
///
/// Everything here is read-only once loaded, so a `Synthesizer` can be
/// shared across threads; every call seeds its own random source.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    grammars: HashMap<String, Grammar>,
    registry: TerminalRegistry,
    config: ExpansionConfig,
}

impl Synthesizer {
    /// Create a synthesizer with no grammars
    pub fn new(registry: TerminalRegistry) -> Self {
        Synthesizer {
            grammars: HashMap::new(),
            registry,
            config: ExpansionConfig::default(),
        }
    }

    /// Create a synthesizer with the default registry and every bundled grammar
    pub fn with_builtin() -> Result<Self, SynthError> {
        let mut synthesizer = Synthesizer::new(TerminalRegistry::with_defaults());
        for (id, json) in builtin::sources() {
            synthesizer.load_json(id, json)?;
        }
        Ok(synthesizer)
    }

    pub fn with_config(mut self, config: ExpansionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn registry(&self) -> &TerminalRegistry {
        &self.registry
    }

    /// Add an already loaded grammar, replacing any grammar with the same id
    pub fn add_grammar(&mut self, id: &str, grammar: Grammar) -> &Grammar {
        self.grammars.insert(id.to_string(), grammar);
        &self.grammars[id]
    }

    /// Load a grammar from JSON, validated against the registry's names
    pub fn load_json(&mut self, id: &str, json: &str) -> Result<&Grammar, SynthError> {
        let grammar = Grammar::from_json_str(json, self.registry.names())?;
        debug!(id, rules = grammar.len(), "registered grammar");
        Ok(self.add_grammar(id, grammar))
    }

    /// Load a grammar from a JSON file, validated against the registry's names
    pub fn load_file<P: AsRef<Path>>(&mut self, id: &str, path: P) -> Result<&Grammar, SynthError> {
        let grammar = Grammar::from_file(path, self.registry.names())?;
        debug!(id, rules = grammar.len(), "registered grammar");
        Ok(self.add_grammar(id, grammar))
    }

    pub fn grammar(&self, id: &str) -> Option<&Grammar> {
        self.grammars.get(id)
    }

    /// Ids of all loaded grammars, sorted
    pub fn grammar_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Synthesize text from a published entry point with a fixed seed.
    pub fn synthesize(&self, grammar_id: &str, entry: &str, seed: u64) -> Result<String, SynthError> {
        let synthesis = self.synthesize_with(grammar_id, entry, SeededRandom::new(seed))?;
        debug!(
            grammar = grammar_id,
            entry,
            seed,
            len = synthesis.text.len(),
            "synthesized"
        );
        Ok(synthesis.text)
    }

    /// Synthesize from a published entry point using the given random source.
    pub fn synthesize_with<R: RandomSource>(
        &self,
        grammar_id: &str,
        entry: &str,
        rng: R,
    ) -> Result<Synthesis, SynthError> {
        let grammar = self
            .grammars
            .get(grammar_id)
            .ok_or_else(|| SynthError::UnknownGrammar(grammar_id.to_string()))?;

        if !grammar.is_entry_point(entry) {
            return Err(ExpansionError::UnknownEntryPoint(entry.to_string()).into());
        }

        let fragments = Expander::with_config(grammar, &self.registry, self.config).expand(entry, rng)?;
        Ok(Synthesis::from_fragments(fragments))
    }
}
