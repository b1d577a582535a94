use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::names::{generic_function_name, generic_variable_name};
use crate::random::RandomSource;

/// Produces the text for a reference name the grammar does not define.
pub trait TerminalGenerator: Send + Sync {
    /// Produce a single fragment, drawing from `rng` as needed.
    fn generate(&self, rng: &mut dyn RandomSource) -> String;
}

impl<F> TerminalGenerator for F
where
    F: Fn(&mut dyn RandomSource) -> String + Send + Sync,
{
    fn generate(&self, rng: &mut dyn RandomSource) -> String {
        self(rng)
    }
}

/// Lookup table from terminal names to generators.
///
/// The registry is only consulted for names the grammar itself does not
/// define, so grammar rules always shadow registered generators.
#[derive(Clone, Default)]
pub struct TerminalRegistry {
    generators: HashMap<String, Arc<dyn TerminalGenerator>>,
}

impl TerminalRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TerminalRegistry {
            generators: HashMap::new(),
        }
    }

    /// Create a registry with the built-in identifier generators
    pub fn with_defaults() -> Self {
        let mut registry = TerminalRegistry::new();
        registry.register_defaults();
        registry
    }

    /// Register a generator under a name, replacing any previous one
    pub fn register<G: TerminalGenerator + 'static>(&mut self, name: &str, generator: G) -> &mut Self {
        self.generators.insert(name.to_string(), Arc::new(generator));
        self
    }

    /// Get a generator by name
    pub fn lookup(&self, name: &str) -> Option<&dyn TerminalGenerator> {
        self.generators.get(name).map(|g| g.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Register the identifier generators used by the bundled grammars
    pub fn register_defaults(&mut self) -> &mut Self {
        self.register("generic_function_name", generic_function_name)
            .register("generic_variable_name", generic_variable_name)
    }
}

impl fmt::Debug for TerminalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalRegistry")
            .field("names", &self.names())
            .finish()
    }
}
