use tracing::warn;

use crate::error::ExpansionError;
use crate::grammar::Grammar;
use crate::random::RandomSource;
use crate::registry::TerminalRegistry;
use crate::rule::{Branch, Rule};

/// Default bound on nested rule references.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Largest accepted bound on nested rule references.
pub const MAX_DEPTH_LIMIT: usize = 100_000;

/// Configuration options for expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionConfig {
    /// Maximum number of nested rule references, counting the entry rule
    max_depth: usize,
}

impl ExpansionConfig {
    /// Fails unless `max_depth` lies in `1..=MAX_DEPTH_LIMIT`.
    pub fn new(max_depth: usize) -> Result<Self, ExpansionError> {
        if max_depth == 0 || max_depth > MAX_DEPTH_LIMIT {
            return Err(ExpansionError::InvalidDepthLimit {
                requested: max_depth,
                max: MAX_DEPTH_LIMIT,
            });
        }
        Ok(ExpansionConfig { max_depth })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Pending work, popped in depth-first, left-to-right order.
#[derive(Debug, Clone, Copy)]
enum Step<'g> {
    Expand(&'g Rule),
    /// Closes the innermost rule reference
    Leave,
}

/// Per-call expansion state. Created when an expansion starts and dropped
/// when it returns.
pub struct ExpansionContext<'g, R> {
    rng: R,
    /// Rule references currently being expanded, outermost first
    chain: Vec<&'g str>,
    pending: Vec<Step<'g>>,
    fragments: Vec<String>,
}

impl<'g, R: RandomSource> ExpansionContext<'g, R> {
    pub fn new(rng: R) -> Self {
        ExpansionContext {
            rng,
            chain: Vec::new(),
            pending: Vec::new(),
            fragments: Vec::new(),
        }
    }

    /// Current reference depth
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    fn chain_with(&self, name: &str) -> Vec<String> {
        self.chain
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(name.to_string()))
            .collect()
    }

    fn emit(&mut self, text: String) {
        self.fragments.push(text);
    }

    fn into_fragments(self) -> Vec<String> {
        self.fragments
    }
}

/// Interpreter over a loaded grammar.
///
/// Expansion runs on an explicit work stack, so the reference depth is
/// bounded by `max_depth` rather than by the thread's stack size.
/// Holds only shared references, so one expander can serve any number of
/// calls; each call brings its own random source.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'g> {
    grammar: &'g Grammar,
    registry: &'g TerminalRegistry,
    config: ExpansionConfig,
}

impl<'g> Expander<'g> {
    pub fn new(grammar: &'g Grammar, registry: &'g TerminalRegistry) -> Self {
        Self::with_config(grammar, registry, ExpansionConfig::default())
    }

    pub fn with_config(
        grammar: &'g Grammar,
        registry: &'g TerminalRegistry,
        config: ExpansionConfig,
    ) -> Self {
        Expander {
            grammar,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Expand the rule named `start` into a list of fragments.
    pub fn expand<R: RandomSource>(
        &self,
        start: &str,
        rng: R,
    ) -> Result<Vec<String>, ExpansionError> {
        let Some((name, _)) = self.grammar.rules().get_key_value(start) else {
            return Err(ExpansionError::UnknownEntryPoint(start.to_string()));
        };
        let mut ctx = ExpansionContext::new(rng);
        match self.run(name, &mut ctx) {
            Ok(()) => Ok(ctx.into_fragments()),
            Err(err) => {
                warn!(start, error = %err, "expansion failed");
                Err(err)
            }
        }
    }

    fn run<R: RandomSource>(
        &self,
        start: &'g str,
        ctx: &mut ExpansionContext<'g, R>,
    ) -> Result<(), ExpansionError> {
        self.enter(start, ctx)?;
        while let Some(step) = ctx.pending.pop() {
            match step {
                Step::Leave => {
                    ctx.chain.pop();
                }
                Step::Expand(rule) => self.expand_rule(rule, ctx)?,
            }
        }
        Ok(())
    }

    fn expand_rule<R: RandomSource>(
        &self,
        rule: &'g Rule,
        ctx: &mut ExpansionContext<'g, R>,
    ) -> Result<(), ExpansionError> {
        match rule {
            Rule::Literal(text) => {
                ctx.emit(text.clone());
                Ok(())
            }
            Rule::Sequence(children) => {
                ctx.pending.extend(children.iter().rev().map(Step::Expand));
                Ok(())
            }
            Rule::Alternation(branches) => {
                let branch = choose_branch(branches, ctx.rng.next_uniform());
                ctx.pending.push(Step::Expand(&branch.rule));
                Ok(())
            }
            Rule::Optional { inner, probability } => {
                if ctx.rng.next_uniform() < *probability {
                    ctx.pending.push(Step::Expand(inner.as_ref()));
                }
                Ok(())
            }
            Rule::Reference(name) => self.enter(name, ctx),
        }
    }

    /// Open a reference: schedule a grammar rule, or emit a generated terminal.
    fn enter<R: RandomSource>(
        &self,
        name: &'g str,
        ctx: &mut ExpansionContext<'g, R>,
    ) -> Result<(), ExpansionError> {
        if let Some(rule) = self.grammar.resolve(name) {
            if ctx.depth() >= self.config.max_depth {
                return Err(ExpansionError::RecursionLimitExceeded {
                    limit: self.config.max_depth,
                    chain: ctx.chain_with(name),
                });
            }
            ctx.chain.push(name);
            ctx.pending.push(Step::Leave);
            ctx.pending.push(Step::Expand(rule));
            return Ok(());
        }

        match self.registry.lookup(name) {
            Some(generator) => {
                let text = generator.generate(&mut ctx.rng);
                ctx.emit(text);
                Ok(())
            }
            None => Err(ExpansionError::UnresolvedTerminal {
                name: name.to_string(),
                chain: ctx.chain_with(name),
            }),
        }
    }
}

/// Pick the first branch whose cumulative weight exceeds `draw * total`.
fn choose_branch(branches: &[Branch], draw: f64) -> &Branch {
    let total: f64 = branches.iter().map(|b| b.weight).sum();
    let target = draw * total;
    let mut cumulative = 0.0;
    for branch in branches {
        cumulative += branch.weight;
        if cumulative > target {
            return branch;
        }
    }
    // Rounding can leave the target at the very top of the range
    &branches[branches.len() - 1]
}

/// Expand `start` against `grammar`, consulting `registry` for terminal names.
pub fn expand<R: RandomSource>(
    grammar: &Grammar,
    start: &str,
    registry: &TerminalRegistry,
    rng: R,
    max_depth: usize,
) -> Result<Vec<String>, ExpansionError> {
    let config = ExpansionConfig::new(max_depth)?;
    Expander::with_config(grammar, registry, config).expand(start, rng)
}
