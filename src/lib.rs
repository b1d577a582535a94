//! Grammar-Synth is a probabilistic grammar interpreter.
//!
//! A grammar maps rule names to rules built from literals, sequences,
//! weighted alternations, optionals and references. Expanding an entry rule
//! with a seeded random source produces a piece of text, such as a
//! realistic-looking code snippet for typing practice. The same grammar,
//! entry and seed always produce the same text.
//!
//! # Example
//!
//! ```rust
//! use grammar_synth::{Synthesizer, TerminalRegistry};
//!
//! let mut synthesizer = Synthesizer::new(TerminalRegistry::new());
//! synthesizer
//!     .load_json(
//!         "greeting",
//!         r#"{
//!             "start": { "seq": ["Hello, ", { "ref": "subject" }, "!"] },
//!             "subject": { "alt": ["world", { "weight": 3, "rule": "Rust" }] }
//!         }"#,
//!     )
//!     .unwrap();
//!
//! let text = synthesizer.synthesize("greeting", "start", 7).unwrap();
//! assert!(text == "Hello, world!" || text == "Hello, Rust!");
//! assert_eq!(text, synthesizer.synthesize("greeting", "start", 7).unwrap());
//! ```

pub mod builtin;
pub mod error;
pub mod expander;
pub mod grammar;
pub mod names;
pub mod output;
pub mod random;
pub mod registry;
pub mod rule;
pub mod synthesizer;

pub use error::{ExpansionError, GrammarError, Result, SynthError};
pub use expander::{expand, ExpansionConfig, Expander, MAX_DEPTH_LIMIT};
pub use grammar::{Grammar, GrammarBuilder};
pub use output::{assemble, Synthesis};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use registry::{TerminalGenerator, TerminalRegistry};
pub use rule::{Branch, Definitions, Rule, RuleDef};
pub use synthesizer::Synthesizer;
