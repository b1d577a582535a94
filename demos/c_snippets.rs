use grammar_synth::{
    Grammar, GrammarBuilder, RandomSource, Rule, Synthesizer, TerminalRegistry, builtin,
};
use std::error::Error;

/// Prints a few snippets from the bundled C-like grammar and from a small
/// grammar built in code.
fn main() -> Result<(), Box<dyn Error>> {
    // Example 1: the bundled C-like grammar
    let synthesizer = Synthesizer::with_builtin()?;
    for entry in ["start", "start_fproto", "start_stmt"] {
        println!("{}:", entry);
        for seed in 1..=3 {
            println!("  {}", synthesizer.synthesize(builtin::C_LIKE, entry, seed)?);
        }
    }

    // Example 2: a grammar built in code, with a custom terminal generator
    let mut registry = TerminalRegistry::with_defaults();
    registry.register("number", |rng: &mut dyn RandomSource| {
        format!("{}", rng.next_index(100))
    });

    let grammar: Grammar = GrammarBuilder::new()
        .rule(
            "start",
            Rule::seq([
                Rule::reference("generic_variable_name"),
                " = ".into(),
                Rule::reference("expr"),
                ";".into(),
            ]),
        )
        .rule(
            "expr",
            Rule::weighted_alt([
                (3.0, Rule::reference("number")),
                (
                    1.0,
                    Rule::seq(["(".into(), Rule::reference("expr"), " + ".into(), Rule::reference("expr"), ")".into()]),
                ),
            ]),
        )
        .external("generic_variable_name")
        .external("number")
        .build()?;

    let mut synthesizer = Synthesizer::new(registry);
    synthesizer.add_grammar("assign", grammar);

    println!("\nassignments:");
    for seed in 1..=5 {
        match synthesizer.synthesize("assign", "start", seed) {
            Ok(text) => println!("  {}", text),
            Err(err) => println!("  ({})", err),
        }
    }

    Ok(())
}
