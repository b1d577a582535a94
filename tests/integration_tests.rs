use grammar_synth::{
    ExpansionConfig, ExpansionError, Grammar, GrammarError, RandomSource, SeededRandom, SynthError,
    Synthesizer, TerminalRegistry, expand,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLES: u64 = 20_000;

fn synthesizer_with(id: &str, json: &str) -> Synthesizer {
    let mut synthesizer = Synthesizer::new(TerminalRegistry::with_defaults());
    synthesizer.load_json(id, json).unwrap();
    synthesizer
}

fn count_outputs(synthesizer: &Synthesizer, id: &str, expected: &[&str]) -> Vec<u64> {
    let mut counts = vec![0; expected.len()];
    for seed in 0..SAMPLES {
        let text = synthesizer.synthesize(id, "start", seed).unwrap();
        let index = expected
            .iter()
            .position(|e| *e == text)
            .unwrap_or_else(|| panic!("unexpected output {:?}", text));
        counts[index] += 1;
    }
    counts
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "start": { "seq": ["Hello ", { "ref": "subject" }] },
            "subject": { "alt": ["world", "Rust"] }
        }"#,
    )
    .unwrap();

    let grammar = Grammar::from_file(file.path(), TerminalRegistry::new().names()).unwrap();
    assert!(grammar.has_rule("subject"));

    let mut synthesizer = Synthesizer::new(TerminalRegistry::new());
    synthesizer.load_file("hello", file.path()).unwrap();
    let result = synthesizer.synthesize("hello", "start", 5).unwrap();
    assert!(result == "Hello world" || result == "Hello Rust");
}

#[test]
fn test_missing_file() {
    let err = Grammar::from_file("does/not/exist.json", TerminalRegistry::new().names()).unwrap_err();
    assert!(matches!(err, GrammarError::Io(_)));
}

#[test]
fn test_literal_exactness() {
    let synthesizer = synthesizer_with("lit", r#"{ "start": { "seq": ["a", { "ref": "b" }] }, "b": "c" }"#);
    for seed in 0..100 {
        assert_eq!(synthesizer.synthesize("lit", "start", seed).unwrap(), "ac");
    }
}

#[test]
fn test_whitespace_is_preserved() {
    let synthesizer = synthesizer_with("ws", r#"{ "start": { "seq": ["  int", "\t", " x ;", "\n"] } }"#);
    assert_eq!(synthesizer.synthesize("ws", "start", 0).unwrap(), "  int\t x ;\n");
}

#[test]
fn test_determinism_across_instances() {
    let a = Synthesizer::with_builtin().unwrap();
    let b = Synthesizer::with_builtin().unwrap();
    for seed in [0, 7, 1234, 987_654_321] {
        assert_eq!(
            a.synthesize("c", "start", seed).unwrap(),
            b.synthesize("c", "start", seed).unwrap()
        );
    }
}

#[test]
fn test_seeds_vary_output() {
    let synthesizer = Synthesizer::with_builtin().unwrap();
    let outputs: std::collections::HashSet<String> = (0..50)
        .map(|seed| synthesizer.synthesize("c", "start_stmt", seed).unwrap())
        .collect();
    assert!(outputs.len() > 10, "only {} distinct statements", outputs.len());
}

#[test]
fn test_equal_weights() {
    let synthesizer = synthesizer_with("eq", r#"{ "start": { "alt": ["x", "y"] } }"#);
    let counts = count_outputs(&synthesizer, "eq", &["x", "y"]);
    let ratio = counts[0] as f64 / counts[1] as f64;
    assert!((0.9..1.1).contains(&ratio), "x:y = {:?}", counts);
}

#[test]
fn test_one_to_three_weights() {
    let synthesizer = synthesizer_with(
        "w",
        r#"{ "start": { "alt": [{ "weight": 1, "rule": "x" }, { "weight": 3, "rule": "y" }] } }"#,
    );
    let counts = count_outputs(&synthesizer, "w", &["x", "y"]);
    let ratio = counts[1] as f64 / counts[0] as f64;
    assert!((2.7..3.3).contains(&ratio), "x:y = {:?}", counts);
}

#[test]
fn test_optional_inclusion_rate() {
    let synthesizer = synthesizer_with("opt", r#"{ "start": { "seq": ["a", { "opt": "b", "f": 0.5 }] } }"#);
    let counts = count_outputs(&synthesizer, "opt", &["a", "ab"]);
    let rate = counts[1] as f64 / SAMPLES as f64;
    assert!((0.47..0.53).contains(&rate), "inclusion rate {}", rate);
}

#[test]
fn test_optional_default_probability() {
    let synthesizer = synthesizer_with("opt", r#"{ "start": { "seq": ["a", { "opt": "b" }] } }"#);
    let counts = count_outputs(&synthesizer, "opt", &["a", "ab"]);
    let rate = counts[1] as f64 / SAMPLES as f64;
    assert!((0.47..0.53).contains(&rate), "inclusion rate {}", rate);
}

#[test]
fn test_unbounded_recursion_terminates() {
    let json = r#"{ "start": { "alt": [{ "ref": "start" }, { "seq": ["(", { "ref": "start" }, ")"] }] } }"#;
    let synthesizer = synthesizer_with("loop", json).with_config(ExpansionConfig::new(32).unwrap());

    for seed in 0..10 {
        match synthesizer.synthesize("loop", "start", seed) {
            Err(SynthError::Expansion(ExpansionError::RecursionLimitExceeded { limit, chain })) => {
                assert_eq!(limit, 32);
                assert_eq!(chain.len(), 33);
            }
            other => panic!("Expected RecursionLimitExceeded, got {:?}", other),
        }
    }
}

#[test]
fn test_recursion_error_names_chain() {
    let json = r#"{
        "start": { "ref": "stmt" },
        "stmt": { "seq": ["{ ", { "ref": "block" }, " }"] },
        "block": { "ref": "stmt" }
    }"#;
    let synthesizer = synthesizer_with("cyc", json).with_config(ExpansionConfig::new(4).unwrap());
    let err = synthesizer.synthesize("cyc", "start", 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Recursion limit of 4 exceeded: start -> stmt -> block -> stmt -> block"
    );
}

#[test]
fn test_unknown_reference_fails_load() {
    let mut synthesizer = Synthesizer::new(TerminalRegistry::with_defaults());
    let err = synthesizer
        .load_json("bad", r#"{ "start": { "seq": ["a", { "ref": "nope" }] } }"#)
        .unwrap_err();
    match err {
        SynthError::Grammar(GrammarError::UnknownRuleReference { name, .. }) => assert_eq!(name, "nope"),
        other => panic!("Expected UnknownRuleReference, got {:?}", other),
    }
    assert!(synthesizer.grammar("bad").is_none());
}

#[test]
fn test_grammar_rule_takes_precedence() {
    let mut registry = TerminalRegistry::new();
    registry.register("x", |_: &mut dyn RandomSource| "generated".to_string());
    let mut synthesizer = Synthesizer::new(registry);
    synthesizer
        .load_json("p", r#"{ "start": { "ref": "x" }, "x": "grammar" }"#)
        .unwrap();

    for seed in 0..50 {
        assert_eq!(synthesizer.synthesize("p", "start", seed).unwrap(), "grammar");
    }
}

#[test]
fn test_registry_supplies_external_names() {
    let synthesizer = Synthesizer::with_builtin().unwrap();
    let grammar = synthesizer.grammar("c").unwrap();
    assert!(!grammar.has_rule("generic_variable_name"));

    let fragments = expand(
        grammar,
        "start_stmt",
        synthesizer.registry(),
        SeededRandom::new(11),
        ExpansionConfig::default().max_depth(),
    )
    .unwrap();
    assert!(!fragments.is_empty());
    assert_eq!(grammar_synth::assemble(&fragments), synthesizer.synthesize("c", "start_stmt", 11).unwrap());
}

#[test]
fn test_shared_across_threads() {
    let synthesizer = std::sync::Arc::new(Synthesizer::with_builtin().unwrap());
    let expected: Vec<String> = (0..8)
        .map(|seed| synthesizer.synthesize("c", "start", seed).unwrap())
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|seed| {
            let synthesizer = synthesizer.clone();
            std::thread::spawn(move || synthesizer.synthesize("c", "start", seed).unwrap())
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), expected[seed]);
    }
}
