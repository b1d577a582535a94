//! Exact outputs for fixed grammars, entry points and seeds. Any change to
//! the random stream, the draw order or the bundled grammar shows up here.

use grammar_synth::{RandomSource, SeededRandom, Synthesizer, TerminalRegistry, builtin};
use pretty_assertions::assert_eq;

const GREETING: &str = r#"{
    "start": { "seq": ["Hello, ", { "ref": "subject" }, { "opt": "!", "f": 0.5 }] },
    "subject": { "alt": ["world", { "weight": 3, "rule": "Rust" }] }
}"#;

fn check(synthesizer: &Synthesizer, id: &str, entry: &str, expected: &[(u64, &str)]) {
    for (seed, text) in expected {
        assert_eq!(
            synthesizer.synthesize(id, entry, *seed).unwrap(),
            *text,
            "{} {} seed {}",
            id,
            entry,
            seed
        );
    }
}

#[test]
fn test_seeded_stream() {
    let mut rng = SeededRandom::new(42);
    assert_eq!(rng.next_uniform(), 0.5265574090027738);
    assert_eq!(rng.next_uniform(), 0.5427252099031439);
    assert_eq!(rng.next_uniform(), 0.6364650991438949);
    assert_eq!(rng.next_uniform(), 0.4059017582307767);

    let mut rng = SeededRandom::new(0);
    assert_eq!(rng.next_uniform(), 0.7311134158637046);
    assert_eq!(rng.next_uniform(), 0.7734601843532382);
    assert_eq!(rng.next_uniform(), 0.025844634233355035);
}

#[test]
fn test_two_way_choice_sequence() {
    let mut synthesizer = Synthesizer::new(TerminalRegistry::new());
    synthesizer.load_json("xy", r#"{ "start": { "alt": ["x", "y"] } }"#).unwrap();
    let picks: String = (0..16)
        .map(|seed| synthesizer.synthesize("xy", "start", seed).unwrap())
        .collect();
    assert_eq!(picks, "yyxxyxxxxyxxxyyy");
}

#[test]
fn test_greeting_grammar() {
    let mut synthesizer = Synthesizer::new(TerminalRegistry::new());
    synthesizer.load_json("greeting", GREETING).unwrap();
    check(
        &synthesizer,
        "greeting",
        "start",
        &[
            (0, "Hello, Rust"),
            (1, "Hello, Rust"),
            (2, "Hello, Rust!"),
            (3, "Hello, world!"),
            (4, "Hello, Rust"),
            (5, "Hello, Rust!"),
        ],
    );
}

#[test]
fn test_c_function() {
    let synthesizer = Synthesizer::with_builtin().unwrap();
    check(
        &synthesizer,
        builtin::C_LIKE,
        "start",
        &[
            (0, "short fflush(short* firstValue[], long &file) { build(allPath++); }"),
            (1, "void std::fflush(void* p_file[]) { pushvalue((p_list--) <= ptr_data); }"),
            (2, "int** std::fflush(void &text[]) { clearMap((*max_path)-- ? result++ : block--); }"),
            (
                42,
                "long apply_result(void** new_file[]) { short line = (*token)->len ? (*block)-- : (*size)->len; }",
            ),
        ],
    );
}

#[test]
fn test_c_prototype() {
    let synthesizer = Synthesizer::with_builtin().unwrap();
    check(
        &synthesizer,
        builtin::C_LIKE,
        "start_fproto",
        &[
            (0, "short fflush(short* firstValue[], long &file);"),
            (1, "void std::fflush(void* p_file[]);"),
            (3, "char** std::malloc(int &value, short text[], void text);"),
            (42, "long apply_result(void** new_file[]);"),
        ],
    );
}

#[test]
fn test_c_statement() {
    let synthesizer = Synthesizer::with_builtin().unwrap();
    check(
        &synthesizer,
        builtin::C_LIKE,
        "start_stmt",
        &[
            (
                0,
                "if ((*file)->data ? (*list)->file : table--) { write((*queue)-- ? (*cache)++ : (*lastWidth)++); }",
            ),
            (1, "return (*ptr_node)++ ? (*first_text)++ : page++;"),
            (2, "std::memcpy((*lastPath)--);"),
            (3, "int** p_value = (nextSize->text) * page;"),
            (7, "int* firstresult = ((*ptr_offset)++) >> p_lastToken;"),
        ],
    );
}
