/// Concatenate fragments in emission order. Nothing is inserted, trimmed or
/// collapsed: the grammar's literals carry all spacing.
pub fn assemble<S: AsRef<str>>(fragments: &[S]) -> String {
    let len = fragments.iter().map(|f| f.as_ref().len()).sum();
    let mut text = String::with_capacity(len);
    for fragment in fragments {
        text.push_str(fragment.as_ref());
    }
    text
}

/// The result of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// The assembled text
    pub text: String,
    /// The fragments that make up `text`, in emission order
    pub fragments: Vec<String>,
}

impl Synthesis {
    pub fn from_fragments(fragments: Vec<String>) -> Self {
        Synthesis {
            text: assemble(&fragments),
            fragments,
        }
    }
}

impl std::fmt::Display for Synthesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
