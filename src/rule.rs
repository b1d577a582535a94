use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default inclusion probability for an optional rule.
pub const DEFAULT_OPTIONAL_PROBABILITY: f64 = 0.5;

/// Default weight of an alternation branch.
pub const DEFAULT_BRANCH_WEIGHT: f64 = 1.0;

/// A node in the grammar graph.
///
/// References are resolved by name at expansion time, so cyclic grammars
/// need no cyclic data.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Text emitted verbatim
    Literal(String),
    /// Children expanded in order, with nothing inserted between them
    Sequence(Vec<Rule>),
    /// Exactly one branch expanded, chosen by weight
    Alternation(Vec<Branch>),
    /// Inner rule expanded with the given probability
    Optional { inner: Box<Rule>, probability: f64 },
    /// Another rule or a terminal generator, by name
    Reference(String),
}

/// A weighted alternation branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub weight: f64,
    pub rule: Rule,
}

impl Branch {
    pub fn new(rule: Rule) -> Self {
        Branch {
            weight: DEFAULT_BRANCH_WEIGHT,
            rule,
        }
    }

    pub fn weighted(weight: f64, rule: Rule) -> Self {
        Branch { weight, rule }
    }
}

impl Rule {
    pub fn literal(text: impl Into<String>) -> Self {
        Rule::Literal(text.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Rule::Reference(name.into())
    }

    pub fn seq(children: impl IntoIterator<Item = Rule>) -> Self {
        Rule::Sequence(children.into_iter().collect())
    }

    /// An alternation with equally weighted branches.
    pub fn alt(branches: impl IntoIterator<Item = Rule>) -> Self {
        Rule::Alternation(branches.into_iter().map(Branch::new).collect())
    }

    pub fn weighted_alt(branches: impl IntoIterator<Item = (f64, Rule)>) -> Self {
        Rule::Alternation(
            branches
                .into_iter()
                .map(|(weight, rule)| Branch::weighted(weight, rule))
                .collect(),
        )
    }

    pub fn opt(inner: Rule) -> Self {
        Rule::opt_with(inner, DEFAULT_OPTIONAL_PROBABILITY)
    }

    pub fn opt_with(inner: Rule, probability: f64) -> Self {
        Rule::Optional {
            inner: Box::new(inner),
            probability,
        }
    }

    /// Visit every reference name in this rule, depth first.
    pub fn for_each_reference<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Rule::Literal(_) => {}
            Rule::Sequence(children) => {
                for child in children {
                    child.for_each_reference(f);
                }
            }
            Rule::Alternation(branches) => {
                for branch in branches {
                    branch.rule.for_each_reference(f);
                }
            }
            Rule::Optional { inner, .. } => inner.for_each_reference(f),
            Rule::Reference(name) => f(name),
        }
    }
}

/// Declarative form of a rule as written in grammar files.
///
/// A plain string is a literal; objects carry one of the keys `ref`, `seq`,
/// `alt` or `opt`. Any other key is a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum RuleDef {
    Literal(String),
    Ref {
        #[serde(rename = "ref")]
        name: String,
    },
    Seq {
        seq: Vec<RuleDef>,
    },
    Alt {
        alt: Vec<BranchDef>,
    },
    Opt {
        opt: Box<RuleDef>,
        #[serde(default = "default_probability")]
        f: f64,
    },
}

fn default_probability() -> f64 {
    DEFAULT_OPTIONAL_PROBABILITY
}

/// An alternation branch as written in grammar files: either any rule node
/// (weight 1.0) or `{ "weight": w, "rule": <rule> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum BranchDef {
    Weighted { weight: f64, rule: RuleDef },
    Plain(RuleDef),
}

/// Raw grammar definitions: rule name to declarative rule node.
pub type Definitions = HashMap<String, RuleDef>;

impl From<RuleDef> for Rule {
    fn from(def: RuleDef) -> Self {
        match def {
            RuleDef::Literal(text) => Rule::Literal(text),
            RuleDef::Ref { name } => Rule::Reference(name),
            RuleDef::Seq { seq } => Rule::Sequence(seq.into_iter().map(Rule::from).collect()),
            RuleDef::Alt { alt } => Rule::Alternation(alt.into_iter().map(Branch::from).collect()),
            RuleDef::Opt { opt, f } => Rule::Optional {
                inner: Box::new(Rule::from(*opt)),
                probability: f,
            },
        }
    }
}

impl From<BranchDef> for Branch {
    fn from(def: BranchDef) -> Self {
        match def {
            BranchDef::Weighted { weight, rule } => Branch::weighted(weight, rule.into()),
            BranchDef::Plain(rule) => Branch::new(rule.into()),
        }
    }
}

impl From<&str> for Rule {
    fn from(text: &str) -> Self {
        Rule::Literal(text.to_string())
    }
}
