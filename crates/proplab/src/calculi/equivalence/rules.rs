use std::convert::TryFrom;
use std::fmt;

use lazy_static::lazy_static;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::logic::{LogicNode, SynEq};
use crate::parse::parse_prop_formula;

use super::{EquivErr, EquivResult};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum EquivRule {
    DoubleNegation,
    DeMorgan,
    Commutative,
    Associative,
    Distributive,
    Idempotent,
    ExcludedMiddle,
    NonContradiction,
    Identity,
    Domination,
    ImplicationContrapositive,
    ImplicationDisjunction,
}

impl EquivRule {
    pub const ALL: [EquivRule; 12] = [
        EquivRule::DoubleNegation,
        EquivRule::DeMorgan,
        EquivRule::Commutative,
        EquivRule::Associative,
        EquivRule::Distributive,
        EquivRule::Idempotent,
        EquivRule::ExcludedMiddle,
        EquivRule::NonContradiction,
        EquivRule::Identity,
        EquivRule::Domination,
        EquivRule::ImplicationContrapositive,
        EquivRule::ImplicationDisjunction,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            EquivRule::DoubleNegation => "double_negation",
            EquivRule::DeMorgan => "de_morgan",
            EquivRule::Commutative => "commutative",
            EquivRule::Associative => "associative",
            EquivRule::Distributive => "distributive",
            EquivRule::Idempotent => "idempotent",
            EquivRule::ExcludedMiddle => "excluded_middle",
            EquivRule::NonContradiction => "non_contradiction",
            EquivRule::Identity => "identity",
            EquivRule::Domination => "domination",
            EquivRule::ImplicationContrapositive => "implication_contrapositive",
            EquivRule::ImplicationDisjunction => "implication_disjunction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquivRule::DoubleNegation => "Double Negation",
            EquivRule::DeMorgan => "De Morgan's Law",
            EquivRule::Commutative => "Commutative Law",
            EquivRule::Associative => "Associative Law",
            EquivRule::Distributive => "Distributive Law",
            EquivRule::Idempotent => "Idempotent Law",
            EquivRule::ExcludedMiddle => "Law of Excluded Middle",
            EquivRule::NonContradiction => "Law of Non-Contradiction",
            EquivRule::Identity => "Identity Law",
            EquivRule::Domination => "Domination Law",
            EquivRule::ImplicationContrapositive => "Implication and Contrapositive",
            EquivRule::ImplicationDisjunction => "Implication as Disjunction",
        }
    }

    pub fn from_label(label: &str) -> Option<EquivRule> {
        EquivRule::ALL.iter().find(|r| r.label() == label).copied()
    }

    /// The schemata making up this rule. In a schema the variables `A`, `B`
    /// and `C` stand for arbitrary subformulas.
    pub fn laws(&self) -> &'static [Law] {
        lazy_static! {
            static ref LAWS: Vec<Vec<Law>> =
                EquivRule::ALL.iter().map(EquivRule::build_laws).collect();
        }

        &LAWS[*self as usize]
    }

    fn build_laws(&self) -> Vec<Law> {
        let (a, b, c) = (LogicNode::var('A'), LogicNode::var('B'), LogicNode::var('C'));
        let (verum, falsum) = (LogicNode::lit(true), LogicNode::lit(false));

        match self {
            EquivRule::DoubleNegation => vec![Law::new(a.clone().negate().negate(), a)],
            EquivRule::DeMorgan => vec![
                Law::new(
                    a.clone().and(b.clone()).negate(),
                    a.clone().negate().or(b.clone().negate()),
                ),
                Law::new(a.clone().or(b.clone()).negate(), a.negate().and(b.negate())),
            ],
            EquivRule::Commutative => vec![
                Law::new(a.clone().and(b.clone()), b.clone().and(a.clone())),
                Law::new(a.clone().or(b.clone()), b.or(a)),
            ],
            EquivRule::Associative => vec![
                Law::new(
                    a.clone().and(b.clone()).and(c.clone()),
                    a.clone().and(b.clone().and(c.clone())),
                ),
                Law::new(a.clone().or(b.clone()).or(c.clone()), a.or(b.or(c))),
            ],
            EquivRule::Distributive => vec![
                Law::new(
                    a.clone().and(b.clone().or(c.clone())),
                    a.clone().and(b.clone()).or(a.clone().and(c.clone())),
                ),
                Law::new(
                    a.clone().or(b.clone().and(c.clone())),
                    a.clone().or(b).and(a.or(c)),
                ),
            ],
            EquivRule::Idempotent => vec![
                Law::new(a.clone().and(a.clone()), a.clone()),
                Law::new(a.clone().or(a.clone()), a),
            ],
            EquivRule::ExcludedMiddle => vec![
                Law::new(a.clone().or(a.clone().negate()), verum.clone()),
                Law::new(a.clone().negate().or(a), verum),
            ],
            EquivRule::NonContradiction => vec![
                Law::new(a.clone().and(a.clone().negate()), falsum.clone()),
                Law::new(a.clone().negate().and(a), falsum),
            ],
            EquivRule::Identity => vec![
                Law::new(a.clone().and(verum.clone()), a.clone()),
                Law::new(verum.and(a.clone()), a.clone()),
                Law::new(a.clone().or(falsum.clone()), a.clone()),
                Law::new(falsum.or(a.clone()), a),
            ],
            EquivRule::Domination => vec![
                Law::new(a.clone().and(falsum.clone()), falsum.clone()),
                Law::new(falsum.clone().and(a.clone()), falsum),
                Law::new(a.clone().or(verum.clone()), verum.clone()),
                Law::new(verum.clone().or(a), verum),
            ],
            EquivRule::ImplicationContrapositive => vec![Law::new(
                a.clone().implies(b.clone()),
                b.negate().implies(a.negate()),
            )],
            EquivRule::ImplicationDisjunction => vec![Law::new(
                a.clone().implies(b.clone()),
                a.negate().or(b),
            )],
        }
    }

    /// Whether `to` is obtained from `from` by one application of this rule,
    /// read in either direction, at the top of the formula.
    pub fn check(&self, from: &LogicNode, to: &LogicNode) -> bool {
        let res = self
            .laws()
            .iter()
            .any(|law| law.matches(from, to) || law.matches(to, from));
        trace!("{}: {} ⇝ {} = {}", self, from, to, res);
        res
    }
}

impl fmt::Display for EquivRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl<'a> TryFrom<&'a str> for EquivRule {
    type Error = EquivErr;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        EquivRule::ALL
            .iter()
            .find(|r| r.to_str() == s)
            .copied()
            .ok_or_else(|| EquivErr::UnknownRule(s.to_string()))
    }
}

impl TryFrom<String> for EquivRule {
    type Error = EquivErr;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        EquivRule::try_from(s.as_str())
    }
}

impl Serialize for EquivRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_str())
    }
}

/// A rule entry as listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub value: EquivRule,
    pub label: &'static str,
    pub laws: Vec<String>,
}

impl From<EquivRule> for RuleInfo {
    fn from(rule: EquivRule) -> Self {
        RuleInfo {
            value: rule,
            label: rule.label(),
            laws: rule.laws().iter().map(Law::to_string).collect(),
        }
    }
}

pub fn rule_catalogue() -> Vec<RuleInfo> {
    EquivRule::ALL.iter().map(|&r| r.into()).collect()
}

/// Parses both formulas and checks the rule between them. A rule that does
/// not apply is `Ok(false)`; only unparsable input and unknown rule names
/// are errors.
pub fn check_rule(from: &str, to: &str, rule: &str) -> EquivResult<bool> {
    let from = parse_prop_formula(from)?;
    let to = parse_prop_formula(to)?;
    let rule = EquivRule::try_from(rule)?;
    Ok(rule.check(&from, &to))
}

/// An equivalence schema `lhs ≡ rhs`.
#[derive(Debug, Clone)]
pub struct Law {
    pub lhs: LogicNode,
    pub rhs: LogicNode,
}

impl Law {
    fn new(lhs: LogicNode, rhs: LogicNode) -> Self {
        Law { lhs, rhs }
    }

    /// Matches `lhs` against `x` and `rhs` against `y` under one set of
    /// bindings.
    pub fn matches(&self, x: &LogicNode, y: &LogicNode) -> bool {
        let mut b = Bindings::default();
        b.bind(&self.lhs, x) && b.bind(&self.rhs, y)
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ≡ {}", self.lhs, self.rhs)
    }
}

/// Subformulas matched by the schema variables so far.
#[derive(Default)]
struct Bindings<'n>([Option<&'n LogicNode>; 26]);

impl<'n> Bindings<'n> {
    fn slot(&mut self, var: char) -> Option<&mut Option<&'n LogicNode>> {
        let idx = (var as u32).checked_sub('A' as u32)? as usize;
        self.0.get_mut(idx)
    }

    fn bind(&mut self, pattern: &LogicNode, node: &'n LogicNode) -> bool {
        match (pattern, node) {
            (LogicNode::Var(v), _) => match self.slot(*v) {
                Some(Some(bound)) => bound.syn_eq(node),
                Some(slot) => {
                    *slot = Some(node);
                    true
                }
                None => false,
            },
            (LogicNode::Lit(p), LogicNode::Lit(n)) => p == n,
            (LogicNode::Not(p), LogicNode::Not(n)) => self.bind(p, n),
            _ => match (pattern.binary_op(), node.binary_op()) {
                (Some((p_op, pl, pr)), Some((n_op, nl, nr))) if p_op == n_op => {
                    self.bind(pl, nl) && self.bind(pr, nr)
                }
                _ => false,
            },
        }
    }
}
