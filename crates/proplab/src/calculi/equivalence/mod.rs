//! Step-by-step equivalence proofs. Every step rewrites the previous formula
//! by one named law.

use std::convert::TryFrom;
use std::fmt;

use log::debug;
use serde::{ser::SerializeStruct, Deserialize, Serialize};

use crate::calculus::CloseMsg;
use crate::logic::{LogicNode, SynEq};
use crate::parse::normalize::display_tokens;
use crate::parse::{parse_prop_formula, ParseErr, PropParser};
use crate::tamper_protect::ProtectedState;
use crate::Calculus;

pub mod rules;

pub use rules::{check_rule, rule_catalogue, EquivRule, Law, RuleInfo};

pub const INITIAL_STEP: &str = "Initial Formula";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivErr {
    Parse(ParseErr),
    UnknownRule(String),
    RuleMismatch(EquivRule, String, String),
    NoInitialFormula,
    NothingToUndo,
    InvalidSeal,
}

impl From<ParseErr> for EquivErr {
    fn from(e: ParseErr) -> Self {
        Self::Parse(e)
    }
}

impl fmt::Display for EquivErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquivErr::Parse(e) => fmt::Display::fmt(e, f),
            EquivErr::UnknownRule(r) => write!(f, "Unknown rule '{r}'"),
            EquivErr::RuleMismatch(rule, from, to) => write!(
                f,
                "Incorrect application of the {}: '{to}' does not follow from '{from}'",
                rule.label()
            ),
            EquivErr::NoInitialFormula => write!(f, "Please set an initial formula first"),
            EquivErr::NothingToUndo => write!(f, "There is no step to undo"),
            EquivErr::InvalidSeal => write!(f, "Invalid tamper protection seal"),
        }
    }
}

impl std::error::Error for EquivErr {}

pub type EquivResult<T> = Result<T, EquivErr>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofStep {
    pub formula: String,
    pub rule_applied: String,
}

/// The interactive proof assistant. Without an initial formula no rule can
/// be applied; afterwards every accepted rule application appends a step.
#[derive(Debug, Clone, Default)]
pub struct ProofSession {
    steps: Vec<ProofStep>,
    nodes: Vec<LogicNode>,
}

impl ProofSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn has_initial_formula(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn current(&self) -> Option<&LogicNode> {
        self.nodes.last()
    }

    /// Starts over from `formula`. On a parse error the session is left
    /// untouched.
    pub fn set_initial_formula(&mut self, formula: &str) -> EquivResult<&ProofStep> {
        let (node, display) = parse_step(formula)?;
        self.reset();
        self.push(node, display, INITIAL_STEP.to_string());
        self.last_step()
    }

    pub fn apply_rule(&mut self, rule: EquivRule, formula: &str) -> EquivResult<&ProofStep> {
        let (from, from_display) = match (self.nodes.last(), self.steps.last()) {
            (Some(n), Some(s)) => (n, &s.formula),
            _ => return Err(EquivErr::NoInitialFormula),
        };
        let (to, display) = parse_step(formula)?;

        if !rule.check(from, &to) {
            return Err(EquivErr::RuleMismatch(rule, from_display.clone(), display));
        }

        debug!("{}: {} accepted", rule, display);
        self.push(to, display, rule.label().to_string());
        self.last_step()
    }

    /// Removes the latest rule application. The initial formula stays.
    pub fn undo(&mut self) -> EquivResult<ProofStep> {
        match self.steps.len() {
            0 => Err(EquivErr::NoInitialFormula),
            1 => Err(EquivErr::NothingToUndo),
            _ => {
                self.nodes.pop();
                self.steps.pop().ok_or(EquivErr::NothingToUndo)
            }
        }
    }

    pub fn reset(&mut self) {
        self.steps.clear();
        self.nodes.clear();
    }

    fn push(&mut self, node: LogicNode, formula: String, rule_applied: String) {
        self.nodes.push(node);
        self.steps.push(ProofStep {
            formula,
            rule_applied,
        });
    }

    fn last_step(&self) -> EquivResult<&ProofStep> {
        self.steps.last().ok_or(EquivErr::NoInitialFormula)
    }

    /// Rebuilds a session from client-held steps, re-parsing every formula.
    fn from_steps(steps: Vec<ProofStep>) -> EquivResult<Self> {
        let nodes = steps
            .iter()
            .map(|s| parse_prop_formula(&s.formula))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps, nodes })
    }
}

fn parse_step(formula: &str) -> EquivResult<(LogicNode, String)> {
    let parsed = PropParser::parse(formula)?;
    let display = display_tokens(&parsed.tokens);
    Ok((parsed.root, display))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ProofParams {
    /// Formula the proof should arrive at. Defaults to `⊤`.
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ProofMove {
    #[serde(rename = "apply")]
    Apply { rule: EquivRule, formula: String },
    #[serde(rename = "undo")]
    Undo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "SealedState")]
pub struct ProofState {
    session: ProofSession,
    target: LogicNode,
}

impl ProofState {
    pub fn steps(&self) -> &[ProofStep] {
        self.session.steps()
    }

    pub fn target(&self) -> &LogicNode {
        &self.target
    }
}

impl ProtectedState for ProofState {
    fn compute_seal_info(&self) -> String {
        let steps: Vec<String> = self
            .steps()
            .iter()
            .map(|s| format!("{}:{}", s.formula, s.rule_applied))
            .collect();
        format!("equivproof|{}|[{}]", self.target, steps.join(", "))
    }
}

impl Serialize for ProofState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProofState", 3)?;
        state.serialize_field("steps", self.steps())?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("seal", &self.seal())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct SealedState {
    steps: Vec<ProofStep>,
    target: String,
    seal: String,
}

impl TryFrom<SealedState> for ProofState {
    type Error = EquivErr;

    fn try_from(raw: SealedState) -> Result<Self, Self::Error> {
        let state = ProofState {
            session: ProofSession::from_steps(raw.steps)?,
            target: parse_prop_formula(&raw.target)?,
        };
        if !state.verify_seal(&raw.seal) {
            return Err(EquivErr::InvalidSeal);
        }
        Ok(state)
    }
}

pub struct EquivProof;

impl<'f> Calculus<'f> for EquivProof {
    type Params = ProofParams;
    type State = ProofState;
    type Move = ProofMove;
    type Error = EquivErr;

    fn parse_formula(
        formula: &'f str,
        params: Option<Self::Params>,
    ) -> Result<Self::State, Self::Error> {
        let params = params.unwrap_or_default();
        let target = match params.target {
            Some(t) => parse_prop_formula(&t)?,
            None => LogicNode::lit(true),
        };

        let mut session = ProofSession::new();
        session.set_initial_formula(formula)?;

        Ok(ProofState { session, target })
    }

    /// Replays the proof and checks every step against the law it names.
    fn validate(state: Self::State) -> bool {
        let ProofSession { steps, nodes } = &state.session;
        let seeded = steps
            .first()
            .map_or(false, |s| s.rule_applied == INITIAL_STEP);

        seeded
            && steps
                .iter()
                .skip(1)
                .zip(nodes.windows(2))
                .all(|(step, pair)| {
                    EquivRule::from_label(&step.rule_applied)
                        .map_or(false, |rule| rule.check(&pair[0], &pair[1]))
                })
    }

    fn apply_move(mut state: Self::State, k_move: Self::Move) -> Result<Self::State, Self::Error> {
        match k_move {
            ProofMove::Apply { rule, formula } => {
                state.session.apply_rule(rule, &formula)?;
            }
            ProofMove::Undo => {
                state.session.undo()?;
            }
        }
        Ok(state)
    }

    fn check_close(state: Self::State) -> CloseMsg {
        let closed = state
            .session
            .current()
            .map_or(false, |n| n.syn_eq(&state.target));

        let msg = if closed {
            format!(
                "The proof is closed: {} is equivalent to {}",
                state.steps()[0].formula,
                state.target
            )
        } else {
            format!("The proof is not closed, {} has not been reached", state.target)
        };

        CloseMsg { closed, msg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(initial: &str) -> ProofSession {
        let mut s = ProofSession::new();
        s.set_initial_formula(initial).unwrap();
        s
    }

    fn apply(state: ProofState, rule: EquivRule, formula: &str) -> EquivResult<ProofState> {
        EquivProof::apply_move(
            state,
            ProofMove::Apply {
                rule,
                formula: formula.to_string(),
            },
        )
    }

    mod session {
        use super::*;

        #[test]
        fn needs_initial_formula() {
            let mut s = ProofSession::new();
            assert!(!s.has_initial_formula());
            assert_eq!(
                EquivErr::NoInitialFormula,
                s.apply_rule(EquivRule::Commutative, "A").unwrap_err()
            );
            assert_eq!(EquivErr::NoInitialFormula, s.undo().unwrap_err());
            assert!(s.steps().is_empty());
        }

        #[test]
        fn initial_step() {
            let s = started("~(A & B)");
            assert_eq!(
                &[ProofStep {
                    formula: "¬(A ∧ B)".to_string(),
                    rule_applied: "Initial Formula".to_string(),
                }],
                s.steps()
            );
        }

        #[test]
        fn invalid_initial_formula() {
            let mut s = started("A");
            assert!(matches!(
                s.set_initial_formula("A &"),
                Err(EquivErr::Parse(ParseErr::DanglingOperator(..)))
            ));
            assert_eq!(1, s.steps().len());
            assert_eq!("A", s.steps()[0].formula);
        }

        #[test]
        fn apply_rules() {
            let mut s = started("¬(A ∧ B)");
            s.apply_rule(EquivRule::DeMorgan, "¬A ∨ ¬B").unwrap();
            s.apply_rule(EquivRule::Commutative, "~B | ~A").unwrap();

            let steps: Vec<(&str, &str)> = s
                .steps()
                .iter()
                .map(|s| (s.formula.as_str(), s.rule_applied.as_str()))
                .collect();
            assert_eq!(
                vec![
                    ("¬(A ∧ B)", "Initial Formula"),
                    ("¬A ∨ ¬B", "De Morgan's Law"),
                    ("¬B ∨ ¬A", "Commutative Law"),
                ],
                steps
            );
        }

        #[test]
        fn mismatch_keeps_steps() {
            let mut s = started("A ∧ B");
            let err = s.apply_rule(EquivRule::Commutative, "A ∨ B").unwrap_err();
            assert_eq!(
                EquivErr::RuleMismatch(
                    EquivRule::Commutative,
                    "A ∧ B".to_string(),
                    "A ∨ B".to_string()
                ),
                err
            );
            assert_eq!(
                "Incorrect application of the Commutative Law: 'A ∨ B' does not follow from 'A ∧ B'",
                err.to_string()
            );
            assert!(matches!(
                s.apply_rule(EquivRule::Commutative, "B ∧"),
                Err(EquivErr::Parse(_))
            ));
            assert_eq!(1, s.steps().len());
        }

        #[test]
        fn undo_and_reset() {
            let mut s = started("¬¬A");
            assert_eq!(EquivErr::NothingToUndo, s.undo().unwrap_err());

            s.apply_rule(EquivRule::DoubleNegation, "A").unwrap();
            let undone = s.undo().unwrap();
            assert_eq!("Double Negation", undone.rule_applied);
            assert_eq!(1, s.steps().len());
            assert!(LogicNode::var('A').negate().negate().syn_eq(s.current().unwrap()));

            s.reset();
            assert!(!s.has_initial_formula());
            assert!(s.current().is_none());
        }

        #[test]
        fn set_initial_formula_restarts() {
            let mut s = started("A ∧ A");
            s.apply_rule(EquivRule::Idempotent, "A").unwrap();
            s.set_initial_formula("B").unwrap();
            assert_eq!(1, s.steps().len());
            assert_eq!("B", s.steps()[0].formula);
        }
    }

    mod calculus {
        use super::*;

        #[test]
        fn tautology_proof() {
            let state = EquivProof::parse_formula("A | ~A", None).unwrap();
            assert!(!EquivProof::check_close(state.clone()).closed);

            let state = apply(state, EquivRule::ExcludedMiddle, "⊤").unwrap();
            let msg = EquivProof::check_close(state.clone());
            assert!(msg.closed);
            assert_eq!("The proof is closed: A ∨ ¬A is equivalent to ⊤", msg.msg);
            assert!(EquivProof::validate(state));
        }

        #[test]
        fn explicit_target() {
            let params = ProofParams {
                target: Some("B → A".to_string()),
            };
            let state = EquivProof::parse_formula("A → B", Some(params.clone())).unwrap();
            assert!(!EquivProof::check_close(state.clone()).closed);

            assert!(matches!(
                apply(state.clone(), EquivRule::Commutative, "B → A"),
                Err(EquivErr::RuleMismatch(..))
            ));

            let state = apply(state, EquivRule::ImplicationDisjunction, "¬A ∨ B").unwrap();
            let state = apply(state, EquivRule::Commutative, "B ∨ ¬A").unwrap();
            assert!(!EquivProof::check_close(state.clone()).closed);

            let target_state = EquivProof::parse_formula(
                "A",
                Some(ProofParams {
                    target: Some("A ∨ ⊥".to_string()),
                }),
            )
            .unwrap();
            let target_state = apply(target_state, EquivRule::Identity, "A ∨ FALSE").unwrap();
            assert!(EquivProof::check_close(target_state).closed);

            assert!(matches!(
                EquivProof::parse_formula(
                    "A",
                    Some(ProofParams {
                        target: Some("(".to_string())
                    })
                ),
                Err(EquivErr::Parse(_))
            ));
        }

        #[test]
        fn undo_move() {
            let state = EquivProof::parse_formula("A ∧ ⊤", None).unwrap();
            let state = apply(state, EquivRule::Identity, "A").unwrap();
            let state = EquivProof::apply_move(state, ProofMove::Undo).unwrap();
            assert_eq!(1, state.steps().len());
            assert_eq!(
                EquivErr::NothingToUndo,
                EquivProof::apply_move(state, ProofMove::Undo).unwrap_err()
            );
        }

        #[test]
        fn moves_from_json() {
            let m: ProofMove =
                serde_json::from_str(r#"{"type":"apply","rule":"de_morgan","formula":"¬A ∨ ¬B"}"#)
                    .unwrap();
            assert_eq!(
                ProofMove::Apply {
                    rule: EquivRule::DeMorgan,
                    formula: "¬A ∨ ¬B".to_string()
                },
                m
            );
            let m: ProofMove = serde_json::from_str(r#"{"type":"undo"}"#).unwrap();
            assert_eq!(ProofMove::Undo, m);
            assert!(serde_json::from_str::<ProofMove>(r#"{"type":"apply","rule":"nope","formula":"A"}"#).is_err());
        }

        #[test]
        fn sealed_round_trip() {
            let state = EquivProof::parse_formula("¬(A ∨ B)", None).unwrap();
            let state = apply(state, EquivRule::DeMorgan, "¬A ∧ ¬B").unwrap();

            let json = serde_json::to_string(&state).unwrap();
            let back: ProofState = serde_json::from_str(&json).unwrap();
            assert_eq!(state.steps(), back.steps());
            assert!(state.target().syn_eq(back.target()));
            assert!(EquivProof::validate(back));
        }

        #[test]
        fn tampered_state_is_rejected() {
            let state = EquivProof::parse_formula("A ∧ B", None).unwrap();
            let json = serde_json::to_string(&state).unwrap();
            let tampered = json.replace("A ∧ B", "A ∨ B");
            assert!(serde_json::from_str::<ProofState>(&tampered).is_err());
        }

        #[test]
        fn validate_rejects_bad_steps() {
            let session = ProofSession::from_steps(vec![
                ProofStep {
                    formula: "A ∧ B".to_string(),
                    rule_applied: INITIAL_STEP.to_string(),
                },
                ProofStep {
                    formula: "A ∨ B".to_string(),
                    rule_applied: "Commutative Law".to_string(),
                },
            ])
            .unwrap();
            let state = ProofState {
                session,
                target: LogicNode::lit(true),
            };
            assert!(!EquivProof::validate(state));
        }
    }
}
