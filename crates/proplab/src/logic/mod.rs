pub mod eval;
pub mod transform;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::parse::{lit_display, OpKind};

pub use eval::{EvalErr, EvalResult};

/// Strict structural equality: same shape, same labels, same child order.
/// `A ∧ B` is *not* syntactically equal to `B ∧ A`.
pub trait SynEq {
    fn syn_eq(&self, o: &Self) -> bool;
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum LogicNode {
    Var(char),
    Lit(bool),
    Not(Box<LogicNode>),
    And(Box<LogicNode>, Box<LogicNode>),
    Or(Box<LogicNode>, Box<LogicNode>),
    Impl(Box<LogicNode>, Box<LogicNode>),
    Equiv(Box<LogicNode>, Box<LogicNode>),
    Xor(Box<LogicNode>, Box<LogicNode>),
}

impl LogicNode {
    pub fn var(name: char) -> Self {
        LogicNode::Var(name)
    }

    pub fn lit(value: bool) -> Self {
        LogicNode::Lit(value)
    }

    pub fn negate(self) -> Self {
        LogicNode::Not(self.into())
    }

    pub fn and(self, right: LogicNode) -> Self {
        LogicNode::And(self.into(), right.into())
    }

    pub fn or(self, right: LogicNode) -> Self {
        LogicNode::Or(self.into(), right.into())
    }

    pub fn implies(self, right: LogicNode) -> Self {
        LogicNode::Impl(self.into(), right.into())
    }

    pub fn iff(self, right: LogicNode) -> Self {
        LogicNode::Equiv(self.into(), right.into())
    }

    pub fn xor(self, right: LogicNode) -> Self {
        LogicNode::Xor(self.into(), right.into())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, LogicNode::Var(_) | LogicNode::Lit(_))
    }

    pub fn binary_op(&self) -> Option<(OpKind, &LogicNode, &LogicNode)> {
        match self {
            LogicNode::And(l, r) => Some((OpKind::And, &**l, &**r)),
            LogicNode::Or(l, r) => Some((OpKind::Or, &**l, &**r)),
            LogicNode::Impl(l, r) => Some((OpKind::Impl, &**l, &**r)),
            LogicNode::Equiv(l, r) => Some((OpKind::Equiv, &**l, &**r)),
            LogicNode::Xor(l, r) => Some((OpKind::Xor, &**l, &**r)),
            _ => None,
        }
    }

    /// Binding strength used when printing. Matches the parser:
    /// ¬ > ∧ > ∨ > ⊕ > → > ↔.
    fn precedence(&self) -> u8 {
        match self {
            LogicNode::Equiv(..) => 1,
            LogicNode::Impl(..) => 2,
            LogicNode::Xor(..) => 3,
            LogicNode::Or(..) => 4,
            LogicNode::And(..) => 5,
            LogicNode::Not(_) => 6,
            LogicNode::Var(_) | LogicNode::Lit(_) => 7,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, child: &LogicNode, min: u8) -> fmt::Result {
        if child.precedence() < min {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl SynEq for LogicNode {
    fn syn_eq(&self, o: &Self) -> bool {
        match (self, o) {
            (LogicNode::Var(a), LogicNode::Var(b)) => a == b,
            (LogicNode::Lit(a), LogicNode::Lit(b)) => a == b,
            (LogicNode::Not(a), LogicNode::Not(b)) => a.syn_eq(b),
            (LogicNode::And(l1, r1), LogicNode::And(l2, r2))
            | (LogicNode::Or(l1, r1), LogicNode::Or(l2, r2))
            | (LogicNode::Impl(l1, r1), LogicNode::Impl(l2, r2))
            | (LogicNode::Equiv(l1, r1), LogicNode::Equiv(l2, r2))
            | (LogicNode::Xor(l1, r1), LogicNode::Xor(l2, r2)) => l1.syn_eq(l2) && r1.syn_eq(r2),
            _ => false,
        }
    }
}

pub fn structurally_equal(a: &LogicNode, b: &LogicNode) -> bool {
    a.syn_eq(b)
}

/// Prints with display glyphs and only the parentheses the grammar needs.
/// Binary operators associate to the left, so a right operand of equal
/// strength is parenthesized.
impl fmt::Display for LogicNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicNode::Var(c) => write!(f, "{}", c),
            LogicNode::Lit(b) => write!(f, "{}", lit_display(*b)),
            LogicNode::Not(c) => {
                write!(f, "{}", OpKind::Not)?;
                self.fmt_child(f, c, self.precedence())
            }
            _ => {
                let (op, l, r) = self.binary_op().ok_or(fmt::Error)?;
                let p = self.precedence();
                self.fmt_child(f, l, p)?;
                write!(f, " {} ", op)?;
                self.fmt_child(f, r, p + 1)
            }
        }
    }
}

impl Serialize for LogicNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
