use std::{collections::HashMap, fmt};

use super::{transform::visitor::LogicNodeVisitor, LogicNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErr {
    Unassigned(char),
}

impl fmt::Display for EvalErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErr::Unassigned(v) => write!(f, "Variable {v} has no truth value"),
        }
    }
}

impl std::error::Error for EvalErr {}

pub type EvalResult<T> = Result<T, EvalErr>;

pub type Interpretation = HashMap<char, bool>;

impl LogicNode {
    pub fn eval(&self, interpretation: &Interpretation) -> EvalResult<bool> {
        Evaluator(interpretation).visit(self)
    }
}

struct Evaluator<'i>(&'i Interpretation);

impl<'i> LogicNodeVisitor for Evaluator<'i> {
    type Ret = EvalResult<bool>;

    fn visit_var(&mut self, name: char) -> Self::Ret {
        self.0.get(&name).copied().ok_or(EvalErr::Unassigned(name))
    }

    fn visit_lit(&mut self, value: bool) -> Self::Ret {
        Ok(value)
    }

    fn visit_not(&mut self, child: &LogicNode) -> Self::Ret {
        Ok(!self.visit(child)?)
    }

    fn visit_and(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        Ok(self.visit(left)? & self.visit(right)?)
    }

    fn visit_or(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        Ok(self.visit(left)? | self.visit(right)?)
    }

    fn visit_impl(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        Ok(!self.visit(left)? | self.visit(right)?)
    }

    fn visit_equiv(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        Ok(self.visit(left)? == self.visit(right)?)
    }

    fn visit_xor(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        Ok(self.visit(left)? != self.visit(right)?)
    }
}
