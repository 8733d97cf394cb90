use std::collections::BTreeSet;

use crate::logic::LogicNode;

use super::visitor::LogicNodeVisitor;

/// All variables of `n`, sorted.
pub fn collect_vars(n: &LogicNode) -> BTreeSet<char> {
    let mut c = VarCollector::new();
    c.visit(n);
    c.0
}

pub struct VarCollector(BTreeSet<char>);

impl VarCollector {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }
}

impl Default for VarCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicNodeVisitor for VarCollector {
    type Ret = ();

    fn visit_var(&mut self, name: char) -> Self::Ret {
        self.0.insert(name);
    }

    fn visit_lit(&mut self, _: bool) -> Self::Ret {}

    fn visit_not(&mut self, child: &LogicNode) -> Self::Ret {
        self.visit(child)
    }

    fn visit_and(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        self.visit(left);
        self.visit(right)
    }

    fn visit_or(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        self.visit(left);
        self.visit(right)
    }

    fn visit_impl(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        self.visit(left);
        self.visit(right)
    }

    fn visit_equiv(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        self.visit(left);
        self.visit(right)
    }

    fn visit_xor(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret {
        self.visit(left);
        self.visit(right)
    }
}
