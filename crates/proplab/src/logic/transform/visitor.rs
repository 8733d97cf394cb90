use crate::logic::LogicNode;

pub trait LogicNodeVisitor {
    type Ret;

    fn visit(&mut self, node: &LogicNode) -> Self::Ret {
        match node {
            LogicNode::Var(name) => self.visit_var(*name),
            LogicNode::Lit(value) => self.visit_lit(*value),
            LogicNode::Not(c) => self.visit_not(c),
            LogicNode::And(left, right) => self.visit_and(left, right),
            LogicNode::Or(left, right) => self.visit_or(left, right),
            LogicNode::Impl(left, right) => self.visit_impl(left, right),
            LogicNode::Equiv(left, right) => self.visit_equiv(left, right),
            LogicNode::Xor(left, right) => self.visit_xor(left, right),
        }
    }

    fn visit_var(&mut self, name: char) -> Self::Ret;

    fn visit_lit(&mut self, value: bool) -> Self::Ret;

    fn visit_not(&mut self, child: &LogicNode) -> Self::Ret;

    fn visit_and(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret;

    fn visit_or(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret;

    fn visit_impl(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret;

    fn visit_equiv(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret;

    fn visit_xor(&mut self, left: &LogicNode, right: &LogicNode) -> Self::Ret;
}
