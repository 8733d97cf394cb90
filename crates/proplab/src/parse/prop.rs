use std::ops::Range;

use serde::Serialize;

use crate::{consts::MAX_FORMULA_DEPTH, logic::LogicNode};

use super::{tokenize, OpKind, ParseErr, ParseResult, Token, TokenKind};

pub fn parse_prop_formula(formula: &str) -> ParseResult<LogicNode> {
    PropParser::parse(formula).map(|p| p.root)
}

/// `{valid: true}` or `{valid: false, message}`. Derived from a full parse,
/// so validation and parsing can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn validate_formula(formula: &str) -> Validation {
    match PropParser::parse(formula) {
        Ok(_) => Validation {
            valid: true,
            message: None,
        },
        Err(e) => Validation {
            valid: false,
            message: Some(e.to_string()),
        },
    }
}

/// A parenthesized subformula as written in the source.
#[derive(Debug, Clone)]
pub struct Group {
    pub node: LogicNode,
    /// Token indices of the group's contents, parentheses excluded.
    pub tokens: Range<usize>,
    /// Number of enclosing groups.
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedFormula<'f> {
    pub root: LogicNode,
    pub tokens: Vec<Token<'f>>,
    /// Ordered by the position of the opening parenthesis.
    pub groups: Vec<Group>,
}

/// A subtree under construction and its height, so depth is bounded
/// without walking the tree.
struct Sub {
    node: LogicNode,
    height: usize,
}

impl Sub {
    fn leaf(node: LogicNode) -> Self {
        Sub { node, height: 1 }
    }
}

pub struct PropParser<'f> {
    tokens: Vec<Token<'f>>,
    idx: usize,
    depth: usize,
    groups: Vec<Group>,
}

impl<'f> PropParser<'f> {
    pub fn parse(formula: &'f str) -> ParseResult<ParsedFormula<'f>> {
        let tokens = tokenize(formula)?;
        if tokens.is_empty() {
            return Err(ParseErr::EmptyFormula);
        }
        check_parens(&tokens)?;

        let mut parser = PropParser {
            tokens,
            idx: 0,
            depth: 0,
            groups: Vec::new(),
        };
        let root = parser.parse_equiv()?.node;
        if let Some(t) = parser.peek() {
            return Err(parser.unexpected(t));
        }

        let PropParser {
            tokens, mut groups, ..
        } = parser;
        groups.sort_by_key(|g| g.tokens.start);

        Ok(ParsedFormula {
            root,
            tokens,
            groups,
        })
    }

    fn parse_equiv(&mut self) -> ParseResult<Sub> {
        self.chain(OpKind::Equiv, Self::parse_impl, LogicNode::Equiv)
    }

    fn parse_impl(&mut self) -> ParseResult<Sub> {
        self.chain(OpKind::Impl, Self::parse_xor, LogicNode::Impl)
    }

    fn parse_xor(&mut self) -> ParseResult<Sub> {
        self.chain(OpKind::Xor, Self::parse_or, LogicNode::Xor)
    }

    fn parse_or(&mut self) -> ParseResult<Sub> {
        self.chain(OpKind::Or, Self::parse_and, LogicNode::Or)
    }

    fn parse_and(&mut self) -> ParseResult<Sub> {
        self.chain(OpKind::And, Self::parse_not, LogicNode::And)
    }

    /// Left-associative run of `op` between operands of the next tighter level.
    fn chain(
        &mut self,
        op: OpKind,
        operand: fn(&mut Self) -> ParseResult<Sub>,
        build: fn(Box<LogicNode>, Box<LogicNode>) -> LogicNode,
    ) -> ParseResult<Sub> {
        let mut stub = operand(self)?;

        while let Some(tok) = self.peek().filter(|t| t.kind == TokenKind::Op(op)) {
            self.bump();
            let right = operand(self)?;
            let height = stub.height.max(right.height) + 1;
            if height > MAX_FORMULA_DEPTH {
                return Err(ParseErr::TooDeep(tok.src_pos));
            }
            stub = Sub {
                node: build(stub.node.into(), right.node.into()),
                height,
            };
        }

        Ok(stub)
    }

    fn parse_not(&mut self) -> ParseResult<Sub> {
        let mut nots = Vec::new();
        while let Some(tok) = self.peek().filter(|t| t.kind == TokenKind::Op(OpKind::Not)) {
            nots.push(tok);
            self.bump();
        }

        let mut sub = self.parse_atom()?;
        for tok in nots.into_iter().rev() {
            if sub.height >= MAX_FORMULA_DEPTH {
                return Err(ParseErr::TooDeep(tok.src_pos));
            }
            sub = Sub {
                node: LogicNode::Not(sub.node.into()),
                height: sub.height + 1,
            };
        }

        Ok(sub)
    }

    fn parse_atom(&mut self) -> ParseResult<Sub> {
        let tok = match self.peek() {
            Some(t) => t,
            None => return Err(self.dangling()),
        };

        match tok.kind {
            TokenKind::Var(name) => {
                self.bump();
                Ok(Sub::leaf(LogicNode::Var(name)))
            }
            TokenKind::Lit(value) => {
                self.bump();
                Ok(Sub::leaf(LogicNode::Lit(value)))
            }
            TokenKind::LParen => self.parse_group(tok),
            TokenKind::RParen => Err(self.dangling()),
            TokenKind::Op(_) => Err(ParseErr::MisplacedOperator(
                tok.spelling.to_string(),
                tok.src_pos,
            )),
        }
    }

    fn parse_group(&mut self, open: Token<'f>) -> ParseResult<Sub> {
        if self.depth >= MAX_FORMULA_DEPTH {
            return Err(ParseErr::TooDeep(open.src_pos));
        }
        self.bump();
        if self.next_is(TokenKind::RParen) {
            return Err(ParseErr::EmptyParens(open.src_pos));
        }

        let start = self.idx;
        self.depth += 1;
        let sub = self.parse_equiv()?;
        self.depth -= 1;
        let end = self.idx;

        match self.peek() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => self.bump(),
            Some(t) => return Err(self.unexpected(t)),
            None => return Err(ParseErr::UnmatchedOpen(open.src_pos)),
        }

        self.groups.push(Group {
            node: sub.node.clone(),
            tokens: start..end,
            depth: self.depth,
        });
        Ok(sub)
    }

    /// Error for a token that cannot follow a complete operand.
    fn unexpected(&self, t: Token<'f>) -> ParseErr {
        match t.kind {
            TokenKind::RParen => ParseErr::UnmatchedClose(t.src_pos),
            kind if kind.starts_operand() => ParseErr::MissingOperator(t.src_pos),
            _ => ParseErr::MisplacedOperator(t.spelling.to_string(), t.src_pos),
        }
    }

    /// Error for an operand that never came: blame the operator before it.
    fn dangling(&self) -> ParseErr {
        match self.idx.checked_sub(1).map(|i| self.tokens[i]) {
            Some(prev) => ParseErr::DanglingOperator(prev.spelling.to_string(), prev.src_pos),
            None => ParseErr::EmptyFormula,
        }
    }

    fn peek(&self) -> Option<Token<'f>> {
        self.tokens.get(self.idx).copied()
    }

    fn next_is(&self, expected: TokenKind) -> bool {
        matches!(self.peek(), Some(Token { kind, .. }) if kind == expected)
    }

    fn bump(&mut self) {
        self.idx += 1;
    }
}

fn check_parens(tokens: &[Token]) -> ParseResult<()> {
    let mut open = Vec::new();
    for t in tokens {
        match t.kind {
            TokenKind::LParen => open.push(t.src_pos),
            TokenKind::RParen => {
                if open.pop().is_none() {
                    return Err(ParseErr::UnmatchedClose(t.src_pos));
                }
            }
            _ => {}
        }
    }
    match open.first() {
        Some(pos) => Err(ParseErr::UnmatchedOpen(*pos)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{logic::SynEq, parse::normalize::display_tokens};

    macro_rules! test_map {
        ($func:ident, $( $f:expr, $e:expr );*) => {{
            $(
                let n = $func($f).expect($f);
                assert_eq!($e, n.to_string(), "input: {}", $f);
            )*
        }};
    }

    macro_rules! test_list_invalid {
        ($func:ident, $( $f:expr ),*) => {{
            $(
                let res = $func($f);
                assert!(res.is_err(), "f: {}\nAST: {:?}", $f, res);
            )*
        }};
    }

    macro_rules! test_errors {
        ($( $f:expr, $e:expr );*) => {{
            $(
                assert_eq!(Err($e), parse_prop_formula($f), "input: {}", $f);
            )*
        }};
    }

    #[test]
    fn prop_valid() {
        test_map!(
            parse_prop_formula,
            "A", "A";
            "NOT A", "¬A";
            "A -> B", "A → B";
            "A->B", "A → B";
            "A    ->B", "A → B";
            "A<->(B -> (!(C)))", "A ↔ B → ¬C";
            "(B & A <-> (A) | !B)", "B ∧ A ↔ A ∨ ¬B";
            "A AND (B OR C)", "A ∧ (B ∨ C)";
            "NOT NOT A", "¬¬A";
            "~~A", "¬¬A";
            "A ⊕ B → C", "A ⊕ B → C";
            "⊤ ∧ ⊥", "⊤ ∧ ⊥";
            "true or false", "⊤ ∨ ⊥"
        );
    }

    #[test]
    fn precedence() {
        let a = || LogicNode::var('A');
        let b = || LogicNode::var('B');
        let c = || LogicNode::var('C');

        let n = parse_prop_formula("NOT A AND B OR C").unwrap();
        assert!(n.syn_eq(&a().negate().and(b()).or(c())));

        let n = parse_prop_formula("A OR B XOR C").unwrap();
        assert!(n.syn_eq(&a().or(b()).xor(c())));

        let n = parse_prop_formula("A XOR B IMPLIES C").unwrap();
        assert!(n.syn_eq(&a().xor(b()).implies(c())));

        let n = parse_prop_formula("A IMPLIES B IFF C").unwrap();
        assert!(n.syn_eq(&a().implies(b()).iff(c())));

        let n = parse_prop_formula("A IFF B IMPLIES C").unwrap();
        assert!(n.syn_eq(&a().iff(b().implies(c()))));
    }

    #[test]
    fn left_associative() {
        let n = parse_prop_formula("A -> B -> C").unwrap();
        let e = LogicNode::var('A')
            .implies(LogicNode::var('B'))
            .implies(LogicNode::var('C'));
        assert!(n.syn_eq(&e));

        let n = parse_prop_formula("A & B & C").unwrap();
        let e = LogicNode::var('A')
            .and(LogicNode::var('B'))
            .and(LogicNode::var('C'));
        assert!(n.syn_eq(&e));
    }

    #[test]
    fn prop_invalid() {
        test_list_invalid!(
            parse_prop_formula,
            "",
            "   ",
            "->A",
            "<->",
            "!->",
            "A!",
            "A->",
            "B<=>",
            "(A&B C",
            "(A|B",
            "A B",
            "a & b",
            "A ? B",
            "()"
        );
    }

    #[test]
    fn error_positions() {
        test_errors!(
            "", ParseErr::EmptyFormula;
            "(A AND B", ParseErr::UnmatchedOpen(1);
            "A AND (B OR (C)", ParseErr::UnmatchedOpen(7);
            "A AND B)", ParseErr::UnmatchedClose(8);
            "A AND OR B", ParseErr::MisplacedOperator("OR".to_string(), 7);
            "AND A", ParseErr::MisplacedOperator("AND".to_string(), 1);
            "A AND", ParseErr::DanglingOperator("AND".to_string(), 3);
            "NOT", ParseErr::DanglingOperator("NOT".to_string(), 1);
            "(A ->) & B", ParseErr::DanglingOperator("->".to_string(), 4);
            "A B", ParseErr::MissingOperator(3);
            "A NOT B", ParseErr::MissingOperator(3);
            "(A) (B)", ParseErr::MissingOperator(5);
            "(A B)", ParseErr::MissingOperator(4);
            "A & ()", ParseErr::EmptyParens(5);
            "A & b", ParseErr::InvalidToken("b".to_string(), 5)
        );
    }

    #[test]
    fn nesting_limit() {
        let negations = format!("{}A", "~".repeat(15_000));
        assert_eq!(Err(ParseErr::TooDeep(14_745)), parse_prop_formula(&negations));
        assert!(parse_prop_formula(&"~".repeat(200_000)).is_err());

        let parens = format!("{}A{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(Err(ParseErr::TooDeep(257)), parse_prop_formula(&parens));

        let chain = format!("{}A", "A&".repeat(300));
        assert_eq!(Err(ParseErr::TooDeep(512)), parse_prop_formula(&chain));

        let limit = format!("{}A", "~".repeat(256));
        assert_eq!(Err(ParseErr::TooDeep(1)), parse_prop_formula(&limit));
    }

    #[test]
    fn nesting_within_limit() {
        let negations = format!("{}A", "~".repeat(255));
        assert!(parse_prop_formula(&negations).is_ok());

        let mixed = format!("{}A{}", "(~".repeat(100), ")".repeat(100));
        let parsed = PropParser::parse(&mixed).unwrap();
        assert_eq!(100, parsed.groups.len());
        assert!(parsed.root.to_string().starts_with("¬¬"));
    }

    #[test]
    fn validation_follows_parser() {
        let v = validate_formula("A AND OR B");
        assert!(!v.valid);
        assert!(v.message.unwrap().contains("'OR' at position 7"));

        assert_eq!(
            Validation {
                valid: true,
                message: None
            },
            validate_formula("A AND (B OR C)")
        );

        for f in ["A", "A & (B", "A B", "NOT NOT", "¬(A ∨ B) ↔ ¬A ∧ ¬B"] {
            assert_eq!(validate_formula(f).valid, parse_prop_formula(f).is_ok(), "{f}");
        }
    }

    #[test]
    fn validation_json() {
        let v = serde_json::to_string(&validate_formula("A")).unwrap();
        assert_eq!(r#"{"valid":true}"#, v);
        let v = serde_json::to_string(&validate_formula("(A")).unwrap();
        assert_eq!(r#"{"valid":false,"message":"Unmatched '(' at position 1"}"#, v);
    }

    #[test]
    fn groups() {
        let p = PropParser::parse("(A & (B | C)) -> (NOT A)").unwrap();
        let rendered: Vec<(String, usize)> = p
            .groups
            .iter()
            .map(|g| (display_tokens(&p.tokens[g.tokens.clone()]), g.depth))
            .collect();
        assert_eq!(
            vec![
                ("A ∧ (B ∨ C)".to_string(), 0),
                ("B ∨ C".to_string(), 1),
                ("¬A".to_string(), 0),
            ],
            rendered
        );
        assert!(p.groups[1]
            .node
            .syn_eq(&LogicNode::var('B').or(LogicNode::var('C'))));
    }
}
