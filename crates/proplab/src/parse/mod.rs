use std::fmt;

use crate::consts::MAX_FORMULA_DEPTH;

pub mod normalize;
pub mod prop;

pub use prop::{parse_prop_formula, validate_formula, Group, ParsedFormula, PropParser, Validation};

pub type ParseResult<T> = Result<T, ParseErr>;

/// Syntax errors. Every position is a 1-based character offset into the
/// formula as the user typed it.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum ParseErr {
    EmptyFormula,
    InvalidToken(String, usize),
    UnmatchedOpen(usize),
    UnmatchedClose(usize),
    MissingOperator(usize),
    MisplacedOperator(String, usize),
    DanglingOperator(String, usize),
    EmptyParens(usize),
    /// Nesting of operators or parentheses exceeds `MAX_FORMULA_DEPTH`.
    TooDeep(usize),
}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErr::EmptyFormula => write!(f, "Please enter a formula"),
            ParseErr::InvalidToken(t, p) => write!(
                f,
                "Unknown token '{t}' at position {p}. Variables are single uppercase letters"
            ),
            ParseErr::UnmatchedOpen(p) => write!(f, "Unmatched '(' at position {p}"),
            ParseErr::UnmatchedClose(p) => write!(f, "Unmatched ')' at position {p}"),
            ParseErr::MissingOperator(p) => {
                write!(f, "Missing operator between operands before position {p}")
            }
            ParseErr::MisplacedOperator(op, p) => {
                write!(f, "Operator '{op}' at position {p} is missing its left operand")
            }
            ParseErr::DanglingOperator(op, p) => {
                write!(f, "Operator '{op}' at position {p} is missing its right operand")
            }
            ParseErr::EmptyParens(p) => write!(f, "Empty parentheses at position {p}"),
            ParseErr::TooDeep(p) => write!(
                f,
                "Formula is nested too deeply at position {p} (at most {MAX_FORMULA_DEPTH} levels)"
            ),
        }
    }
}

impl std::error::Error for ParseErr {}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OpKind {
    Not,
    And,
    Or,
    Impl,
    Equiv,
    Xor,
}

impl OpKind {
    /// The spelling `to_canonical_operators` rewrites every alias to.
    pub fn canonical(&self) -> &'static str {
        match self {
            OpKind::Not => "NOT",
            OpKind::And => "AND",
            OpKind::Or => "OR",
            OpKind::Impl => "IMPLIES",
            OpKind::Equiv => "IFF",
            OpKind::Xor => "XOR",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            OpKind::Not => "¬",
            OpKind::And => "∧",
            OpKind::Or => "∨",
            OpKind::Impl => "→",
            OpKind::Equiv => "↔",
            OpKind::Xor => "⊕",
        }
    }

    pub fn is_binary(&self) -> bool {
        !matches!(self, OpKind::Not)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

pub const VERUM: &str = "⊤";
pub const FALSUM: &str = "⊥";

pub(crate) fn lit_display(value: bool) -> &'static str {
    if value {
        VERUM
    } else {
        FALSUM
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Var(char),
    Lit(bool),
    Op(OpKind),
    LParen,
    RParen,
}

impl TokenKind {
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Var(_) | TokenKind::Lit(_) | TokenKind::LParen | TokenKind::Op(OpKind::Not)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Var(c) => write!(f, "{c}"),
            TokenKind::Lit(b) => write!(f, "{}", lit_display(*b)),
            TokenKind::Op(op) => write!(f, "{op}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

/// Symbolic spellings, longest first so that `<->` wins over `->`.
const SYMBOLS: &[(&str, TokenKind)] = &[
    ("<->", TokenKind::Op(OpKind::Equiv)),
    ("<=>", TokenKind::Op(OpKind::Equiv)),
    ("->", TokenKind::Op(OpKind::Impl)),
    ("→", TokenKind::Op(OpKind::Impl)),
    ("↔", TokenKind::Op(OpKind::Equiv)),
    ("&", TokenKind::Op(OpKind::And)),
    ("∧", TokenKind::Op(OpKind::And)),
    ("|", TokenKind::Op(OpKind::Or)),
    ("∨", TokenKind::Op(OpKind::Or)),
    ("~", TokenKind::Op(OpKind::Not)),
    ("!", TokenKind::Op(OpKind::Not)),
    ("¬", TokenKind::Op(OpKind::Not)),
    ("^", TokenKind::Op(OpKind::Xor)),
    ("⊕", TokenKind::Op(OpKind::Xor)),
    ("⊤", TokenKind::Lit(true)),
    ("⊥", TokenKind::Lit(false)),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
];

/// Keyword spellings, matched case-insensitively on whole words only.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("AND", TokenKind::Op(OpKind::And)),
    ("OR", TokenKind::Op(OpKind::Or)),
    ("NOT", TokenKind::Op(OpKind::Not)),
    ("IMPLIES", TokenKind::Op(OpKind::Impl)),
    ("IFF", TokenKind::Op(OpKind::Equiv)),
    ("XOR", TokenKind::Op(OpKind::Xor)),
    ("TRUE", TokenKind::Lit(true)),
    ("FALSE", TokenKind::Lit(false)),
];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexemeKind {
    Token(TokenKind),
    /// An alphanumeric run that is neither a keyword nor a variable.
    Word,
    Space,
    Other,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Lexeme<'f> {
    pub kind: LexemeKind,
    pub spelling: &'f str,
    pub src_pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn classify_word(word: &str) -> LexemeKind {
    if let Some((_, kind)) = KEYWORDS.iter().find(|(k, _)| k.eq_ignore_ascii_case(word)) {
        return LexemeKind::Token(*kind);
    }
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'A'..='Z'), None) => LexemeKind::Token(TokenKind::Var(c)),
        _ => LexemeKind::Word,
    }
}

/// Splits arbitrary text into lexemes without ever failing. The symbol
/// normalizer and the tokenizer both run on top of this, so they agree on
/// what counts as an operator.
pub struct Lexer<'f> {
    src: &'f str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'f> Lexer<'f> {
    pub fn new(src: &'f str) -> Self {
        Self {
            src,
            byte_pos: 0,
            char_pos: 0,
        }
    }
}

impl<'f> Iterator for Lexer<'f> {
    type Item = Lexeme<'f>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.byte_pos..];
        let first = rest.chars().next()?;

        let (kind, len) = if first.is_whitespace() {
            let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            (LexemeKind::Space, len)
        } else if let Some((sym, kind)) = SYMBOLS.iter().find(|(s, _)| rest.starts_with(s)) {
            (LexemeKind::Token(*kind), sym.len())
        } else if is_word_char(first) {
            let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
            (classify_word(&rest[..len]), len)
        } else {
            (LexemeKind::Other, first.len_utf8())
        };

        let spelling = &rest[..len];
        let lexeme = Lexeme {
            kind,
            spelling,
            src_pos: self.char_pos + 1,
        };
        self.byte_pos += len;
        self.char_pos += spelling.chars().count();
        Some(lexeme)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'f> {
    pub kind: TokenKind,
    pub spelling: &'f str,
    pub src_pos: usize,
}

impl<'f> fmt::Display for Token<'f> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spelling)
    }
}

pub struct Tokenizer<'f> {
    lexer: Lexer<'f>,
}

impl<'f> Tokenizer<'f> {
    pub fn new(formula: &'f str) -> Self {
        Self {
            lexer: Lexer::new(formula),
        }
    }
}

impl<'f> Iterator for Tokenizer<'f> {
    type Item = ParseResult<Token<'f>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let lexeme = self.lexer.next()?;
            return Some(match lexeme.kind {
                LexemeKind::Space => continue,
                LexemeKind::Token(kind) => Ok(Token {
                    kind,
                    spelling: lexeme.spelling,
                    src_pos: lexeme.src_pos,
                }),
                LexemeKind::Word | LexemeKind::Other => Err(ParseErr::InvalidToken(
                    lexeme.spelling.to_string(),
                    lexeme.src_pos,
                )),
            });
        }
    }
}

pub fn tokenize(formula: &str) -> ParseResult<Vec<Token<'_>>> {
    Tokenizer::new(formula).collect()
}
