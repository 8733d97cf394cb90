//! Conversions between the operator spellings users type, the canonical
//! keyword spelling and the Unicode glyphs shown in tables and proofs.

use super::{lit_display, Lexeme, LexemeKind, Lexer, OpKind, Token, TokenKind};

fn ends_with_word_char(s: &str) -> bool {
    s.chars().last().map_or(false, |c| c.is_alphanumeric() || c == '_')
}

fn starts_with_word_char(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_alphanumeric() || c == '_')
}

/// Rewrites every recognized operator spelling to its canonical keyword
/// (`AND`, `OR`, `NOT`, `IMPLIES`, `IFF`, `XOR`). Constants become `⊤`/`⊥`.
/// Everything else, including unknown words, is copied verbatim.
pub fn to_canonical_operators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pad_next = false;

    for Lexeme { kind, spelling, .. } in Lexer::new(text) {
        if pad_next && starts_with_word_char(spelling) {
            out.push(' ');
        }
        pad_next = false;

        match kind {
            LexemeKind::Token(TokenKind::Op(op)) => {
                if ends_with_word_char(&out) {
                    out.push(' ');
                }
                out.push_str(op.canonical());
                pad_next = true;
            }
            LexemeKind::Token(TokenKind::Lit(value)) => out.push_str(lit_display(value)),
            _ => out.push_str(spelling),
        }
    }

    out
}

/// Renders operators as logic glyphs (∧ ∨ ¬ → ↔ ⊕). Whitespace directly
/// after a negation is dropped so that `NOT A` reads `¬A`.
pub fn to_display_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_not = false;

    for Lexeme { kind, spelling, .. } in Lexer::new(text) {
        match kind {
            LexemeKind::Space if after_not => continue,
            LexemeKind::Token(TokenKind::Op(op)) => out.push_str(op.display()),
            LexemeKind::Token(TokenKind::Lit(value)) => out.push_str(lit_display(value)),
            _ => out.push_str(spelling),
        }
        after_not = kind == LexemeKind::Token(TokenKind::Op(OpKind::Not));
    }

    out
}

/// Renders a token slice with display glyphs and uniform spacing: binary
/// operators are surrounded by single spaces, everything else is packed.
pub fn display_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for t in tokens {
        match t.kind {
            TokenKind::Op(op) if op.is_binary() => {
                out.push(' ');
                out.push_str(op.display());
                out.push(' ');
            }
            kind => out.push_str(&kind.to_string()),
        }
    }
    out
}
