use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::{self, *};
use sable_syntax::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod decls;
pub(crate) mod exprs;
pub(crate) mod patterns;
pub(crate) mod stmts;
pub(crate) mod types;

/// Consumes `kind` if present, otherwise records a silent missing token.
pub(crate) fn opt_token(p: &mut Parser<'_>, kind: SyntaxKind) -> NodeId {
    match p.eat(kind) {
        Some(id) => id,
        None => p.missing(kind),
    }
}

/// Separator slot of a comma-separated list element.
///
/// A missing comma is an error only when another element clearly follows;
/// before the closing delimiter it is a legitimate absence.
pub(crate) fn list_comma(p: &mut Parser<'_>, ket: SyntaxKind, first: &SyntaxSet) -> NodeId {
    if let Some(id) = p.eat(COMMA) {
        return id;
    }
    if !p.at(ket) && !p.at(EOF) && first.contains(p.peek_kind()) {
        return p.expect(COMMA);
    }
    p.missing(COMMA)
}
