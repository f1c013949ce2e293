//! Recovery sets used to resynchronize after unexpected tokens.
//!
//! Each set names the tokens that can legitimately start or end the
//! surrounding construct; skipping stops as soon as one is reached.

use sable_syntax::SyntaxKind::*;
use sable_syntax::SyntaxSet;

pub(crate) const DECL_FIRST: SyntaxSet =
    SyntaxSet::new([AT, FUNC_KW, LET_KW, VAR_KW, STRUCT_KW, ENUM_KW, CASE_KW, IMPORT_KW]);

pub(crate) const STMT_FIRST: SyntaxSet =
    SyntaxSet::new([RETURN_KW, WHILE_KW, FOR_KW, DO_KW, BREAK_KW, CONTINUE_KW, SWITCH_KW]);

pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    IDENT,
    UNDERSCORE,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING_LITERAL,
    TRUE_KW,
    FALSE_KW,
    NIL_KW,
    LEFT_PAREN,
    LEFT_BRACKET,
    LEFT_BRACE,
    PREFIX_OPERATOR,
    TRY_KW,
    AWAIT_KW,
    IF_KW,
]);

pub(crate) const TYPE_FIRST: SyntaxSet = SyntaxSet::new([IDENT, LEFT_PAREN, LEFT_BRACKET]);

pub(crate) const PATTERN_FIRST: SyntaxSet = SyntaxSet::new([
    IDENT,
    UNDERSCORE,
    LEFT_PAREN,
    LET_KW,
    VAR_KW,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING_LITERAL,
    TRUE_KW,
    FALSE_KW,
    NIL_KW,
    PREFIX_OPERATOR,
]);

/// Anything that can start a code-block item.
pub(crate) const ITEM_FIRST: SyntaxSet = DECL_FIRST.union(&STMT_FIRST).union(&EXPR_FIRST);

/// Block-structure anchors that item-level recovery never skips past.
pub(crate) const BLOCK_BOUNDARY: SyntaxSet = SyntaxSet::new([RIGHT_BRACE, SEMICOLON]);

pub(crate) const ITEM_RECOVERY: SyntaxSet = ITEM_FIRST.union(&BLOCK_BOUNDARY);

/// Recovery inside parenthesized and bracketed lists. Declaration and
/// statement keywords anchor too, so an unclosed list does not swallow the
/// following item.
pub(crate) const LIST_RECOVERY: SyntaxSet =
    SyntaxSet::new([COMMA, RIGHT_PAREN, RIGHT_BRACKET, RIGHT_BRACE, LEFT_BRACE])
        .union(&DECL_FIRST)
        .union(&STMT_FIRST);

pub(crate) const MEMBER_RECOVERY: SyntaxSet = DECL_FIRST.union(&SyntaxSet::new([RIGHT_BRACE]));

pub(crate) const SWITCH_CASE_RECOVERY: SyntaxSet =
    SyntaxSet::new([CASE_KW, DEFAULT_KW, RIGHT_BRACE]);
