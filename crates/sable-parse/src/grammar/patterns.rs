use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::*;
use sable_syntax::SyntaxSet;

use super::{exprs, list_comma};
use crate::parser::{Flavor, LayoutBuilder, Parser};
use crate::recovery;

pub(crate) fn pattern(p: &mut Parser<'_>, context: Option<&str>) -> NodeId {
    match p.peek_kind() {
        LET_KW | VAR_KW => {
            let mut b = LayoutBuilder::new(VALUE_BINDING_PATTERN);
            b.push(p.advance());
            b.push(pattern(p, context));
            b.finish(p)
        }
        UNDERSCORE => {
            let mut b = LayoutBuilder::new(WILDCARD_PATTERN);
            b.push(p.advance());
            b.finish(p)
        }
        IDENT => {
            // A bare name binds; a name followed by call or member syntax is
            // matched as an expression.
            if matches!(p.peek_kind2(), LEFT_PAREN | DOT) {
                expression_pattern(p)
            } else {
                let mut b = LayoutBuilder::new(IDENTIFIER_PATTERN);
                b.push(p.advance());
                b.finish(p)
            }
        }
        LEFT_PAREN => tuple_pattern(p),
        INT_NUMBER | FLOAT_NUMBER | STRING_LITERAL | TRUE_KW | FALSE_KW | NIL_KW
        | PREFIX_OPERATOR => expression_pattern(p),
        _ => p.expected_node(MISSING_PATTERN, context),
    }
}

fn expression_pattern(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(EXPRESSION_PATTERN);
    let flavor = Flavor { pattern: true, ..Flavor::default() };
    b.push(exprs::expr(p, flavor));
    b.finish(p)
}

fn tuple_pattern(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(TUPLE_PATTERN);
    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(TUPLE_PATTERN_ELEMENT_LIST);
    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&recovery::PATTERN_FIRST) {
            list.skip_until(
                p,
                &recovery::PATTERN_FIRST.union(&SyntaxSet::new([RIGHT_PAREN, COMMA])),
                "unexpected code in tuple pattern",
            );
            if !p.at_any(&recovery::PATTERN_FIRST) && !p.at(COMMA) {
                break;
            }
            continue;
        }
        let mut element = LayoutBuilder::new(TUPLE_PATTERN_ELEMENT);
        element.push(pattern(p, None));
        element.push(list_comma(p, RIGHT_PAREN, &recovery::PATTERN_FIRST));
        list.push(element.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_PAREN, open_range, "tuple pattern"));
    b.finish(p)
}
