use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::{self, *};
use sable_syntax::SyntaxSet;

use super::{list_comma, stmts};
use crate::parser::{Flavor, LayoutBuilder, Parser};
use crate::recovery;
use crate::strings;

pub(crate) fn expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    expr_ctx(p, flavor, None)
}

pub(crate) fn expr_ctx(p: &mut Parser<'_>, flavor: Flavor, context: Option<&str>) -> NodeId {
    sequence_expr(p, flavor, context)
}

/// Operators that continue a sequence expression. The flat operand/operator
/// list is handed to a later precedence-folding pass untouched.
fn at_sequence_operator(p: &Parser<'_>, flavor: Flavor) -> bool {
    if flavor.pattern {
        return false;
    }
    if flavor.stop_at_in && p.at(IN_KW) {
        return false;
    }
    matches!(p.peek_kind(), BINARY_OPERATOR | EQ | AMP | LESS | GREATER | QUESTION)
}

fn sequence_expr(p: &mut Parser<'_>, flavor: Flavor, context: Option<&str>) -> NodeId {
    let first = operand(p, flavor, context);
    if !at_sequence_operator(p, flavor) {
        return first;
    }

    let mut list = LayoutBuilder::new(SEQUENCE_EXPR);
    list.push(first);
    while at_sequence_operator(p, flavor) {
        if p.at(QUESTION) {
            let mut ternary = LayoutBuilder::new(UNRESOLVED_TERNARY_EXPR);
            ternary.push(p.advance());
            ternary.push(sequence_expr(p, flavor, Some("in ternary expression")));
            ternary.push(p.expect(COLON));
            list.push(ternary.finish(p));
            list.push(next_operand(p, flavor, "after ternary operator"));
        } else {
            let mut operator = LayoutBuilder::new(BINARY_OPERATOR_EXPR);
            operator.push(p.advance());
            list.push(operator.finish(p));
            list.push(next_operand(p, flavor, "after operator"));
        }
    }
    list.finish(p)
}

fn next_operand(p: &mut Parser<'_>, flavor: Flavor, context: &str) -> NodeId {
    if p.at_any(&recovery::EXPR_FIRST) && !(flavor.stop_at_brace && p.at(LEFT_BRACE)) {
        operand(p, flavor, None)
    } else {
        p.expected_node(MISSING_EXPR, Some(context))
    }
}

fn operand(p: &mut Parser<'_>, flavor: Flavor, context: Option<&str>) -> NodeId {
    match p.peek_kind() {
        TRY_KW => {
            let mut b = LayoutBuilder::new(TRY_EXPR);
            b.push(p.advance());
            b.push(next_operand(p, flavor, "after 'try'"));
            b.finish(p)
        }
        AWAIT_KW => {
            let mut b = LayoutBuilder::new(AWAIT_EXPR);
            b.push(p.advance());
            b.push(next_operand(p, flavor, "after 'await'"));
            b.finish(p)
        }
        PREFIX_OPERATOR => {
            let mut b = LayoutBuilder::new(PREFIX_EXPR);
            b.push(p.advance());
            b.push(next_operand(p, flavor, "after prefix operator"));
            b.finish(p)
        }
        _ => postfix_expr(p, flavor, context),
    }
}

fn postfix_expr(p: &mut Parser<'_>, flavor: Flavor, context: Option<&str>) -> NodeId {
    let mut node = primary_expr(p, flavor, context);
    loop {
        match p.peek_kind() {
            LEFT_PAREN => {
                let mut b = LayoutBuilder::new(CALL_EXPR);
                b.push(node);
                let open_range = p.current_range();
                b.push(p.advance());
                b.push(argument_list(p, RIGHT_PAREN));
                b.push(p.expect_closing(RIGHT_PAREN, open_range, "argument list"));
                if !flavor.stop_at_brace && !flavor.pattern && p.at(LEFT_BRACE) {
                    b.push(closure_expr(p));
                } else {
                    let none = p.missing_layout(CLOSURE_EXPR);
                    b.push(none);
                }
                node = b.finish(p);
            }
            DOT => {
                let mut b = LayoutBuilder::new(MEMBER_ACCESS_EXPR);
                b.push(node);
                b.push(p.advance());
                b.push(p.expect(IDENT));
                node = b.finish(p);
            }
            LEFT_BRACKET => {
                let mut b = LayoutBuilder::new(SUBSCRIPT_EXPR);
                b.push(node);
                let open_range = p.current_range();
                b.push(p.advance());
                b.push(argument_list(p, RIGHT_BRACKET));
                b.push(p.expect_closing(RIGHT_BRACKET, open_range, "subscript arguments"));
                node = b.finish(p);
            }
            POSTFIX_OPERATOR => {
                let mut b = LayoutBuilder::new(POSTFIX_EXPR);
                b.push(node);
                b.push(p.advance());
                node = b.finish(p);
            }
            LEFT_BRACE if !flavor.stop_at_brace && !flavor.pattern => {
                // Trailing closure with no written parentheses.
                let mut b = LayoutBuilder::new(CALL_EXPR);
                b.push(node);
                let lparen = p.missing(LEFT_PAREN);
                b.push(lparen);
                let arguments = p.missing_layout(ARGUMENT_LIST);
                b.push(arguments);
                let rparen = p.missing(RIGHT_PAREN);
                b.push(rparen);
                b.push(closure_expr(p));
                node = b.finish(p);
            }
            _ => break,
        }
    }
    node
}

fn primary_expr(p: &mut Parser<'_>, flavor: Flavor, context: Option<&str>) -> NodeId {
    match p.peek_kind() {
        INT_NUMBER => literal(p, INT_LITERAL_EXPR),
        FLOAT_NUMBER => literal(p, FLOAT_LITERAL_EXPR),
        TRUE_KW | FALSE_KW => literal(p, BOOL_LITERAL_EXPR),
        NIL_KW => literal(p, NIL_LITERAL_EXPR),
        IDENT | UNDERSCORE => literal(p, IDENTIFIER_EXPR),
        STRING_LITERAL => strings::string_expr(p),
        LEFT_PAREN => tuple_expr(p, flavor),
        LEFT_BRACKET => collection_expr(p, flavor),
        LEFT_BRACE if !flavor.stop_at_brace => closure_expr(p),
        IF_KW => if_expr(p, flavor),
        _ => p.expected_node(MISSING_EXPR, context),
    }
}

fn literal(p: &mut Parser<'_>, kind: SyntaxKind) -> NodeId {
    let mut b = LayoutBuilder::new(kind);
    b.push(p.advance());
    b.finish(p)
}

fn tuple_expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    let _ = flavor;
    let mut b = LayoutBuilder::new(TUPLE_EXPR);
    let open_range = p.current_range();
    b.push(p.advance());
    b.push(argument_list(p, RIGHT_PAREN));
    b.push(p.expect_closing(RIGHT_PAREN, open_range, "tuple"));
    b.finish(p)
}

/// `[` begins either an array or a dictionary literal; the prefix is shared,
/// so the decision is made by a speculative scan that is rolled back.
///
/// A colon at bracket depth zero means dictionary, unless it answers an
/// earlier `?` (`[a ? b : c]` is an array of one ternary).
fn collection_expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    let transaction = p.begin();
    p.advance();
    let mut depth = 0u32;
    let mut pending_ternaries = 0u32;
    let is_dictionary = loop {
        match p.peek_kind() {
            EOF => break false,
            QUESTION if depth == 0 => {
                pending_ternaries += 1;
                p.advance();
            }
            COLON if depth == 0 => {
                if pending_ternaries == 0 {
                    break true;
                }
                pending_ternaries -= 1;
                p.advance();
            }
            COMMA | RIGHT_BRACKET if depth == 0 => break false,
            RIGHT_PAREN | RIGHT_BRACE if depth == 0 => break false,
            LEFT_PAREN | LEFT_BRACKET | LEFT_BRACE => {
                depth += 1;
                p.advance();
            }
            RIGHT_PAREN | RIGHT_BRACKET | RIGHT_BRACE => {
                depth -= 1;
                p.advance();
            }
            _ => {
                p.advance();
            }
        }
    };
    p.rollback(transaction);

    if is_dictionary { dictionary_expr(p, flavor) } else { array_expr(p, flavor) }
}

fn array_expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    let mut b = LayoutBuilder::new(ARRAY_EXPR);
    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(ARRAY_ELEMENT_LIST);
    while !p.at(RIGHT_BRACKET) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&recovery::EXPR_FIRST) {
            list.skip_until(
                p,
                &recovery::EXPR_FIRST.union(&recovery::LIST_RECOVERY),
                "unexpected code in array literal",
            );
            if !p.at_any(&recovery::EXPR_FIRST) && !p.at(COMMA) {
                break;
            }
            continue;
        }
        let mut element = LayoutBuilder::new(ARRAY_ELEMENT);
        element.push(expr(p, flavor.in_parens()));
        element.push(list_comma(p, RIGHT_BRACKET, &recovery::EXPR_FIRST));
        list.push(element.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_BRACKET, open_range, "array literal"));
    b.finish(p)
}

fn dictionary_expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    let mut b = LayoutBuilder::new(DICTIONARY_EXPR);
    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(DICTIONARY_ELEMENT_LIST);

    if p.at(COLON) && p.peek_kind2() == RIGHT_BRACKET {
        // `[:]`, the empty dictionary literal.
        let mut element = LayoutBuilder::new(DICTIONARY_ELEMENT);
        let key = p.missing_layout(MISSING_EXPR);
        element.push(key);
        element.push(p.advance());
        let value = p.missing_layout(MISSING_EXPR);
        element.push(value);
        let comma = p.missing(COMMA);
        element.push(comma);
        list.push(element.finish(p));
    } else {
        while !p.at(RIGHT_BRACKET) && !p.at(EOF) {
            if p.at(COMMA) {
                p.error("unexpected ',' separator");
                let id = p.advance();
                list.push_unexpected(id);
                continue;
            }
            if !p.at_any(&recovery::EXPR_FIRST) {
                list.skip_until(
                    p,
                    &recovery::EXPR_FIRST.union(&recovery::LIST_RECOVERY),
                    "unexpected code in dictionary literal",
                );
                if !p.at_any(&recovery::EXPR_FIRST) && !p.at(COMMA) {
                    break;
                }
                continue;
            }
            let mut element = LayoutBuilder::new(DICTIONARY_ELEMENT);
            element.push(expr(p, flavor.in_parens()));
            element.push(p.expect(COLON));
            element.push(next_operand_or_expr(p, flavor, "in dictionary value"));
            element.push(list_comma(p, RIGHT_BRACKET, &recovery::EXPR_FIRST));
            list.push(element.finish(p));
        }
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_BRACKET, open_range, "dictionary literal"));
    b.finish(p)
}

fn next_operand_or_expr(p: &mut Parser<'_>, flavor: Flavor, context: &str) -> NodeId {
    if p.at_any(&recovery::EXPR_FIRST) {
        expr(p, flavor.in_parens())
    } else {
        p.expected_node(MISSING_EXPR, Some(context))
    }
}

/// Shared by calls, subscripts, tuples, and attribute arguments; elements
/// are labeled (`name: value`) or bare expressions.
pub(crate) fn argument_list(p: &mut Parser<'_>, ket: SyntaxKind) -> NodeId {
    let mut list = LayoutBuilder::new(ARGUMENT_LIST);
    while !p.at(ket) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&recovery::EXPR_FIRST) {
            list.skip_until(
                p,
                &recovery::EXPR_FIRST.union(&recovery::LIST_RECOVERY),
                "unexpected code in argument list",
            );
            if !p.at_any(&recovery::EXPR_FIRST) && !p.at(COMMA) {
                break;
            }
            continue;
        }
        let mut argument = LayoutBuilder::new(ARGUMENT);
        if p.at(IDENT) && p.peek_kind2() == COLON {
            argument.push(p.advance());
            argument.push(p.advance());
        } else {
            let label = p.missing(IDENT);
            argument.push(label);
            let colon = p.missing(COLON);
            argument.push(colon);
        }
        argument.push(next_operand_or_expr(p, Flavor::default(), "in argument"));
        argument.push(list_comma(p, ket, &recovery::EXPR_FIRST));
        list.push(argument.finish(p));
    }
    list.finish(p)
}

pub(crate) fn closure_expr(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(CLOSURE_EXPR);
    let open_range = p.current_range();
    b.push(p.expect(LEFT_BRACE));
    b.push(closure_signature_opt(p));
    let mut items = LayoutBuilder::new(CODE_BLOCK_ITEM_LIST);
    stmts::code_block_items(p, &mut items);
    b.push(items.finish(p));
    b.push(p.expect_closing(RIGHT_BRACE, open_range, "closure"));
    b.finish(p)
}

/// A signature is only present when a parameter list followed by `in` can be
/// parsed; otherwise the speculation is rolled back and the brace directly
/// opens the body.
fn closure_signature_opt(p: &mut Parser<'_>) -> NodeId {
    const CLOSURE_PARAM_FIRST: SyntaxSet = SyntaxSet::new([IDENT, UNDERSCORE]);

    if !p.at(IDENT) && !p.at(UNDERSCORE) && !p.at(IN_KW) {
        return p.missing_layout(CLOSURE_SIGNATURE);
    }

    let transaction = p.begin();
    let mut signature = LayoutBuilder::new(CLOSURE_SIGNATURE);
    let mut params = LayoutBuilder::new(CLOSURE_PARAMETER_LIST);
    while p.at(IDENT) || p.at(UNDERSCORE) {
        let mut param = LayoutBuilder::new(CLOSURE_PARAMETER);
        param.push(p.advance());
        if p.at(COLON) {
            param.push(p.advance());
            param.push(super::types::type_(p, None));
        } else {
            param.push(p.missing(COLON));
            let ty = p.missing_layout(MISSING_TYPE);
            param.push(ty);
        }
        param.push(list_comma(p, IN_KW, &CLOSURE_PARAM_FIRST));
        params.push(param.finish(p));
    }
    signature.push(params.finish(p));
    if p.at(IN_KW) {
        signature.push(p.advance());
        let signature = signature.finish(p);
        transaction.commit();
        signature
    } else {
        p.rollback(transaction);
        // The builders above allocated speculative nodes; they are simply
        // unreachable now.
        drop(signature);
        p.missing_layout(CLOSURE_SIGNATURE)
    }
}

pub(crate) fn closure_parameter(p: &mut Parser<'_>) -> NodeId {
    const CLOSURE_PARAM_FIRST: SyntaxSet = SyntaxSet::new([IDENT, UNDERSCORE]);

    let mut b = LayoutBuilder::new(CLOSURE_PARAMETER);
    b.push(p.expect(IDENT));
    if p.at(COLON) {
        b.push(p.advance());
        b.push(super::types::type_(p, Some("of closure parameter")));
    } else {
        b.push(p.missing(COLON));
        let ty = p.missing_layout(MISSING_TYPE);
        b.push(ty);
    }
    b.push(list_comma(p, IN_KW, &CLOSURE_PARAM_FIRST));
    b.finish(p)
}

pub(crate) fn if_expr(p: &mut Parser<'_>, flavor: Flavor) -> NodeId {
    let mut b = LayoutBuilder::new(IF_EXPR);
    b.push(p.expect(IF_KW));
    b.push(expr_ctx(p, flavor.condition(), Some("in 'if' condition")));
    if p.at(LEFT_BRACE) {
        b.push(stmts::code_block(p));
    } else {
        p.error("expected '{' after 'if' condition");
        let body = p.missing_layout(CODE_BLOCK);
        b.push(body);
    }
    if p.at(ELSE_KW) {
        b.push(p.advance());
        if p.at(IF_KW) {
            b.push(if_expr(p, flavor));
        } else if p.at(LEFT_BRACE) {
            b.push(stmts::code_block(p));
        } else {
            p.error("expected '{' or 'if' after 'else'");
            let body = p.missing_layout(CODE_BLOCK);
            b.push(body);
        }
    } else {
        let else_kw = p.missing(ELSE_KW);
        b.push(else_kw);
        let body = p.missing_layout(MISSING);
        b.push(body);
    }
    b.finish(p)
}
