use sable_errors::{Diagnostic, FixIt, SourceEdit, TextRange};
use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::*;

use super::list_comma;
use crate::parser::{LayoutBuilder, Parser};
use crate::recovery;

pub(crate) fn type_(p: &mut Parser<'_>, context: Option<&str>) -> NodeId {
    let node = primary_type(p, context);
    let node = suffixed_type(p, node);

    // `(T) async throws -> U`; any of the three tokens commits to a
    // function type.
    if matches!(p.peek_kind(), ARROW | ASYNC_KW | THROWS_KW) {
        return function_type(p, node);
    }
    node
}

fn primary_type(p: &mut Parser<'_>, context: Option<&str>) -> NodeId {
    match p.peek_kind() {
        IDENT => {
            let mut b = LayoutBuilder::new(IDENTIFIER_TYPE);
            b.push(p.advance());
            b.push(generic_argument_clause_opt(p));
            b.finish(p)
        }
        LEFT_BRACKET => bracketed_type(p),
        LEFT_PAREN => tuple_type(p),
        _ => p.expected_node(MISSING_TYPE, context),
    }
}

fn suffixed_type(p: &mut Parser<'_>, mut node: NodeId) -> NodeId {
    loop {
        match p.peek_kind() {
            QUESTION => {
                let mut b = LayoutBuilder::new(OPTIONAL_TYPE);
                b.push(node);
                b.push(p.advance());
                node = b.finish(p);
            }
            DOT => {
                let mut b = LayoutBuilder::new(MEMBER_TYPE);
                b.push(node);
                b.push(p.advance());
                b.push(p.expect(IDENT));
                b.push(generic_argument_clause_opt(p));
                node = b.finish(p);
            }
            _ => return node,
        }
    }
}

/// `[T]` or `[K: V]`.
fn bracketed_type(p: &mut Parser<'_>) -> NodeId {
    let open_range = p.current_range();
    let lbracket = p.advance();
    let first = type_(p, Some("in collection type"));
    if p.at(COLON) {
        let mut b = LayoutBuilder::new(DICTIONARY_TYPE);
        b.push(lbracket);
        b.push(first);
        b.push(p.advance());
        b.push(type_(p, Some("in dictionary value type")));
        b.push(p.expect_closing(RIGHT_BRACKET, open_range, "dictionary type"));
        b.finish(p)
    } else {
        let mut b = LayoutBuilder::new(ARRAY_TYPE);
        b.push(lbracket);
        b.push(first);
        b.push(p.expect_closing(RIGHT_BRACKET, open_range, "array type"));
        b.finish(p)
    }
}

fn tuple_type(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(TUPLE_TYPE);
    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(TUPLE_TYPE_ELEMENT_LIST);
    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&recovery::TYPE_FIRST) {
            list.skip_until(
                p,
                &recovery::TYPE_FIRST.union(&recovery::LIST_RECOVERY),
                "unexpected code in tuple type",
            );
            if !p.at_any(&recovery::TYPE_FIRST) && !p.at(COMMA) {
                break;
            }
            continue;
        }
        let mut element = LayoutBuilder::new(TUPLE_TYPE_ELEMENT);
        element.push(type_(p, None));
        element.push(list_comma(p, RIGHT_PAREN, &recovery::TYPE_FIRST));
        list.push(element.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_PAREN, open_range, "tuple type"));
    b.finish(p)
}

fn function_type(p: &mut Parser<'_>, parameters: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(FUNCTION_TYPE);
    b.push(parameters);
    b.push(effect_specifiers_opt(p));
    let arrow_range = p.current_range();
    let arrow = p.expect(ARROW);
    b.push(arrow);
    misplaced_effects(p, &mut b, arrow_range);
    b.push(type_(p, Some("in function type result")));
    b.finish(p)
}

/// `async`/`throws` in their position before the arrow; absent specifiers
/// are silent missing tokens.
pub(crate) fn effect_specifiers_opt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(EFFECT_SPECIFIERS);
    b.push(super::opt_token(p, ASYNC_KW));
    b.push(super::opt_token(p, THROWS_KW));
    b.finish(p)
}

/// Effect keywords written after the arrow are a recognized ordering
/// mistake: the tokens are kept as unexpected nodes where they appeared and
/// the fix-it moves them in front of the arrow.
pub(crate) fn misplaced_effects(p: &mut Parser<'_>, b: &mut LayoutBuilder, arrow_range: TextRange) {
    while matches!(p.peek_kind(), ASYNC_KW | THROWS_KW) {
        let keyword_range = p.current_range();
        let keyword = p.current_text().to_string();

        // Take one following space with the keyword so the removal does not
        // leave a double blank.
        let mut removal_end = keyword_range.end();
        if p.text()[u32::from(removal_end) as usize..].starts_with(' ') {
            removal_end += sable_errors::TextSize::new(1);
        }

        let id = p.advance();
        b.push_unexpected(id);
        p.push_diagnostic(
            Diagnostic::error(format!("'{keyword}' must precede '->'"), keyword_range).with_fix_it(
                FixIt::new(
                    format!("move '{keyword}' in front of '->'"),
                    vec![
                        SourceEdit::remove(TextRange::new(keyword_range.start(), removal_end)),
                        SourceEdit::insert(arrow_range.start(), format!("{keyword} ")),
                    ],
                ),
            ),
        );
    }
}

pub(crate) fn generic_argument_clause_opt(p: &mut Parser<'_>) -> NodeId {
    if !p.at(LESS) {
        return p.missing_layout(GENERIC_ARGUMENT_CLAUSE);
    }
    let mut b = LayoutBuilder::new(GENERIC_ARGUMENT_CLAUSE);
    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(GENERIC_ARGUMENT_LIST);
    while !p.at(GREATER) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&recovery::TYPE_FIRST) {
            break;
        }
        let mut argument = LayoutBuilder::new(GENERIC_ARGUMENT);
        argument.push(type_(p, None));
        argument.push(list_comma(p, GREATER, &recovery::TYPE_FIRST));
        list.push(argument.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(GREATER, open_range, "generic argument list"));
    b.finish(p)
}
