use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::*;

use super::{decls, exprs, patterns};
use crate::parser::{Flavor, LayoutBuilder, Parser};
use crate::recovery;

pub(crate) fn statement(p: &mut Parser<'_>) -> NodeId {
    match p.peek_kind() {
        RETURN_KW => return_stmt(p),
        WHILE_KW => while_stmt(p),
        FOR_KW => for_stmt(p),
        DO_KW => do_stmt(p),
        SWITCH_KW => switch_stmt(p),
        BREAK_KW => {
            let mut b = LayoutBuilder::new(BREAK_STMT);
            b.push(p.advance());
            b.finish(p)
        }
        CONTINUE_KW => {
            let mut b = LayoutBuilder::new(CONTINUE_STMT);
            b.push(p.advance());
            b.finish(p)
        }
        _ => {
            p.error("expected statement");
            let mut missing = LayoutBuilder::new(MISSING_STMT);
            let placeholder = p.missing(IDENT);
            missing.push(placeholder);
            missing.finish(p)
        }
    }
}

fn return_stmt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(RETURN_STMT);
    b.push(p.advance());
    if p.at_any(&recovery::EXPR_FIRST) {
        b.push(exprs::expr(p, Flavor::default()));
    } else {
        let none = p.missing_layout(MISSING_EXPR);
        b.push(none);
    }
    b.finish(p)
}

fn while_stmt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(WHILE_STMT);
    b.push(p.advance());
    b.push(exprs::expr_ctx(p, Flavor::default().condition(), Some("in 'while' condition")));
    b.push(code_block(p));
    b.finish(p)
}

fn for_stmt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(FOR_STMT);
    b.push(p.advance());
    b.push(patterns::pattern(p, Some("in 'for' statement")));
    b.push(p.expect(IN_KW));
    let flavor = Flavor { stop_at_in: true, ..Flavor::default() }.condition();
    b.push(exprs::expr_ctx(p, flavor, Some("in 'for' sequence")));
    b.push(code_block(p));
    b.finish(p)
}

fn do_stmt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(DO_STMT);
    b.push(p.advance());
    b.push(code_block(p));
    let mut clauses = LayoutBuilder::new(CATCH_CLAUSE_LIST);
    while p.at(CATCH_KW) {
        clauses.push(catch_clause(p));
    }
    b.push(clauses.finish(p));
    b.finish(p)
}

pub(crate) fn catch_clause(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(CATCH_CLAUSE);
    b.push(p.expect(CATCH_KW));
    if p.at_any(&recovery::PATTERN_FIRST) && !p.at(LEFT_BRACE) {
        b.push(patterns::pattern(p, Some("in 'catch' clause")));
    } else {
        let none = p.missing_layout(MISSING_PATTERN);
        b.push(none);
    }
    if p.at(WHERE_KW) {
        b.push(where_clause(p));
    } else {
        let none = p.missing_layout(WHERE_CLAUSE);
        b.push(none);
    }
    b.push(code_block(p));
    b.finish(p)
}

fn where_clause(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(WHERE_CLAUSE);
    b.push(p.expect(WHERE_KW));
    b.push(exprs::expr_ctx(p, Flavor::default().condition(), Some("in 'where' clause")));
    b.finish(p)
}

fn switch_stmt(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(SWITCH_STMT);
    b.push(p.advance());
    b.push(exprs::expr_ctx(p, Flavor::default().condition(), Some("in 'switch' subject")));
    let open_range = p.current_range();
    b.push(p.expect(LEFT_BRACE));
    let mut cases = LayoutBuilder::new(SWITCH_CASE_LIST);
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.at(CASE_KW) || p.at(DEFAULT_KW) {
            cases.push(switch_case(p));
        } else {
            cases.skip_until(
                p,
                &recovery::SWITCH_CASE_RECOVERY,
                "expected 'case' or 'default' in 'switch' statement",
            );
        }
    }
    b.push(cases.finish(p));
    b.push(p.expect_closing(RIGHT_BRACE, open_range, "'switch' statement"));
    b.finish(p)
}

pub(crate) fn switch_case(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(SWITCH_CASE);

    let label = match p.peek_kind() {
        DEFAULT_KW => {
            let mut label = LayoutBuilder::new(SWITCH_DEFAULT_LABEL);
            label.push(p.advance());
            label.push(p.expect(COLON));
            label.finish(p)
        }
        CASE_KW => {
            let mut label = LayoutBuilder::new(SWITCH_CASE_LABEL);
            label.push(p.advance());
            label.push(patterns::pattern(p, Some("in 'case' label")));
            if p.at(WHERE_KW) {
                label.push(where_clause(p));
            } else {
                let none = p.missing_layout(WHERE_CLAUSE);
                label.push(none);
            }
            label.push(p.expect(COLON));
            label.finish(p)
        }
        _ => {
            p.error("expected 'case' or 'default' in 'switch' statement");
            p.missing_layout(SWITCH_CASE_LABEL)
        }
    };
    b.push(label);

    let mut items = LayoutBuilder::new(CODE_BLOCK_ITEM_LIST);
    while !p.at(CASE_KW) && !p.at(DEFAULT_KW) && !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if !p.at_any(&recovery::ITEM_FIRST) {
            items.skip_until(
                p,
                &recovery::ITEM_FIRST.union(&recovery::SWITCH_CASE_RECOVERY),
                "unexpected code in 'switch' case",
            );
            continue;
        }
        items.push(decls::code_block_item(p));
    }
    b.push(items.finish(p));
    b.finish(p)
}

pub(crate) fn code_block(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(CODE_BLOCK);
    let open_range = p.current_range();
    b.push(p.expect(LEFT_BRACE));
    let mut items = LayoutBuilder::new(CODE_BLOCK_ITEM_LIST);
    code_block_items(p, &mut items);
    b.push(items.finish(p));
    b.push(p.expect_closing(RIGHT_BRACE, open_range, "code block"));
    b.finish(p)
}

/// Item loop shared by code blocks and closure bodies.
pub(crate) fn code_block_items(p: &mut Parser<'_>, items: &mut LayoutBuilder) {
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if !p.at_any(&recovery::ITEM_FIRST) {
            items.skip_until(p, &recovery::ITEM_RECOVERY, "unexpected code in code block");
            if p.at(SEMICOLON) {
                let id = p.advance();
                items.push_unexpected(id);
            }
            continue;
        }
        items.push(decls::code_block_item(p));
    }
}
