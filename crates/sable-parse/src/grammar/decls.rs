use sable_errors::{Diagnostic, TextRange};
use sable_syntax::NodeId;
use sable_syntax::SyntaxKind::*;
use sable_syntax::SyntaxSet;

use super::{exprs, list_comma, opt_token, patterns, stmts, types};
use crate::parser::{LayoutBuilder, Parser};
use crate::recovery;

pub(crate) fn source_file(p: &mut Parser<'_>) -> NodeId {
    let mut file = LayoutBuilder::new(SOURCE_FILE);
    let mut items = LayoutBuilder::new(CODE_BLOCK_ITEM_LIST);

    while !p.at(EOF) {
        if let Some(reused) = crate::incremental::try_reuse(p) {
            items.push(reused);
            continue;
        }
        if !p.at_any(&recovery::ITEM_FIRST) {
            items.skip_until(p, &recovery::ITEM_FIRST, "unexpected code at top level");
            continue;
        }
        items.push(code_block_item(p));
    }

    let items = items.finish(p);
    file.push(items);
    file.push(p.expect(EOF));
    file.finish(p)
}

pub(crate) fn code_block_item(p: &mut Parser<'_>) -> NodeId {
    let mut item = LayoutBuilder::new(CODE_BLOCK_ITEM);
    let node = if p.at(AT) || p.at_any(&recovery::DECL_FIRST) {
        declaration(p)
    } else if p.at_any(&recovery::STMT_FIRST) {
        stmts::statement(p)
    } else {
        exprs::expr(p, crate::parser::Flavor::default())
    };
    item.push(node);
    item.push(opt_token(p, SEMICOLON));
    item.finish(p)
}

pub(crate) fn declaration(p: &mut Parser<'_>) -> NodeId {
    let attributed = p.at(AT);
    let attributes = attribute_list(p);
    match p.peek_kind() {
        FUNC_KW => function_decl(p, attributes),
        LET_KW | VAR_KW => variable_decl(p, attributes),
        STRUCT_KW => struct_decl(p, attributes),
        ENUM_KW => enum_decl(p, attributes),
        CASE_KW => enum_case_decl(p, attributes),
        IMPORT_KW => import_decl(p, attributes),
        _ => {
            if attributed {
                p.error("expected declaration after attribute");
            } else {
                p.error("expected declaration");
            }
            let mut missing = LayoutBuilder::new(MISSING_DECL);
            if attributed {
                missing.push_unexpected(attributes);
            }
            let placeholder = p.missing(IDENT);
            missing.push(placeholder);
            missing.finish(p)
        }
    }
}

pub(crate) fn attribute_list(p: &mut Parser<'_>) -> NodeId {
    let mut list = LayoutBuilder::new(ATTRIBUTE_LIST);
    while p.at(AT) {
        list.push(attribute(p));
    }
    list.finish(p)
}

pub(crate) fn attribute(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(ATTRIBUTE);
    b.push(p.expect(AT));
    b.push(p.expect(IDENT));
    if p.at(LEFT_PAREN) {
        let open_range = p.current_range();
        b.push(p.advance());
        b.push(exprs::argument_list(p, RIGHT_PAREN));
        b.push(p.expect_closing(RIGHT_PAREN, open_range, "attribute arguments"));
    } else {
        b.push(p.missing(LEFT_PAREN));
        let empty = p.missing_layout(ARGUMENT_LIST);
        b.push(empty);
        b.push(p.missing(RIGHT_PAREN));
    }
    b.finish(p)
}

fn function_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(FUNCTION_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(p.expect(IDENT));
    b.push(generic_parameter_clause_opt(p));
    b.push(function_signature(p));
    if p.at(LEFT_BRACE) {
        b.push(stmts::code_block(p));
    } else {
        p.push_diagnostic(Diagnostic::error(
            "expected function body",
            TextRange::empty(p.insertion_offset()),
        ));
        let body = p.missing_layout(CODE_BLOCK);
        b.push(body);
    }
    b.finish(p)
}

fn function_signature(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(FUNCTION_SIGNATURE);
    b.push(parameter_clause(p));
    b.push(types::effect_specifiers_opt(p));
    b.push(return_clause_opt(p));
    b.finish(p)
}

fn parameter_clause(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(PARAMETER_CLAUSE);
    if !p.at(LEFT_PAREN) {
        b.push(p.expect(LEFT_PAREN));
        let empty = p.missing_layout(FUNCTION_PARAMETER_LIST);
        b.push(empty);
        b.push(p.missing(RIGHT_PAREN));
        return b.finish(p);
    }

    const PARAM_FIRST: SyntaxSet = SyntaxSet::new([IDENT, UNDERSCORE, AT]);

    let open_range = p.current_range();
    b.push(p.advance());
    let mut list = LayoutBuilder::new(FUNCTION_PARAMETER_LIST);
    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at_any(&PARAM_FIRST) {
            list.skip_until(
                p,
                &PARAM_FIRST.union(&recovery::LIST_RECOVERY),
                "unexpected code in parameter list",
            );
            if p.at_any(&recovery::LIST_RECOVERY) && !p.at(COMMA) {
                break;
            }
            continue;
        }
        list.push(function_parameter(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_PAREN, open_range, "parameter list"));
    b.finish(p)
}

pub(crate) fn function_parameter(p: &mut Parser<'_>) -> NodeId {
    const PARAM_FIRST: SyntaxSet = SyntaxSet::new([IDENT, UNDERSCORE, AT]);

    let mut b = LayoutBuilder::new(FUNCTION_PARAMETER);
    let first = if p.at(IDENT) || p.at(UNDERSCORE) { p.advance() } else { p.expect(IDENT) };
    if p.at(IDENT) {
        // Two names: external label plus internal name.
        b.push(first);
        b.push(p.advance());
    } else {
        let label = p.missing(IDENT);
        b.push(label);
        b.push(first);
    }
    b.push(p.expect(COLON));
    b.push(types::type_(p, Some("of parameter")));
    if p.at(EQ) {
        b.push(initializer_clause(p, "in default value"));
    } else {
        let none = p.missing_layout(INITIALIZER_CLAUSE);
        b.push(none);
    }
    b.push(list_comma(p, RIGHT_PAREN, &PARAM_FIRST));
    b.finish(p)
}

fn return_clause_opt(p: &mut Parser<'_>) -> NodeId {
    if !p.at(ARROW) {
        return p.missing_layout(RETURN_CLAUSE);
    }
    let mut b = LayoutBuilder::new(RETURN_CLAUSE);
    let arrow_range = p.current_range();
    b.push(p.advance());
    types::misplaced_effects(p, &mut b, arrow_range);
    b.push(types::type_(p, Some("in return clause")));
    b.finish(p)
}

pub(crate) fn generic_parameter_clause_opt(p: &mut Parser<'_>) -> NodeId {
    if !p.at(LESS) {
        return p.missing_layout(GENERIC_PARAMETER_CLAUSE);
    }
    generic_parameter_clause(p)
}

pub(crate) fn generic_parameter_clause(p: &mut Parser<'_>) -> NodeId {
    const GENERIC_PARAM_FIRST: SyntaxSet = SyntaxSet::new([IDENT]);

    let mut b = LayoutBuilder::new(GENERIC_PARAMETER_CLAUSE);
    let open_range = p.current_range();
    b.push(p.expect(LESS));
    let mut list = LayoutBuilder::new(GENERIC_PARAMETER_LIST);
    while !p.at(GREATER) && !p.at(EOF) {
        if !p.at(IDENT) {
            list.skip_until(
                p,
                &GENERIC_PARAM_FIRST.union(&SyntaxSet::new([GREATER, COMMA, LEFT_PAREN, LEFT_BRACE])),
                "unexpected code in generic parameter list",
            );
            if !p.at(IDENT) && !p.at(COMMA) {
                break;
            }
            if p.at(COMMA) {
                let id = p.advance();
                list.push_unexpected(id);
            }
            continue;
        }
        let mut param = LayoutBuilder::new(GENERIC_PARAMETER);
        param.push(p.advance());
        if p.at(COLON) {
            param.push(p.advance());
            param.push(types::type_(p, Some("in generic constraint")));
        } else {
            param.push(p.missing(COLON));
            let constraint = p.missing_layout(MISSING_TYPE);
            param.push(constraint);
        }
        param.push(list_comma(p, GREATER, &GENERIC_PARAM_FIRST));
        list.push(param.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(GREATER, open_range, "generic parameter list"));
    b.finish(p)
}

fn variable_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(VARIABLE_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(patterns::pattern(p, Some("in variable declaration")));
    let annotated = p.at(COLON);
    if annotated {
        let mut annotation = LayoutBuilder::new(TYPE_ANNOTATION);
        annotation.push(p.advance());
        annotation.push(types::type_(p, Some("in type annotation")));
        b.push(annotation.finish(p));
    } else {
        let none = p.missing_layout(TYPE_ANNOTATION);
        b.push(none);
    }
    let initialized = p.at(EQ);
    if initialized {
        b.push(initializer_clause(p, "in variable"));
    } else {
        let none = p.missing_layout(INITIALIZER_CLAUSE);
        b.push(none);
    }
    // After `var x: T` a brace always opens accessors (bare blocks count as
    // a getter); otherwise only an explicit `get`/`set` does, so that an
    // initializer's trailing closure is not misread.
    let accessors = p.at(LEFT_BRACE)
        && ((annotated && !initialized) || starts_accessor_block(p));
    if accessors {
        b.push(accessor_block(p));
    } else {
        let none = p.missing_layout(ACCESSOR_BLOCK);
        b.push(none);
    }
    b.finish(p)
}

fn initializer_clause(p: &mut Parser<'_>, context: &str) -> NodeId {
    let mut b = LayoutBuilder::new(INITIALIZER_CLAUSE);
    b.push(p.expect(EQ));
    b.push(exprs::expr_ctx(p, crate::parser::Flavor::default(), Some(context)));
    b.finish(p)
}

/// `{` opens an accessor block only when it is followed by `get`, `set`, or
/// an attribute; otherwise it is a trailing closure or block of some kind.
fn starts_accessor_block(p: &Parser<'_>) -> bool {
    matches!(p.nth_token_text(1), "get" | "set") || p.peek_kind2() == AT
}

pub(crate) fn accessor_block(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(ACCESSOR_BLOCK);
    let open_range = p.current_range();
    b.push(p.expect(LEFT_BRACE));
    let mut list = LayoutBuilder::new(ACCESSOR_LIST);
    if p.at_contextual("get") || p.at_contextual("set") || p.at(AT) {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            if p.at_contextual("get") || p.at_contextual("set") || p.at(AT) {
                list.push(accessor_decl(p));
            } else {
                list.skip_until(
                    p,
                    &SyntaxSet::new([RIGHT_BRACE]),
                    "expected 'get' or 'set' in accessor block",
                );
            }
        }
    } else if !p.at(RIGHT_BRACE) && !p.at(EOF) {
        // Bare block: the body is an implicit getter.
        let mut getter = LayoutBuilder::new(ACCESSOR_DECL);
        let attributes = p.missing_layout(ATTRIBUTE_LIST);
        getter.push(attributes);
        let keyword = p.missing(GET_KW);
        getter.push(keyword);
        let mut body = LayoutBuilder::new(CODE_BLOCK);
        let lbrace = p.missing(LEFT_BRACE);
        body.push(lbrace);
        let mut items = LayoutBuilder::new(CODE_BLOCK_ITEM_LIST);
        stmts::code_block_items(p, &mut items);
        body.push(items.finish(p));
        let rbrace = p.missing(RIGHT_BRACE);
        body.push(rbrace);
        getter.push(body.finish(p));
        list.push(getter.finish(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_BRACE, open_range, "accessor block"));
    b.finish(p)
}

pub(crate) fn accessor_decl(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(ACCESSOR_DECL);
    b.push(attribute_list(p));
    if p.at_contextual("get") {
        b.push(p.advance_remapped(GET_KW));
    } else if p.at_contextual("set") {
        b.push(p.advance_remapped(SET_KW));
    } else {
        p.error("expected 'get' or 'set' in accessor");
        b.push(p.missing(GET_KW));
    }
    if p.at(LEFT_BRACE) {
        b.push(stmts::code_block(p));
    } else {
        let none = p.missing_layout(CODE_BLOCK);
        b.push(none);
    }
    b.finish(p)
}

fn struct_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(STRUCT_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(p.expect(IDENT));
    b.push(generic_parameter_clause_opt(p));
    b.push(member_block(p));
    b.finish(p)
}

fn enum_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(ENUM_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(p.expect(IDENT));
    b.push(generic_parameter_clause_opt(p));
    b.push(member_block(p));
    b.finish(p)
}

pub(crate) fn member_block(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(MEMBER_BLOCK);
    let open_range = p.current_range();
    b.push(p.expect(LEFT_BRACE));
    let mut list = LayoutBuilder::new(MEMBER_BLOCK_ITEM_LIST);
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.at(AT) || p.at_any(&recovery::DECL_FIRST) {
            list.push(declaration(p));
        } else {
            list.skip_until(p, &recovery::MEMBER_RECOVERY, "expected declaration in member block");
        }
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_BRACE, open_range, "member block"));
    b.finish(p)
}

fn enum_case_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(ENUM_CASE_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(p.expect(IDENT));
    if p.at(LEFT_PAREN) {
        b.push(enum_case_parameter_clause(p));
    } else {
        let none = p.missing_layout(ENUM_CASE_PARAMETER_CLAUSE);
        b.push(none);
    }
    b.finish(p)
}

fn enum_case_parameter_clause(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(ENUM_CASE_PARAMETER_CLAUSE);
    let open_range = p.current_range();
    b.push(p.expect(LEFT_PAREN));
    let mut list = LayoutBuilder::new(ENUM_CASE_PARAMETER_LIST);
    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        if p.at(COMMA) {
            p.error("unexpected ',' separator");
            let id = p.advance();
            list.push_unexpected(id);
            continue;
        }
        if !p.at(IDENT) && !p.at_any(&recovery::TYPE_FIRST) {
            list.skip_until(
                p,
                &recovery::TYPE_FIRST.union(&recovery::LIST_RECOVERY),
                "unexpected code in enum case parameter list",
            );
            if !p.at(COMMA) && !p.at(IDENT) && !p.at_any(&recovery::TYPE_FIRST) {
                break;
            }
            continue;
        }
        list.push(enum_case_parameter(p));
    }
    b.push(list.finish(p));
    b.push(p.expect_closing(RIGHT_PAREN, open_range, "enum case parameter list"));
    b.finish(p)
}

pub(crate) fn enum_case_parameter(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(ENUM_CASE_PARAMETER);
    if p.at(IDENT) && p.peek_kind2() == COLON {
        b.push(p.advance());
        b.push(p.advance());
    } else {
        let label = p.missing(IDENT);
        b.push(label);
        let colon = p.missing(COLON);
        b.push(colon);
    }
    b.push(types::type_(p, Some("of enum case parameter")));
    b.push(list_comma(p, RIGHT_PAREN, &recovery::TYPE_FIRST));
    b.finish(p)
}

fn import_decl(p: &mut Parser<'_>, attributes: NodeId) -> NodeId {
    let mut b = LayoutBuilder::new(IMPORT_DECL);
    b.push(attributes);
    b.push(p.advance());
    b.push(p.expect(IDENT));
    b.finish(p)
}

pub(crate) fn availability_macro_definition(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(AVAILABILITY_MACRO_DEFINITION);
    b.push(p.expect(IDENT));
    b.push(version_tuple(p));
    b.finish(p)
}

pub(crate) fn version_tuple(p: &mut Parser<'_>) -> NodeId {
    let mut b = LayoutBuilder::new(VERSION_TUPLE);

    // `1.2` lexes as a float; re-cut it into major/dot/minor.
    if p.at(FLOAT_NUMBER) {
        let (major, dot, minor) = p.split_float_token();
        b.push(major);
        b.push(dot);
        b.push(minor);
    } else {
        b.push(p.expect(INT_NUMBER));
        if p.at(DOT) && p.peek_kind2() == INT_NUMBER {
            b.push(p.advance());
            b.push(p.advance());
        } else {
            let dot = p.missing(DOT);
            b.push(dot);
            let minor = p.missing(INT_NUMBER);
            b.push(minor);
        }
    }

    if p.at(DOT) && p.peek_kind2() == INT_NUMBER {
        b.push(p.advance());
        b.push(p.advance());
    } else {
        let dot = p.missing(DOT);
        b.push(dot);
        let patch = p.missing(INT_NUMBER);
        b.push(patch);
    }
    b.finish(p)
}
