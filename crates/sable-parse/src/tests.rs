use expect_test::expect;
use sable_errors::{SourceEdit, TextRange, apply_fix_its};
use sable_syntax::SyntaxKind::*;

use crate::Parse;

const ENTRY_POINTS: &[(&str, fn(&str) -> Parse)] = &[
    ("source-file", crate::source_file),
    ("declaration", crate::declaration),
    ("expression", crate::expression),
    ("statement", crate::statement),
    ("pattern", crate::pattern),
    ("type", crate::type_),
    ("code-block", crate::code_block),
    ("code-block-item", crate::code_block_item),
    ("member-block", crate::member_block),
    ("accessor-block", crate::accessor_block),
    ("accessor-declaration", crate::accessor_declaration),
    ("attribute", crate::attribute),
    ("availability-macro-definition", crate::availability_macro_definition),
    ("version-tuple", crate::version_tuple),
    ("function-parameter", crate::function_parameter),
    ("enum-case-parameter", crate::enum_case_parameter),
    ("generic-parameter-clause", crate::generic_parameter_clause),
    ("closure-parameter", crate::closure_parameter),
    ("catch-clause", crate::catch_clause),
    ("switch-case", crate::switch_case),
];

fn assert_round_trip(parse: &Parse, text: &str) {
    assert_eq!(parse.tree().root().text(), text, "reconstruction is not byte-identical");
}

#[test]
fn round_trip_well_formed() {
    let inputs = [
        "func main() { let x = 1 }",
        "import core\n\nfunc add(a: Int, b: Int) -> Int { return a + b }\n",
        "struct Point { var x: Int\n var y: Int }",
        "enum Direction { case north\n case south(distance: Int) }",
        "// leading comment\nfunc f() { } // trailing\n",
        "let xs = [1, 2, 3]\nlet m = [\"k\": 1]\nlet e = [:]\n",
        "let s = \"hello \\(name) and \\(1 + 2)\"",
        "var observed: Int { get { return 1 } set { } }",
        "func g<T: Comparable>(x: T) async throws -> T { return x }",
        "do { try f() } catch e where e != nil { } catch { }",
        "switch v { case 1: f()\n case (a, b): g()\n default: h() }",
        "for item in items { if item { continue } else { break } }",
        "let run = f(x: 1) { a in a }\n",
        "let t: (Int, [Int: Bool?]) async -> [Int] = make()",
        "@available(platform: 1) func f() { }",
    ];
    for text in inputs {
        let parse = crate::source_file(text);
        assert_round_trip(&parse, text);
        assert_eq!(parse.diagnostics(), &[], "unexpected diagnostics for {text:?}");
    }
}

#[test]
fn round_trip_malformed() {
    let inputs = [
        "",
        "func f(, {",
        "let x = ",
        "a ? b :",
        "\"abc",
        "\"\"\"\nabc",
        "let x = [1, 2,, 3]",
        "func }{ ((",
        "/* unterminated",
        "let\u{00A0}x = 1",
        "case case case",
        "struct S { func }",
        "x + * y",
        "@ @ @",
        "#\"raw",
        "f(a: , b: 2",
    ];
    for text in inputs {
        let parse = crate::source_file(text);
        assert_round_trip(&parse, text);
        for diagnostic in parse.diagnostics() {
            assert!(
                u32::from(diagnostic.range().end()) as usize <= text.len(),
                "diagnostic out of bounds for {text:?}"
            );
        }
    }
}

#[test]
fn totality_over_all_entry_points() {
    let inputs = [
        "", " ", "\n", "\"abc", "\"\"\"", "(((", ")))", "{", "}", "?", "#", "\0", "let", "func",
        "a b c", "@", "1.2.3", "<#thing#>", "\\", "// only a comment", "/*",
    ];
    for (name, entry) in ENTRY_POINTS {
        for text in inputs {
            let parse = entry(text);
            assert_round_trip(&parse, text);
            for diagnostic in parse.diagnostics() {
                assert!(
                    u32::from(diagnostic.range().end()) as usize <= text.len(),
                    "diagnostic out of bounds for entry {name} on {text:?}"
                );
            }
        }
    }
}

#[test]
fn ternary_recovery() {
    let text = "a ? b :";
    let parse = crate::expression(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.message(), "expected expression after ternary operator");
    assert_eq!(diagnostic.fix_its().len(), 1);
    assert_eq!(diagnostic.fix_its()[0].message(), "insert expression");

    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "a ? b : <#expression#>");

    let reparsed = crate::expression(&fixed);
    assert!(
        reparsed
            .diagnostics()
            .iter()
            .all(|d| d.message() != "expected expression after ternary operator")
    );
}

#[test]
fn unterminated_string_recovery() {
    let text = "\"abc";
    let parse = crate::expression(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.message(), "unterminated string literal");
    assert_eq!(diagnostic.notes().len(), 1);
    assert_eq!(diagnostic.notes()[0].range(), TextRange::new(0.into(), 1.into()));

    let root = parse.tree().root();
    assert_eq!(root.kind(), STRING_EXPR);
    assert!(root.slot_named("close_quote").unwrap().is_missing());

    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "\"abc\"");
    assert_eq!(crate::expression(&fixed).diagnostics(), &[]);
}

#[test]
fn insufficient_indentation_in_multiline_string() {
    let text = "\"\"\"\n  line\n   \"\"\"";
    let parse = crate::expression(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.message(), "insufficient indentation of line in multi-line string literal");

    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "\"\"\"\n   line\n   \"\"\"");
    assert_eq!(crate::expression(&fixed).diagnostics(), &[]);
}

#[test]
fn escaped_newline_on_last_line_is_rejected() {
    let text = "\"\"\"\nabc\\\n\"\"\"";
    let parse = crate::expression(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(
        diagnostic.message(),
        "escaped newline at the last line of a multi-line string literal"
    );
    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "\"\"\"\nabc\n\"\"\"");
    assert_eq!(crate::expression(&fixed).diagnostics(), &[]);
}

#[test]
fn effect_keyword_after_arrow_is_reordered() {
    let text = "() -> async Int";
    let parse = crate::type_(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.message(), "'async' must precede '->'");
    assert_eq!(diagnostic.fix_its()[0].message(), "move 'async' in front of '->'");

    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "() async -> Int");
    assert_eq!(crate::type_(&fixed).diagnostics(), &[]);
}

#[test]
fn missing_closing_delimiter_notes_the_opening() {
    let text = "(x";
    let parse = crate::expression(text);
    assert_round_trip(&parse, text);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.message(), "expected ')' to end tuple");
    assert_eq!(diagnostic.notes()[0].message(), "to match this opening '('");
    assert_eq!(diagnostic.notes()[0].range(), TextRange::new(0.into(), 1.into()));

    let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
    assert_eq!(fixed, "(x)");
}

#[test]
fn fix_its_do_not_reintroduce_their_diagnostic() {
    let cases: &[(&str, fn(&str) -> Parse)] = &[
        ("a ? b :", crate::expression),
        ("\"abc", crate::expression),
        ("(x", crate::expression),
        ("[1, 2", crate::expression),
        ("() -> async Int", crate::type_),
        ("() -> throws Int", crate::type_),
        ("\"\"\"\n  line\n   \"\"\"", crate::expression),
        ("func f(a Int) { }", crate::declaration),
    ];
    for (text, entry) in cases {
        let parse = entry(text);
        for diagnostic in parse.diagnostics() {
            if diagnostic.fix_its().len() != 1 {
                continue;
            }
            let fixed = apply_fix_its(text, [&diagnostic.fix_its()[0]]);
            let reparsed = entry(&fixed);
            assert!(
                reparsed.diagnostics().iter().all(|d| d.message() != diagnostic.message()),
                "fix-it for {:?} on {text:?} reintroduced the diagnostic (fixed: {fixed:?})",
                diagnostic.message(),
            );
        }
    }
}

#[test]
fn independent_fix_its_apply_jointly() {
    let text = "let a = (1\nlet b = [2, 3";
    let parse = crate::source_file(text);
    assert_round_trip(&parse, text);

    let fix_its: Vec<_> = parse
        .diagnostics()
        .iter()
        .filter(|d| d.fix_its().len() == 1)
        .map(|d| &d.fix_its()[0])
        .collect();
    assert_eq!(fix_its.len(), 2);

    let fixed = apply_fix_its(text, fix_its);
    assert_eq!(fixed, "let a = (1)\nlet b = [2, 3]");
    assert_eq!(crate::source_file(&fixed).diagnostics(), &[]);
}

#[test]
fn incremental_reuse_preserves_untouched_items() {
    let text = "func a() { }\nfunc b() { }\nfunc c() { }\n";
    let parse = crate::source_file(text);
    assert_eq!(parse.diagnostics(), &[]);

    // Rename `b` to `bb`.
    let edit = SourceEdit::replace(TextRange::new(18.into(), 19.into()), "bb");
    let reparsed = crate::reparse(&parse, &edit);

    let new_text = "func a() { }\nfunc bb() { }\nfunc c() { }\n";
    assert_eq!(reparsed.text(), new_text);
    assert_round_trip(&reparsed, new_text);
    assert_eq!(reparsed.diagnostics(), &[]);

    let old_items: Vec<_> = parse.tree().root().slot(0).unwrap().children_in_order().collect();
    let new_items: Vec<_> = reparsed.tree().root().slot(0).unwrap().children_in_order().collect();
    assert_eq!(old_items.len(), 3);
    assert_eq!(new_items.len(), 3);

    // Identity, not mere structural equality: the siblings were adopted.
    assert!(new_items[0].same_node(old_items[0]));
    assert!(new_items[2].same_node(old_items[2]));
    assert!(!new_items[1].same_node(old_items[1]));
    assert!(new_items[0].structural_eq(old_items[0]));
}

#[test]
fn incremental_reuse_carries_diagnostics() {
    let text = "func a() { let x = \"oops\\q\" }\nfunc b() { }\n";
    let parse = crate::source_file(text);
    assert_eq!(parse.diagnostics().len(), 1);

    // Append a new declaration at the end; both old items are reusable.
    let end = text.len() as u32;
    let edit = SourceEdit::insert(end.into(), "func c() { }\n");
    let reparsed = crate::reparse(&parse, &edit);

    assert_eq!(reparsed.diagnostics().len(), 1);
    assert_eq!(
        reparsed.diagnostics()[0].message(),
        "invalid escape sequence in literal"
    );
    assert_round_trip(&reparsed, &format!("{text}func c() {{ }}\n"));
}

#[test]
fn sequence_expressions_stay_flat() {
    let parse = crate::expression("a + b * c - d");
    assert_eq!(parse.diagnostics(), &[]);
    let root = parse.tree().root();
    assert_eq!(root.kind(), SEQUENCE_EXPR);
    let kinds: Vec<_> = root.children().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            IDENTIFIER_EXPR,
            BINARY_OPERATOR_EXPR,
            IDENTIFIER_EXPR,
            BINARY_OPERATOR_EXPR,
            IDENTIFIER_EXPR,
            BINARY_OPERATOR_EXPR,
            IDENTIFIER_EXPR,
        ]
    );
}

#[test]
fn chained_ternaries_are_sequence_elements() {
    let parse = crate::expression("a ? b : c ? d : e");
    assert_eq!(parse.diagnostics(), &[]);
    let root = parse.tree().root();
    assert_eq!(root.kind(), SEQUENCE_EXPR);
    let kinds: Vec<_> = root.children().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            IDENTIFIER_EXPR,
            UNRESOLVED_TERNARY_EXPR,
            IDENTIFIER_EXPR,
            UNRESOLVED_TERNARY_EXPR,
            IDENTIFIER_EXPR,
        ]
    );
}

#[test]
fn collection_literals_disambiguate_by_lookahead() {
    let array = crate::expression("[1, 2]");
    assert_eq!(array.tree().root().kind(), ARRAY_EXPR);
    assert_eq!(array.diagnostics(), &[]);

    let dictionary = crate::expression("[1: 2, 3: 4]");
    assert_eq!(dictionary.tree().root().kind(), DICTIONARY_EXPR);
    assert_eq!(dictionary.diagnostics(), &[]);

    let empty = crate::expression("[:]");
    assert_eq!(empty.tree().root().kind(), DICTIONARY_EXPR);
    assert_eq!(empty.diagnostics(), &[]);
    assert_round_trip(&empty, "[:]");
}

#[test]
fn closure_signature_is_speculative() {
    let with_signature = crate::expression("{ a, b in a }");
    assert_eq!(with_signature.diagnostics(), &[]);
    let root = with_signature.tree().root();
    assert_eq!(root.kind(), CLOSURE_EXPR);
    let signature = root.slot_named("signature").unwrap();
    assert!(signature.slot_named("in_keyword").unwrap().is_present());

    let without_signature = crate::expression("{ x }");
    assert_eq!(without_signature.diagnostics(), &[]);
    let root = without_signature.tree().root();
    let signature = root.slot_named("signature").unwrap();
    assert!(signature.slot_named("in_keyword").unwrap().is_missing());
}

#[test]
fn trailing_closure_without_parentheses() {
    let parse = crate::expression("f { x in x }");
    assert_eq!(parse.diagnostics(), &[]);
    let root = parse.tree().root();
    assert_eq!(root.kind(), CALL_EXPR);
    assert!(root.slot_named("left_paren").unwrap().is_missing());
    assert_eq!(root.slot_named("trailing_closure").unwrap().kind(), CLOSURE_EXPR);
}

#[test]
fn conditional_expression_as_value() {
    let parse = crate::source_file("let x = if c { 1 } else { 2 }");
    assert_eq!(parse.diagnostics(), &[]);

    let tried = crate::expression("try if c { 1 } else { 2 }");
    assert_eq!(tried.diagnostics(), &[]);
    assert_eq!(tried.tree().root().kind(), TRY_EXPR);
}

#[test]
fn interpolation_reenters_the_expression_parser() {
    let text = "\"a \\(1 + 2) b\"";
    let parse = crate::expression(text);
    assert_eq!(parse.diagnostics(), &[]);
    assert_round_trip(&parse, text);

    let root = parse.tree().root();
    assert_eq!(root.kind(), STRING_EXPR);
    let segments: Vec<_> = root.slot_named("segments").unwrap().children().collect();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind(), STRING_SEGMENT);
    assert_eq!(segments[1].kind(), EXPRESSION_SEGMENT);
    assert_eq!(segments[2].kind(), STRING_SEGMENT);
    assert_eq!(segments[1].slot_named("expression").unwrap().kind(), SEQUENCE_EXPR);
}

#[test]
fn interpolation_diagnostics_use_original_coordinates() {
    let text = "let s = \"a \\(f(] b\"";
    let parse = crate::source_file(text);
    assert_round_trip(&parse, text);
    assert!(!parse.diagnostics().is_empty());
    for diagnostic in parse.diagnostics() {
        assert!(u32::from(diagnostic.range().end()) as usize <= text.len());
        assert!(u32::from(diagnostic.range().start()) >= 11);
    }
}

#[test]
fn bare_accessor_block_is_an_implicit_getter() {
    let parse = crate::source_file("var x: Int { return 1 }");
    assert_eq!(parse.diagnostics(), &[]);

    let explicit = crate::accessor_block("{ get { return 1 } set { } }");
    assert_eq!(explicit.diagnostics(), &[]);
    let accessors: Vec<_> =
        explicit.tree().root().slot_named("accessors").unwrap().children().collect();
    assert_eq!(accessors.len(), 2);
    assert_eq!(accessors[0].slot_named("accessor_keyword").unwrap().kind(), GET_KW);
    assert_eq!(accessors[1].slot_named("accessor_keyword").unwrap().kind(), SET_KW);
}

#[test]
fn version_tuple_splits_float_tokens() {
    let parse = crate::version_tuple("1.2.3");
    assert_eq!(parse.diagnostics(), &[]);
    assert_round_trip(&parse, "1.2.3");
    let dump = parse.debug_dump();
    expect![[r#"
        VERSION_TUPLE
          INT_NUMBER "1"
          DOT "."
          INT_NUMBER "2"
          DOT "."
          INT_NUMBER "3"
        ---
    "#]]
    .assert_eq(&dump);

    let partial = crate::version_tuple("4");
    assert_eq!(partial.diagnostics(), &[]);
    assert_round_trip(&partial, "4");
}

#[test]
fn remainder_is_drained_into_the_root() {
    let text = "Int garbage";
    let parse = crate::type_(text);
    assert_round_trip(&parse, text);
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(parse.diagnostics()[0].message(), "unexpected code after type");
}

#[test]
fn tree_shape_is_total_for_simple_expression() {
    let parse = crate::expression("x");
    assert_eq!(parse.diagnostics(), &[]);
    expect![[r#"
        IDENTIFIER_EXPR
          IDENT "x"
        ---
    "#]]
    .assert_eq(&parse.debug_dump());
}

#[test]
fn every_required_slot_is_populated() {
    // Even for garbage, layouts keep their full arity with missing
    // placeholders in unparsed slots.
    let parse = crate::declaration("func");
    let root = parse.tree().root();
    assert_eq!(root.kind(), FUNCTION_DECL);
    assert_eq!(root.slot_count(), root.slot_infos().unwrap().len());
    assert!(root.slot_named("name").unwrap().is_missing());
    assert!(root.slot_named("body").is_some());
    assert_round_trip(&parse, "func");
}

#[test]
fn switch_cases_and_catch_clauses() {
    let parse = crate::source_file("switch v { case 1 where x: f()\n default: g() }");
    assert_eq!(parse.diagnostics(), &[]);

    let clause = crate::catch_clause("catch (a, b) where a { }");
    assert_eq!(clause.diagnostics(), &[]);
    assert_eq!(clause.tree().root().kind(), CATCH_CLAUSE);

    let case = crate::switch_case("case let x: use(x)");
    assert_eq!(case.diagnostics(), &[]);
}
