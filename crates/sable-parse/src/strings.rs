//! Second-pass processing of string literals.
//!
//! The lexer hands over the whole literal as one token; this pass re-cuts it
//! into delimiter tokens and segments, re-enters the expression parser for
//! each interpolation, validates multi-line indentation against the closing
//! delimiter, and checks line-continuation escapes.

use sable_errors::{Diagnostic, FixIt, SourceEdit, TextRange, TextSize};
use sable_syntax::SyntaxKind::*;
use sable_syntax::{NodeId, Trivia};

use crate::grammar::exprs;
use crate::parser::{Flavor, LayoutBuilder, Parser};

pub(crate) fn string_expr(p: &mut Parser<'_>) -> NodeId {
    let token = p.take_string_token();
    let range = token.range;
    let abs = u32::from(range.start()) as usize;
    let literal = &p.text()[range];

    let pounds = literal.bytes().take_while(|&b| b == b'#').count();
    let multiline = literal[pounds..].starts_with("\"\"\"");
    let quote_len = if multiline { 3 } else { 1 };
    let quote_kind = if multiline { MULTILINE_STRING_QUOTE } else { STRING_QUOTE };
    let open_len = pounds + quote_len;

    let close_delimiter: String = "\""
        .repeat(quote_len)
        .chars()
        .chain(std::iter::repeat_n('#', pounds))
        .collect();
    let terminated =
        literal.len() >= open_len + close_delimiter.len() && literal.ends_with(&close_delimiter);

    let content_start = abs + open_len;
    let content_end = abs + literal.len() - if terminated { close_delimiter.len() } else { 0 };
    let content = &p.text()[content_start..content_end];

    if multiline {
        multiline_diagnostics(p, content_start, content, terminated, pounds);
    }

    let mut b = LayoutBuilder::new(STRING_EXPR);

    if pounds > 0 {
        let id = p.arena.push_token(
            STRING_POUNDS,
            TextRange::new(range.start(), offset(abs + pounds)),
            token.leading.clone(),
            Trivia::empty(),
        );
        b.push(id);
    } else {
        let id = p.arena.missing_token(STRING_POUNDS, range.start());
        b.push(id);
    }

    let open_leading = if pounds > 0 { Trivia::empty() } else { token.leading.clone() };
    let open_quote = p.arena.push_token(
        quote_kind,
        TextRange::new(offset(abs + pounds), offset(content_start)),
        open_leading,
        Trivia::empty(),
    );
    b.push(open_quote);

    b.push(segments(p, content_start, content, pounds));

    if terminated {
        let quote_trailing = if pounds > 0 { Trivia::empty() } else { token.trailing.clone() };
        let close_quote = p.arena.push_token(
            quote_kind,
            TextRange::new(offset(content_end), offset(content_end + quote_len)),
            Trivia::empty(),
            quote_trailing,
        );
        b.push(close_quote);
        if pounds > 0 {
            let close_pounds = p.arena.push_token(
                STRING_POUNDS,
                TextRange::new(offset(content_end + quote_len), range.end()),
                Trivia::empty(),
                token.trailing.clone(),
            );
            b.push(close_pounds);
        } else {
            let id = p.arena.missing_token(STRING_POUNDS, range.end());
            b.push(id);
        }
    } else {
        // The unterminated-literal diagnostic was already attached by the
        // lexer, complete with a note at the opening quote and an insertion
        // fix-it; here the closing delimiter just becomes missing.
        let close_quote = p.arena.missing_token(quote_kind, range.end());
        b.push(close_quote);
        let close_pounds = p.arena.missing_token(STRING_POUNDS, range.end());
        b.push(close_pounds);
    }

    b.finish(p)
}

fn offset(abs: usize) -> TextSize {
    TextSize::new(abs as u32)
}

/// Splits content into literal-text segments and interpolation segments,
/// re-entering the expression parser for the latter.
fn segments(p: &mut Parser<'_>, content_start: usize, content: &str, pounds: usize) -> NodeId {
    let mut list = LayoutBuilder::new(STRING_SEGMENT_LIST);
    let mut cursor = 0usize;

    for interpolation in find_interpolations(content, pounds) {
        if interpolation.backslash > cursor {
            let id = p.arena.push_token(
                STRING_SEGMENT,
                TextRange::new(
                    offset(content_start + cursor),
                    offset(content_start + interpolation.backslash),
                ),
                Trivia::empty(),
                Trivia::empty(),
            );
            list.push(id);
        }

        let mut segment = LayoutBuilder::new(EXPRESSION_SEGMENT);
        let backslash_abs = content_start + interpolation.backslash;
        let id = p.arena.push_token(
            BACKSLASH,
            TextRange::new(offset(backslash_abs), offset(backslash_abs + 1)),
            Trivia::empty(),
            Trivia::empty(),
        );
        segment.push(id);
        if pounds > 0 {
            let id = p.arena.push_token(
                STRING_POUNDS,
                TextRange::new(offset(backslash_abs + 1), offset(backslash_abs + 1 + pounds)),
                Trivia::empty(),
                Trivia::empty(),
            );
            segment.push(id);
        } else {
            let id = p.arena.missing_token(STRING_POUNDS, offset(backslash_abs + 1));
            segment.push(id);
        }
        let lparen_abs = content_start + interpolation.lparen;
        let id = p.arena.push_token(
            LEFT_PAREN,
            TextRange::new(offset(lparen_abs), offset(lparen_abs + 1)),
            Trivia::empty(),
            Trivia::empty(),
        );
        segment.push(id);

        let inner_end = match interpolation.rparen {
            Some(rparen) => rparen,
            None => content.len(),
        };
        let inner = TextRange::new(offset(lparen_abs + 1), offset(content_start + inner_end));
        let (expression, leftovers) = p.with_token_slice(inner, |p| {
            let expression = exprs::expr_ctx(p, Flavor::default(), Some("in string interpolation"));
            (expression, drain_interpolation(p))
        });
        segment.push(expression);
        for id in leftovers {
            segment.push_unexpected(id);
        }

        match interpolation.rparen {
            Some(rparen) => {
                let rparen_abs = content_start + rparen;
                let id = p.arena.push_token(
                    RIGHT_PAREN,
                    TextRange::new(offset(rparen_abs), offset(rparen_abs + 1)),
                    Trivia::empty(),
                    Trivia::empty(),
                );
                segment.push(id);
                cursor = rparen + 1;
            }
            None => {
                let id = p.arena.missing_token(RIGHT_PAREN, offset(content_start + inner_end));
                segment.push(id);
                cursor = inner_end;
            }
        }
        list.push(segment.finish(p));
    }

    if cursor < content.len() {
        let id = p.arena.push_token(
            STRING_SEGMENT,
            TextRange::new(offset(content_start + cursor), offset(content_start + content.len())),
            Trivia::empty(),
            Trivia::empty(),
        );
        list.push(id);
    }

    list.finish(p)
}

/// Consumes whatever the interpolation expression left behind, so the
/// segment still covers every byte.
fn drain_interpolation(p: &mut Parser<'_>) -> Vec<NodeId> {
    let mut leftovers = Vec::new();
    let mut reported = false;
    while !p.at(EOF) {
        if !reported {
            p.error("unexpected code in string interpolation");
            reported = true;
        }
        leftovers.push(p.advance());
    }
    if !p.peek_token().leading.is_empty() {
        leftovers.push(p.advance());
    }
    leftovers
}

struct Interpolation {
    backslash: usize,
    lparen: usize,
    rparen: Option<usize>,
}

/// Byte-scans content for `\(` (with the literal's pound count) and finds
/// the matching closing parenthesis, skipping nested strings.
fn find_interpolations(content: &str, pounds: usize) -> Vec<Interpolation> {
    let bytes = content.as_bytes();
    let mut result = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let after = i + 1 + pounds;
        if !has_pounds(bytes, i + 1, pounds) {
            i += 1;
            continue;
        }
        if after >= bytes.len() {
            break;
        }
        if bytes[after] != b'(' {
            // Some other escape; skip its introducer and payload byte.
            i = after + 1;
            continue;
        }

        let mut depth = 1u32;
        let mut j = after + 1;
        while j < bytes.len() && depth > 0 {
            match bytes[j] {
                b'(' => depth += 1,
                b')' => depth -= 1,
                b'"' => {
                    j = skip_nested_string(bytes, j) + 1;
                    continue;
                }
                b'\\' => {
                    j += 1 + pounds;
                }
                _ => {}
            }
            j += 1;
        }
        if depth == 0 {
            result.push(Interpolation { backslash: i, lparen: after, rparen: Some(j - 1) });
            i = j;
        } else {
            result.push(Interpolation { backslash: i, lparen: after, rparen: None });
            break;
        }
    }
    result
}

fn has_pounds(bytes: &[u8], start: usize, pounds: usize) -> bool {
    bytes.len() >= start + pounds && bytes[start..start + pounds].iter().all(|&b| b == b'#')
}

/// Advances past a double-quoted string nested in an interpolation. Escaped
/// quotes are honored; the return value points at the closing quote.
fn skip_nested_string(bytes: &[u8], open: usize) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j,
            _ => j += 1,
        }
    }
    bytes.len().saturating_sub(1)
}

/// Indentation and line-continuation checks for multi-line literals.
fn multiline_diagnostics(
    p: &mut Parser<'_>,
    content_start: usize,
    content: &str,
    terminated: bool,
    pounds: usize,
) {
    let Some(last_newline) = content.rfind('\n') else {
        return;
    };

    // Continuation escape on the final content line: there is no next line
    // to join with.
    let final_line_start = content[..last_newline].rfind('\n').map_or(0, |i| i + 1);
    let final_line = &content[final_line_start..last_newline];
    if ends_with_continuation(final_line, pounds) {
        let backslash = final_line_start + final_line.len() - 1 - pounds;
        let backslash_abs = offset(content_start + backslash);
        let escape_end = offset(content_start + last_newline);
        p.push_diagnostic(
            Diagnostic::error(
                "escaped newline at the last line of a multi-line string literal",
                TextRange::new(backslash_abs, escape_end),
            )
            .with_fix_it(FixIt::new(
                "remove '\\'",
                vec![SourceEdit::remove(TextRange::new(backslash_abs, escape_end))],
            )),
        );
    }

    if !terminated {
        return;
    }

    let closing_indent = &content[last_newline + 1..];
    if !closing_indent.bytes().all(|b| b == b' ' || b == b'\t') {
        // Closing delimiter is not alone on its line; indentation cannot be
        // established.
        return;
    }

    let first_newline = content.find('\n').unwrap_or(0);
    let mut line_start = first_newline + 1;
    while line_start <= last_newline {
        let line_end = match content[line_start..].find('\n') {
            Some(i) => line_start + i,
            None => break,
        };
        let line = &content[line_start..line_end];
        if !line.is_empty() && !line.starts_with(closing_indent) {
            let existing = line.len() - line.trim_start_matches([' ', '\t']).len();
            let indent_range = TextRange::new(
                offset(content_start + line_start),
                offset(content_start + line_start + existing),
            );
            p.push_diagnostic(
                Diagnostic::error(
                    "insufficient indentation of line in multi-line string literal",
                    indent_range,
                )
                .with_fix_it(FixIt::new(
                    "change indentation of this line to match closing delimiter",
                    vec![SourceEdit::replace(indent_range, closing_indent)],
                )),
            );
        }
        line_start = line_end + 1;
    }
}

/// `true` if the line ends with an odd number of backslashes followed by the
/// literal's pound markers.
fn ends_with_continuation(line: &str, pounds: usize) -> bool {
    let stripped = if pounds > 0 {
        let marker = "#".repeat(pounds);
        match line.strip_suffix(marker.as_str()) {
            Some(rest) => rest,
            None => return false,
        }
    } else {
        line
    };
    let backslashes = stripped.len() - stripped.trim_end_matches('\\').len();
    backslashes % 2 == 1
}
