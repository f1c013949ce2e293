//! Streaming lexer for sable.
//!
//! Tokens carry their surrounding trivia: everything up to the token is
//! leading trivia, and trivia after it up to (not including) the next
//! newline run is trailing. Lexing never fails; malformed constructs still
//! produce a token with diagnostics attached.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
use sable_errors::{Diagnostic, FixIt, Note, SourceEdit};
pub use sable_syntax::SyntaxKind;
use sable_syntax::SyntaxKind::*;
use sable_syntax::{Trivia, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: Trivia,
    pub kind: SyntaxKind,
    /// Token text range, trivia excluded.
    pub range: TextRange,
    pub trailing: Trivia,
    /// Lexical diagnostics attached to this token.
    pub diagnostics: Vec<Diagnostic>,
}

impl Token {
    fn eof() -> Self {
        Self {
            leading: Trivia::empty(),
            kind: EOF,
            range: TextRange::empty(TextSize::new(0)),
            trailing: Trivia::empty(),
            diagnostics: Vec::new(),
        }
    }

    /// Full extent including attached trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(self.range.start() - self.leading.len(), self.range.end() + self.trailing.len())
    }
}

pub struct Tokenizer<'src> {
    text: &'src str,
    cursor: Cursor<'src>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(text: &'src str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::eof(),
            trivia_pieces: Vec::with_capacity(4),
            diagnostics: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    fn text(&self) -> &'src str {
        &self.text[self.range()]
    }

    pub fn next_token(&mut self) -> Token {
        self.leading_trivia();
        let trailing_start = self.trivia_pieces.len();
        let (kind, range) = self.syntax_kind();
        self.trailing_trivia();

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = Trivia::new(leading);
        let trailing = Trivia::new(trailing);
        self.trivia_pieces.clear();
        let diagnostics = std::mem::take(&mut self.diagnostics);

        std::mem::replace(&mut self.current, Token { leading, kind, range, trailing, diagnostics })
    }

    fn push_piece(&mut self, kind: TriviaPieceKind) {
        self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
        self.cursor.reset_pos_within_token();
    }

    fn leading_trivia(&mut self) {
        loop {
            let kind = match self.cursor.peek() {
                ' ' | '\t' => {
                    self.cursor.advance_while(|c| c == ' ' || c == '\t');
                    TriviaPieceKind::Whitespace
                }
                '\n' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' => {
                    self.cursor.advance();
                    if self.cursor.matches('\n') {
                        self.cursor.advance();
                    }
                    TriviaPieceKind::Newline
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::LineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::BlockComment
                }
                c if c != EOF_CHAR && c.is_whitespace() => {
                    self.cursor.advance();
                    self.diagnose_unicode_space(c);
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };
            self.push_piece(kind);
        }
    }

    /// Trailing trivia extends up to, but never across, a line break.
    fn trailing_trivia(&mut self) {
        loop {
            let kind = match self.cursor.peek() {
                ' ' | '\t' => {
                    self.cursor.advance_while(|c| c == ' ' || c == '\t');
                    TriviaPieceKind::Whitespace
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::LineComment
                }
                '/' if self.cursor.second() == '*' && !self.block_comment_spans_lines() => {
                    self.block_comment();
                    TriviaPieceKind::BlockComment
                }
                _ => break,
            };
            self.push_piece(kind);
        }
    }

    /// Consumes a (possibly nested) block comment.
    fn block_comment(&mut self) {
        let open_start = self.offset();
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1u32;
        while depth > 0 {
            if self.cursor.is_eof() {
                self.diagnostics.push(Diagnostic::error(
                    "unterminated block comment",
                    TextRange::at(open_start, 2.into()),
                ));
                return;
            }
            match self.cursor.advance() {
                '/' if self.cursor.matches('*') => {
                    self.cursor.advance();
                    depth += 1;
                }
                '*' if self.cursor.matches('/') => {
                    self.cursor.advance();
                    depth -= 1;
                }
                _ => {}
            }
        }
    }

    fn block_comment_spans_lines(&self) -> bool {
        let mut lookahead = self.cursor.clone();
        lookahead.advance();
        lookahead.advance();
        let mut depth = 1u32;
        while depth > 0 {
            if lookahead.is_eof() {
                return true;
            }
            match lookahead.advance() {
                '\n' | '\r' => return true,
                '/' if lookahead.matches('*') => {
                    lookahead.advance();
                    depth += 1;
                }
                '*' if lookahead.matches('/') => {
                    lookahead.advance();
                    depth -= 1;
                }
                _ => {}
            }
        }
        false
    }

    fn diagnose_unicode_space(&mut self, c: char) {
        if c.is_ascii() {
            return;
        }
        let range = self.range();
        self.diagnostics.push(
            Diagnostic::warning(
                format!("unicode space character (U+{:04X}) used instead of regular space", c as u32),
                range,
            )
            .with_fix_it(FixIt::new("replace with regular space", vec![SourceEdit::replace(range, " ")])),
        );
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        let previous = self.cursor.previous();

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ':' => COLON,
            ';' => SEMICOLON,
            ',' => COMMA,
            '@' => AT,
            '"' => self.string(0),
            '#' => {
                self.cursor.advance_while(|c| c == '#');
                let pounds = u32::from(self.cursor.pos_within_token());
                if self.cursor.matches('"') {
                    self.cursor.advance();
                    self.string(pounds)
                } else {
                    UNKNOWN
                }
            }
            first_char @ '0'..='9' => self.number(first_char),
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENT)
            }
            // A real end of file consumes nothing; an embedded nul byte
            // advances and is handled below.
            EOF_CHAR if self.cursor.pos_within_token() == TextSize::new(0) => EOF,
            '\0' => {
                self.diagnostics.push(Diagnostic::warning(
                    "nul character embedded in source file",
                    self.range(),
                ));
                UNKNOWN
            }
            '<' if self.cursor.matches('#') => self.editor_placeholder(),
            first_char => {
                if is_operator(first_char) {
                    self.cursor.advance_while(is_operator);

                    let left_bound = match previous {
                        '(' | '[' | '{' | ',' | ':' | ';' => false,
                        EOF_CHAR => false,
                        prev => !prev.is_whitespace(),
                    };

                    let right_bound = match self.cursor.peek() {
                        ')' | ']' | '}' | ',' | ':' | ';' => false,
                        '.' => !left_bound,
                        EOF_CHAR => false,
                        peeked => !peeked.is_whitespace(),
                    };

                    match self.text() {
                        "=" => EQ,
                        "." => DOT,
                        "->" => ARROW,
                        "?" => QUESTION,
                        "<" => LESS,
                        ">" => GREATER,
                        "&" => AMP,
                        "!" => {
                            if !left_bound && right_bound {
                                PREFIX_OPERATOR
                            } else if left_bound && !right_bound {
                                POSTFIX_OPERATOR
                            } else {
                                EXCLAIM
                            }
                        }
                        _ => {
                            if left_bound == right_bound {
                                BINARY_OPERATOR
                            } else if left_bound {
                                POSTFIX_OPERATOR
                            } else {
                                PREFIX_OPERATOR
                            }
                        }
                    }
                } else {
                    UNKNOWN
                }
            }
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    /// `<#...#>` scans as a single identifier-like token so that inserted
    /// placeholders parse as the construct they stand in for; the
    /// diagnostic still marks them as unexpanded.
    fn editor_placeholder(&mut self) -> SyntaxKind {
        self.cursor.advance();
        loop {
            if self.cursor.is_eof() {
                break;
            }
            match self.cursor.peek() {
                '\n' | '\r' => break,
                '#' if self.cursor.second() == '>' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        self.diagnostics
            .push(Diagnostic::error("editor placeholder in source file", self.range()));
        IDENT
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'o' => {
                    self.cursor.advance();
                    self.digits(false);
                }
                'x' => {
                    self.cursor.advance();
                    self.digits(true);
                }
                '0'..='9' | '_' | '.' | 'e' | 'E' => {
                    self.digits(false);
                }
                _ => return INT_NUMBER,
            }
        } else {
            self.digits(false);
        }

        if self.cursor.matches('.')
            && self.cursor.second().is_ascii_digit()
        {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        INT_NUMBER
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }

    /// Scans a string literal body. The opening quote (and any pounds before
    /// it) have been consumed.
    fn string(&mut self, pounds: u32) -> SyntaxKind {
        let token_start = self.offset() - self.cursor.pos_within_token();
        let multiline = self.cursor.peek() == '"' && self.cursor.second() == '"';
        if multiline {
            self.cursor.advance();
            self.cursor.advance();
        }
        let open_len = self.cursor.pos_within_token();
        let open_range = TextRange::at(token_start, open_len);
        let quote = if multiline { "\"\"\"" } else { "\"" };
        let close_delimiter: String =
            quote.chars().chain(std::iter::repeat_n('#', pounds as usize)).collect();

        loop {
            if self.cursor.is_eof() {
                self.unterminated(open_range, &close_delimiter, multiline);
                break;
            }
            match self.cursor.peek() {
                '\n' | '\r' if !multiline => {
                    self.unterminated(open_range, &close_delimiter, multiline);
                    break;
                }
                '"' if self.at_close_delimiter(pounds, multiline) => {
                    for _ in 0..close_delimiter.len() {
                        self.cursor.advance();
                    }
                    break;
                }
                '\\' if self.at_escape(pounds) => {
                    self.escape(pounds, multiline);
                }
                '\0' => {
                    self.cursor.advance();
                    let end = self.offset();
                    self.diagnostics.push(Diagnostic::warning(
                        "nul character embedded in source file",
                        TextRange::new(end - TextSize::new(1), end),
                    ));
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }

        STRING_LITERAL
    }

    fn at_close_delimiter(&self, pounds: u32, multiline: bool) -> bool {
        let rest = self.cursor.rest();
        let quotes = if multiline { 3 } else { 1 };
        let mut chars = rest.chars();
        for _ in 0..quotes {
            if chars.next() != Some('"') {
                return false;
            }
        }
        for _ in 0..pounds {
            if chars.next() != Some('#') {
                return false;
            }
        }
        true
    }

    /// In a raw string, only `\` followed by the matching pound count starts
    /// an escape; a bare backslash is content.
    fn at_escape(&self, pounds: u32) -> bool {
        let mut chars = self.cursor.rest().chars();
        if chars.next() != Some('\\') {
            return false;
        }
        for _ in 0..pounds {
            if chars.next() != Some('#') {
                return false;
            }
        }
        true
    }

    fn escape(&mut self, pounds: u32, multiline: bool) {
        let start = self.offset();
        self.cursor.advance();
        for _ in 0..pounds {
            self.cursor.advance();
        }
        match self.cursor.peek() {
            'n' | 't' | 'r' | '0' | '\\' | '\'' | '"' => {
                self.cursor.advance();
            }
            '(' => {
                self.cursor.advance();
                self.skip_interpolation(multiline);
            }
            'u' => {
                self.cursor.advance();
                if self.cursor.matches('{') {
                    self.cursor.advance();
                    self.cursor.advance_while(|c| c.is_ascii_hexdigit());
                    if self.cursor.matches('}') {
                        self.cursor.advance();
                        return;
                    }
                }
                self.diagnostics.push(Diagnostic::error(
                    "invalid unicode escape sequence; expected \\u{...} with hexadecimal digits",
                    TextRange::new(start, self.offset()),
                ));
            }
            '\n' | '\r' => {
                // In a multi-line literal this is a line continuation; the
                // literal post-processor joins the lines. In a single-line
                // literal the unterminated-string path takes over.
                if !multiline {
                    self.diagnostics.push(Diagnostic::error(
                        "invalid escape sequence in literal",
                        TextRange::new(start, self.offset()),
                    ));
                }
            }
            _ => {
                if !self.cursor.is_eof() {
                    self.cursor.advance();
                }
                self.diagnostics.push(Diagnostic::error(
                    "invalid escape sequence in literal",
                    TextRange::new(start, self.offset()),
                ));
            }
        }
    }

    /// Skips the balanced parentheses of an interpolation without emitting
    /// diagnostics; interpolation contents are re-lexed when the literal is
    /// post-processed.
    fn skip_interpolation(&mut self, multiline: bool) {
        let mut depth = 1u32;
        while depth > 0 {
            if self.cursor.is_eof() {
                return;
            }
            match self.cursor.peek() {
                '\n' | '\r' if !multiline => return,
                '(' => {
                    self.cursor.advance();
                    depth += 1;
                }
                ')' => {
                    self.cursor.advance();
                    depth -= 1;
                }
                '"' => {
                    self.cursor.advance();
                    self.skip_nested_string(0);
                }
                '#' => {
                    let mut chars = self.cursor.rest().chars();
                    let mut nested_pounds = 0u32;
                    while chars.next() == Some('#') {
                        nested_pounds += 1;
                    }
                    if nested_pounds > 0 && self.cursor.rest()[nested_pounds as usize..].starts_with('"') {
                        for _ in 0..=nested_pounds {
                            self.cursor.advance();
                        }
                        self.skip_nested_string(nested_pounds);
                    } else {
                        self.cursor.advance();
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Silently skips a string nested inside an interpolation.
    fn skip_nested_string(&mut self, pounds: u32) {
        let multiline = self.cursor.peek() == '"' && self.cursor.second() == '"';
        if multiline {
            self.cursor.advance();
            self.cursor.advance();
        }
        loop {
            if self.cursor.is_eof() {
                return;
            }
            match self.cursor.peek() {
                '\n' | '\r' if !multiline => return,
                '"' if self.at_close_delimiter(pounds, multiline) => {
                    let quotes = if multiline { 3 } else { 1 };
                    for _ in 0..quotes + pounds {
                        self.cursor.advance();
                    }
                    return;
                }
                '\\' if self.at_escape(pounds) => {
                    self.cursor.advance();
                    for _ in 0..pounds {
                        self.cursor.advance();
                    }
                    if self.cursor.matches('(') {
                        self.cursor.advance();
                        self.skip_interpolation(multiline);
                    } else if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn unterminated(&mut self, open_range: TextRange, close_delimiter: &str, multiline: bool) {
        let end = self.offset();
        let quote = if multiline { "\"\"\"" } else { "\"" };
        self.diagnostics.push(
            Diagnostic::error("unterminated string literal", TextRange::empty(end))
                .with_note(Note::new(format!("to match this opening '{quote}'"), open_range))
                .with_fix_it(FixIt::new(
                    format!("insert '{close_delimiter}'"),
                    vec![SourceEdit::insert(end, close_delimiter)],
                )),
        );
    }
}

fn is_operator(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '*' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '.' | '?'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.range]
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut tokenizer = Tokenizer::new(text);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == EOF {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("func main"), vec![FUNC_KW, IDENT]);
        assert_eq!(kinds("let get set"), vec![LET_KW, IDENT, IDENT]);
        assert_eq!(kinds("_ _x"), vec![UNDERSCORE, IDENT]);
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("0 123 0x1f 0b10 1_000"), vec![INT_NUMBER; 5]);
        assert_eq!(kinds("1.5 1e10 2.5e-3"), vec![FLOAT_NUMBER; 3]);
    }

    #[test]
    fn member_access_is_not_a_float() {
        assert_eq!(kinds("1.foo"), vec![INT_NUMBER, DOT, IDENT]);
    }

    #[test]
    fn operator_bound_classification() {
        let text = "-a + b++";
        let mut tokenizer = Tokenizer::new(text);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, PREFIX_OPERATOR);
        assert_eq!(token_text(&token, text), "-");
        assert_eq!(tokenizer.next_token().kind, IDENT);
        assert_eq!(tokenizer.next_token().kind, BINARY_OPERATOR);
        assert_eq!(tokenizer.next_token().kind, IDENT);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, POSTFIX_OPERATOR);
        assert_eq!(token_text(&token, text), "++");
    }

    #[test]
    fn punctuation_operators_keep_distinct_kinds() {
        assert_eq!(kinds("a = b"), vec![IDENT, EQ, IDENT]);
        assert_eq!(kinds("a ? b : c"), vec![IDENT, QUESTION, IDENT, COLON, IDENT]);
        assert_eq!(kinds("(x) -> y"), vec![LEFT_PAREN, IDENT, RIGHT_PAREN, ARROW, IDENT]);
        assert_eq!(kinds("a<b>"), vec![IDENT, LESS, IDENT, GREATER]);
        assert_eq!(kinds("T?"), vec![IDENT, QUESTION]);
    }

    #[test]
    fn trailing_trivia_stops_at_newline() {
        let text = "a // note\nb";
        let mut tokenizer = Tokenizer::new(text);
        let a = tokenizer.next_token();
        assert_eq!(token_text(&a, text), "a");
        let trailing: Vec<_> = a.trailing.pieces().iter().map(|p| p.kind).collect();
        assert_eq!(trailing, vec![TriviaPieceKind::Whitespace, TriviaPieceKind::LineComment]);

        let b = tokenizer.next_token();
        let leading: Vec<_> = b.leading.pieces().iter().map(|p| p.kind).collect();
        assert_eq!(leading, vec![TriviaPieceKind::Newline]);
    }

    #[test]
    fn nested_block_comment_is_one_piece() {
        let text = "/* a /* b */ c */ x";
        let mut tokenizer = Tokenizer::new(text);
        let x = tokenizer.next_token();
        assert_eq!(token_text(&x, text), "x");
        assert_eq!(x.leading.pieces()[0].kind, TriviaPieceKind::BlockComment);
        assert_eq!(x.leading.pieces()[0].len, TextSize::new(17));
    }

    #[test]
    fn simple_string_literal() {
        let text = r#""hello" x"#;
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.kind, STRING_LITERAL);
        assert_eq!(token_text(&string, text), "\"hello\"");
        assert!(string.diagnostics.is_empty());
    }

    #[test]
    fn raw_string_with_pounds() {
        let text = r###"#"a "quoted" b"# x"###;
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.kind, STRING_LITERAL);
        assert_eq!(token_text(&string, text), r###"#"a "quoted" b"#"###);
    }

    #[test]
    fn interpolation_with_nested_string() {
        let text = r#""a \(f("x")) b" y"#;
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.kind, STRING_LITERAL);
        assert_eq!(token_text(&string, text), r#""a \(f("x")) b""#);
        assert_eq!(tokenizer.next_token().kind, IDENT);
    }

    #[test]
    fn unterminated_string_diagnostic() {
        let text = "\"abc";
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.kind, STRING_LITERAL);
        assert_eq!(string.diagnostics.len(), 1);
        let diagnostic = &string.diagnostics[0];
        assert_eq!(diagnostic.message(), "unterminated string literal");
        assert_eq!(diagnostic.notes().len(), 1);
        assert_eq!(diagnostic.notes()[0].range(), TextRange::new(0.into(), 1.into()));
        let fixed = sable_errors::apply_fix_its(text, [&diagnostic.fix_its()[0]]);
        assert_eq!(fixed, "\"abc\"");
    }

    #[test]
    fn invalid_escape_diagnostic() {
        let text = r#""a\q b""#;
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.diagnostics.len(), 1);
        assert_eq!(string.diagnostics[0].message(), "invalid escape sequence in literal");
    }

    #[test]
    fn raw_string_ignores_plain_backslash() {
        let text = r##"#"a \q b"#"##;
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert!(string.diagnostics.is_empty());
    }

    #[test]
    fn multiline_string_literal() {
        let text = "\"\"\"\n  line\n  \"\"\" x";
        let mut tokenizer = Tokenizer::new(text);
        let string = tokenizer.next_token();
        assert_eq!(string.kind, STRING_LITERAL);
        assert!(string.diagnostics.is_empty());
        assert_eq!(tokenizer.next_token().kind, IDENT);
    }

    #[test]
    fn unicode_space_is_diagnosed_with_fix_it() {
        let text = "a\u{00A0}b";
        let mut tokenizer = Tokenizer::new(text);
        let _a = tokenizer.next_token();
        let b = tokenizer.next_token();
        assert_eq!(b.diagnostics.len(), 1);
        let diagnostic = &b.diagnostics[0];
        assert!(diagnostic.message().contains("U+00A0"));
        let fixed = sable_errors::apply_fix_its(text, [&diagnostic.fix_its()[0]]);
        assert_eq!(fixed, "a b");
    }

    #[test]
    fn lexing_never_fails() {
        for text in ["", "\0", "\\", "###", "\"", "\"\"\"", "/*", "\u{2028}"] {
            let mut tokenizer = Tokenizer::new(text);
            let mut steps = 0;
            while tokenizer.next_token().kind != EOF {
                steps += 1;
                assert!(steps < 100);
            }
        }
    }
}
