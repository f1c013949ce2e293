use drop_bomb::DropBomb;
use sable_errors::{Diagnostic, FixIt, Note, SourceEdit, TextRange, TextSize};
use sable_syntax::SyntaxKind::{self, *};
use sable_syntax::{Arena, NodeId, SlotKind, SyntaxSet, UnexpectedEntry};
use sable_tokenizer::{Token, Tokenizer};

use crate::incremental::ReuseMap;

/// Lexes `text` into a complete token buffer, final EOF token included.
///
/// Token ranges are shifted by `offset`; the literal post-processor uses
/// this to re-lex interpolation slices in original-source coordinates.
pub(crate) fn lex(text: &str, offset: TextSize) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let mut token = tokenizer.next_token();
        if offset != TextSize::new(0) {
            token.range = TextRange::new(token.range.start() + offset, token.range.end() + offset);
            token.diagnostics = token
                .diagnostics
                .into_iter()
                .map(|diagnostic| diagnostic.shifted(u32::from(offset) as i64))
                .collect();
        }
        let is_eof = token.kind == EOF;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Immutable context threaded through recursive grammar calls.
///
/// Never stored in the parser itself; each call site passes the flavor (or a
/// locally overridden copy) down explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Flavor {
    /// Expression appears in pattern position: operators and trailing
    /// constructs that only make sense for values are not consumed.
    pub(crate) pattern: bool,
    /// `in` terminates the current expression (`for` sequences).
    pub(crate) stop_at_in: bool,
    /// `{` starts a control-flow body rather than a closure literal
    /// (condition positions of `if`, `while`, `for`, `switch`).
    pub(crate) stop_at_brace: bool,
}

impl Flavor {
    pub(crate) fn condition(self) -> Self {
        Self { stop_at_brace: true, ..self }
    }

    pub(crate) fn in_parens(self) -> Self {
        Self { stop_at_brace: false, stop_at_in: false, ..self }
    }
}

pub(crate) struct Parser<'src> {
    text: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    /// Start offset of the current token buffer; nonzero while re-parsing an
    /// interpolation slice.
    buffer_start: TextSize,
    eof_consumed: bool,
    pub(crate) arena: Arena,
    diagnostics: Vec<Diagnostic>,
    pub(crate) reuse: Option<ReuseMap>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(text: &'src str) -> Self {
        Self {
            text,
            tokens: lex(text, TextSize::new(0)),
            pos: 0,
            buffer_start: TextSize::new(0),
            eof_consumed: false,
            arena: Arena::new(text),
            diagnostics: Vec::new(),
            reuse: None,
        }
    }

    pub(crate) fn text(&self) -> &'src str {
        self.text
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokens[self.pos].kind
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_kind2(&self) -> SyntaxKind {
        match self.tokens.get(self.pos + 1) {
            Some(token) => token.kind,
            None => EOF,
        }
    }

    pub(crate) fn peek_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_any(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    /// `true` if the current token is a contextual keyword written as an
    /// identifier, e.g. `get` in an accessor block.
    pub(crate) fn at_contextual(&self, text: &str) -> bool {
        self.at(IDENT) && self.current_text() == text
    }

    pub(crate) fn current_range(&self) -> TextRange {
        self.tokens[self.pos].range
    }

    pub(crate) fn current_text(&self) -> &'src str {
        &self.text[self.current_range()]
    }

    /// Start of the current token including its leading trivia.
    pub(crate) fn current_full_start(&self) -> TextSize {
        let token = &self.tokens[self.pos];
        token.range.start() - token.leading.len()
    }

    /// Insertion point for synthesized tokens: directly after the previous
    /// token's text.
    pub(crate) fn insertion_offset(&self) -> TextSize {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].range.end(),
            None => self.buffer_start,
        }
    }

    /// Consumes the current token into the arena.
    pub(crate) fn advance(&mut self) -> NodeId {
        let token = &self.tokens[self.pos];
        let id = self.arena.push_token(
            token.kind,
            token.range,
            token.leading.clone(),
            token.trailing.clone(),
        );
        self.diagnostics.extend(token.diagnostics.iter().cloned());
        if token.kind == EOF {
            debug_assert!(!self.eof_consumed, "end of file consumed twice");
            self.eof_consumed = true;
        } else {
            self.pos += 1;
        }
        id
    }

    /// Consumes the current token remapped to a different kind; used for
    /// contextual keywords such as `get`/`set`.
    pub(crate) fn advance_remapped(&mut self, kind: SyntaxKind) -> NodeId {
        let token = &self.tokens[self.pos];
        let id = self.arena.push_token(
            kind,
            token.range,
            token.leading.clone(),
            token.trailing.clone(),
        );
        self.diagnostics.extend(token.diagnostics.iter().cloned());
        self.pos += 1;
        id
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        if self.at(kind) { Some(self.advance()) } else { None }
    }

    /// Silently synthesizes a missing token of `kind`, for slots whose
    /// absence is legitimate.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) -> NodeId {
        let offset = self.insertion_offset();
        self.arena.missing_token(kind, offset)
    }

    /// Consumes `kind` or synthesizes it with an "expected" diagnostic and
    /// an insertion fix-it.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> NodeId {
        self.expect_in(kind, None)
    }

    fn expect_in(&mut self, kind: SyntaxKind, what: Option<&str>) -> NodeId {
        if let Some(id) = self.eat(kind) {
            return id;
        }
        let describe = match kind.canonical_text() {
            Some(text) => format!("'{text}'"),
            None => kind.describe().to_string(),
        };
        let message = match what {
            Some(what) => format!("expected {describe} to end {what}"),
            None => format!("expected {describe}"),
        };
        let mut diagnostic = Diagnostic::error(message, TextRange::empty(self.insertion_offset()));
        if let Some(text) = kind.canonical_text() {
            diagnostic = diagnostic.with_fix_it(FixIt::new(
                format!("insert '{text}'"),
                vec![SourceEdit::insert(self.insertion_offset(), text)],
            ));
        }
        self.diagnostics.push(diagnostic);
        self.missing(kind)
    }

    /// Expects a closing delimiter, attaching a note that points back at the
    /// opening one.
    pub(crate) fn expect_closing(
        &mut self,
        kind: SyntaxKind,
        open_range: TextRange,
        what: &str,
    ) -> NodeId {
        if let Some(id) = self.eat(kind) {
            return id;
        }
        let describe = kind.describe();
        let open_text = &self.text[open_range];
        let mut diagnostic = Diagnostic::error(
            format!("expected '{describe}' to end {what}"),
            TextRange::empty(self.insertion_offset()),
        );
        if !open_text.is_empty() {
            diagnostic = diagnostic
                .with_note(Note::new(format!("to match this opening '{open_text}'"), open_range));
        }
        if let Some(text) = kind.canonical_text() {
            diagnostic = diagnostic.with_fix_it(FixIt::new(
                format!("insert '{text}'"),
                vec![SourceEdit::insert(self.insertion_offset(), text)],
            ));
        }
        self.diagnostics.push(diagnostic);
        self.missing(kind)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Synthesizes a placeholder of the expected category together with an
    /// "expected X" diagnostic and a placeholder-insertion fix-it.
    pub(crate) fn expected_node(&mut self, kind: SyntaxKind, context: Option<&str>) -> NodeId {
        let what = kind.describe();
        let message = match context {
            Some(context) => format!("expected {what} {context}"),
            None => format!("expected {what}"),
        };
        let offset = self.insertion_offset();
        let placeholder = format!("<#{what}#>");
        let space = if u32::from(offset) > 0
            && !self.text[..u32::from(offset) as usize].ends_with(char::is_whitespace)
        {
            " "
        } else {
            ""
        };
        let diagnostic = Diagnostic::error(message, TextRange::empty(offset)).with_fix_it(
            FixIt::new(
                format!("insert {what}"),
                vec![SourceEdit::insert(offset, format!("{space}{placeholder}"))],
            ),
        );
        self.diagnostics.push(diagnostic);
        self.missing_layout(kind)
    }

    /// Builds an all-missing layout of `kind`; used both for placeholders
    /// and for legitimately absent optional clauses.
    pub(crate) fn missing_layout(&mut self, kind: SyntaxKind) -> NodeId {
        if kind.is_list() {
            return self.arena.push_layout(kind, &[], &[]);
        }
        let slots = kind.slots().expect("missing_layout requires a layout kind");
        let mut children = Vec::with_capacity(slots.len());
        for slot in slots {
            let child = match slot.kind {
                SlotKind::Token(token) => self.missing(token),
                SlotKind::OneOf(kinds) => self.missing(kinds[0]),
                SlotKind::Node(node) => self.missing_layout(node),
                SlotKind::Expr => self.missing_layout(MISSING_EXPR),
                SlotKind::Stmt => self.missing_layout(MISSING_STMT),
                SlotKind::Decl => self.missing_layout(MISSING_DECL),
                SlotKind::Type => self.missing_layout(MISSING_TYPE),
                SlotKind::Pattern => self.missing_layout(MISSING_PATTERN),
                SlotKind::Any => self.missing_layout(MISSING),
            };
            children.push(child);
        }
        self.arena.push_layout(kind, &children, &[])
    }

    /// Begins a speculative parse. The returned transaction must be either
    /// committed or rolled back.
    pub(crate) fn begin(&mut self) -> Transaction {
        Transaction {
            pos: self.pos,
            diagnostics_len: self.diagnostics.len(),
            bomb: DropBomb::new("Transaction must be either committed or rolled back"),
        }
    }

    /// Restores the cursor and discards diagnostics emitted during the
    /// speculation. Arena allocations made while speculating simply become
    /// unreachable; the arena never frees individual nodes.
    pub(crate) fn rollback(&mut self, mut transaction: Transaction) {
        transaction.bomb.defuse();
        self.pos = transaction.pos;
        self.diagnostics.truncate(transaction.diagnostics_len);
    }

    /// Drains every remaining token into `node`'s unexpected bucket,
    /// reporting leftovers as "unexpected code", then attaches the end of
    /// file so no trailing trivia is lost.
    pub(crate) fn finish_root(&mut self, node: NodeId, what: &str) -> NodeId {
        let mut extra: Vec<UnexpectedEntry> = Vec::new();
        // `extend_unexpected` clamps the slot index to the end of the node.
        let slot_count = u32::MAX;
        if !self.at(EOF) {
            let start = self.current_range().start();
            let mut end = start;
            while !self.at(EOF) {
                end = self.current_range().end();
                let id = self.advance();
                extra.push(UnexpectedEntry { before_slot: slot_count, node: id });
            }
            self.diagnostics.push(Diagnostic::error(
                format!("unexpected code after {what}"),
                TextRange::new(start, end),
            ));
        }
        if !self.eof_consumed && !self.peek_token().leading.is_empty() {
            // Keep trailing trivia of the file reachable from the tree.
            let id = self.advance();
            extra.push(UnexpectedEntry { before_slot: slot_count, node: id });
        }
        if extra.is_empty() { node } else { self.arena.extend_unexpected(node, &extra) }
    }

    /// Text of the token `n` positions ahead; used for contextual-keyword
    /// lookahead.
    pub(crate) fn nth_token_text(&self, n: usize) -> &'src str {
        match self.tokens.get(self.pos + n) {
            Some(token) => &self.text[token.range],
            None => "",
        }
    }

    /// Re-cuts a float token like `1.2` into integer/dot/integer tokens for
    /// version-tuple positions, preserving the attached trivia.
    pub(crate) fn split_float_token(&mut self) -> (NodeId, NodeId, NodeId) {
        debug_assert_eq!(self.peek_kind(), FLOAT_NUMBER);
        let token = self.tokens[self.pos].clone();
        self.diagnostics.extend(token.diagnostics.iter().cloned());
        self.pos += 1;

        let text = &self.text[token.range];
        match text.find('.') {
            Some(dot_index) => {
                let start = token.range.start();
                let dot_offset = start + TextSize::new(dot_index as u32);
                let major = self.arena.push_token(
                    INT_NUMBER,
                    TextRange::new(start, dot_offset),
                    token.leading,
                    sable_syntax::Trivia::empty(),
                );
                let dot = self.arena.push_token(
                    DOT,
                    TextRange::at(dot_offset, TextSize::new(1)),
                    sable_syntax::Trivia::empty(),
                    sable_syntax::Trivia::empty(),
                );
                let minor = self.arena.push_token(
                    INT_NUMBER,
                    TextRange::new(dot_offset + TextSize::new(1), token.range.end()),
                    sable_syntax::Trivia::empty(),
                    token.trailing,
                );
                (major, dot, minor)
            }
            None => {
                // Exponent floats have no dot to split on; keep the token as
                // the major component.
                let major =
                    self.arena.push_token(INT_NUMBER, token.range, token.leading, token.trailing);
                let dot = self.arena.missing_token(DOT, token.range.end());
                let minor = self.arena.missing_token(INT_NUMBER, token.range.end());
                (major, dot, minor)
            }
        }
    }

    /// Takes the current string-literal token out of the stream without
    /// allocating it; the literal post-processor re-cuts it into delimiter,
    /// segment, and interpolation nodes. Its lexical diagnostics are kept.
    pub(crate) fn take_string_token(&mut self) -> Token {
        debug_assert_eq!(self.peek_kind(), STRING_LITERAL);
        let token = self.tokens[self.pos].clone();
        self.diagnostics.extend(token.diagnostics.iter().cloned());
        self.pos += 1;
        token
    }

    /// Advances past the tokens covering an adopted subtree, up to the token
    /// whose full range starts at `target`. No nodes are allocated; the
    /// subtree's content is already owned by an ancestor arena.
    pub(crate) fn skip_past(&mut self, target: TextSize) {
        while !self.at(EOF) && self.current_full_start() < target {
            self.pos += 1;
        }
        debug_assert_eq!(
            self.current_full_start(),
            target,
            "reused subtree does not end on a token boundary"
        );
    }

    /// Re-parses a slice of the original source (an interpolation body) with
    /// a temporary token buffer, keeping all ranges in original coordinates.
    pub(crate) fn with_token_slice<R>(
        &mut self,
        range: TextRange,
        parse: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let slice = &self.text[range];
        let tokens = lex(slice, range.start());
        let saved_tokens = std::mem::replace(&mut self.tokens, tokens);
        let saved_pos = std::mem::replace(&mut self.pos, 0);
        let saved_start = std::mem::replace(&mut self.buffer_start, range.start());
        let saved_eof = std::mem::replace(&mut self.eof_consumed, false);
        let result = parse(self);
        self.tokens = saved_tokens;
        self.pos = saved_pos;
        self.buffer_start = saved_start;
        self.eof_consumed = saved_eof;
        result
    }

    pub(crate) fn finish(self) -> (Arena, Vec<Diagnostic>) {
        (self.arena, self.diagnostics)
    }
}

/// Builds one fixed-arity layout, collecting grammar children and
/// unexpected nodes in source order.
pub(crate) struct LayoutBuilder {
    kind: SyntaxKind,
    children: Vec<NodeId>,
    unexpected: Vec<UnexpectedEntry>,
}

impl LayoutBuilder {
    pub(crate) fn new(kind: SyntaxKind) -> Self {
        Self { kind, children: Vec::new(), unexpected: Vec::new() }
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        self.children.push(id);
    }

    /// Records a stray node before the next grammar slot.
    pub(crate) fn push_unexpected(&mut self, id: NodeId) {
        self.unexpected.push(UnexpectedEntry { before_slot: self.children.len() as u32, node: id });
    }

    /// Skips forward until a token in `recovery` (or EOF), collecting the
    /// skipped tokens into the unexpected bucket under one diagnostic.
    pub(crate) fn skip_until(
        &mut self,
        p: &mut Parser<'_>,
        recovery: &SyntaxSet,
        message: &str,
    ) {
        if p.at(EOF) || p.at_any(recovery) {
            return;
        }
        let start = p.current_range().start();
        let mut end = start;
        while !p.at(EOF) && !p.at_any(recovery) {
            end = p.current_range().end();
            let id = p.advance();
            self.push_unexpected(id);
        }
        p.push_diagnostic(Diagnostic::error(message, TextRange::new(start, end)));
    }

    pub(crate) fn finish(self, p: &mut Parser<'_>) -> NodeId {
        p.arena.push_layout(self.kind, &self.children, &self.unexpected)
    }
}

/// Cursor snapshot plus a guard against silently dropped speculation.
pub(crate) struct Transaction {
    pos: usize,
    diagnostics_len: usize,
    bomb: DropBomb,
}

impl Transaction {
    /// Keeps the speculative parse.
    pub(crate) fn commit(mut self) {
        self.bomb.defuse();
    }
}
