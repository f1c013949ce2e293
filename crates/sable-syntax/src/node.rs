//! Navigation handles over arena-owned raw nodes.
//!
//! A [`RawNode`] is a copyable `(arena, id)` pair. Crossing into an adopted
//! subtree transparently switches to the ancestor arena that owns it; the
//! arena chain keeps every reachable ancestor alive.

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::arena::{Arena, LayoutData, NodeId, TokenData, UnexpectedEntry};
use crate::{SlotInfo, SyntaxKind, Trivia};

/// An immutable tree produced by one parse session.
pub struct SyntaxTree {
    arena: Arc<Arena>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn new(arena: Arc<Arena>, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> RawNode<'_> {
        RawNode { arena: &self.arena, id: self.root }
    }

    /// Handle to the owning arena, used for adoption by a later session.
    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Source text the session was created from.
    pub fn text(&self) -> &str {
        self.arena.text()
    }

    /// Indented tree rendering used by snapshot tests.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        dump(&mut out, self.root(), 0, false);
        out
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree").field("text_len", &self.text().len()).finish_non_exhaustive()
    }
}

fn dump(out: &mut String, node: RawNode<'_>, depth: usize, unexpected: bool) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    if unexpected {
        out.push_str("(unexpected) ");
    }
    if node.is_token() {
        out.push_str(&format!("{:?}", node.kind()));
        if node.is_missing() {
            out.push_str(" <missing>");
        } else {
            out.push_str(&format!(" {:?}", node.token_text()));
        }
        out.push('\n');
    } else {
        out.push_str(&format!("{:?}\n", node.kind()));
        let entries: Vec<_> = node.children_in_order_tagged().collect();
        for (child, is_unexpected) in entries {
            dump(out, child, depth + 1, is_unexpected);
        }
    }
}

/// A raw token or layout node.
#[derive(Clone, Copy)]
pub struct RawNode<'a> {
    arena: &'a Arena,
    id: NodeId,
}

impl<'a> RawNode<'a> {
    pub fn new(arena: &'a Arena, id: NodeId) -> Self {
        Self { arena, id }
    }

    /// Follows adoption links to the arena that physically owns this node.
    fn resolve(self) -> (&'a Arena, NodeId) {
        let mut arena = self.arena;
        let mut id = self.id;
        while let NodeId::Adopted(index) = id {
            let entry = &arena.adopted[index as usize];
            arena = &arena.ancestors[entry.ancestor as usize];
            id = entry.node;
        }
        (arena, id)
    }

    fn token_data(self) -> Option<(&'a Arena, &'a TokenData)> {
        let (arena, id) = self.resolve();
        match id {
            NodeId::Token(index) => Some((arena, &arena.tokens[index as usize])),
            _ => None,
        }
    }

    fn layout_data(self) -> Option<(&'a Arena, &'a LayoutData)> {
        let (arena, id) = self.resolve();
        match id {
            NodeId::Layout(index) => Some((arena, &arena.layouts[index as usize])),
            _ => None,
        }
    }

    pub fn kind(self) -> SyntaxKind {
        let (arena, id) = self.resolve();
        match id {
            NodeId::Token(index) => arena.tokens[index as usize].kind,
            NodeId::Layout(index) => arena.layouts[index as usize].kind,
            NodeId::Adopted(_) => unreachable!("resolve returned an adoption link"),
        }
    }

    pub fn is_token(self) -> bool {
        matches!(self.resolve().1, NodeId::Token(_))
    }

    pub fn is_layout(self) -> bool {
        matches!(self.resolve().1, NodeId::Layout(_))
    }

    /// `false` only for tokens synthesized during recovery.
    pub fn is_present(self) -> bool {
        match self.token_data() {
            Some((_, token)) => token.present,
            None => true,
        }
    }

    pub fn is_missing(self) -> bool {
        !self.is_present()
    }

    /// Total text length, trivia included.
    pub fn text_len(self) -> TextSize {
        let (arena, id) = self.resolve();
        arena.text_len_of(id)
    }

    /// Token text excluding trivia. Empty for missing tokens and layouts.
    pub fn token_text(self) -> &'a str {
        match self.token_data() {
            Some((arena, token)) => &arena.text[token.range],
            None => "",
        }
    }

    /// Range of the token text (excluding trivia) in its owning session's
    /// source. For missing tokens this is the empty insertion-point range.
    pub fn token_range(self) -> Option<TextRange> {
        self.token_data().map(|(_, token)| token.range)
    }

    pub fn leading_trivia(self) -> Trivia {
        match self.token_data() {
            Some((_, token)) => token.leading.clone(),
            None => Trivia::empty(),
        }
    }

    pub fn trailing_trivia(self) -> Trivia {
        match self.token_data() {
            Some((_, token)) => token.trailing.clone(),
            None => Trivia::empty(),
        }
    }

    fn leading_text(self) -> &'a str {
        match self.token_data() {
            Some((arena, token)) => {
                let start = token.range.start() - token.leading.len();
                &arena.text[TextRange::new(start, token.range.start())]
            }
            None => "",
        }
    }

    fn trailing_text(self) -> &'a str {
        match self.token_data() {
            Some((arena, token)) => {
                let end = token.range.end() + token.trailing.len();
                &arena.text[TextRange::new(token.range.end(), end)]
            }
            None => "",
        }
    }

    /// Number of grammar slots; 0 for tokens.
    pub fn slot_count(self) -> usize {
        match self.layout_data() {
            Some((_, layout)) => layout.slots_len as usize,
            None => 0,
        }
    }

    /// Child in grammar slot `index`.
    pub fn slot(self, index: usize) -> Option<RawNode<'a>> {
        let (arena, layout) = self.layout_data()?;
        if index >= layout.slots_len as usize {
            return None;
        }
        let id = arena.slots[layout.slots_start as usize + index];
        Some(RawNode { arena, id })
    }

    /// Child in the slot with the given static name.
    pub fn slot_named(self, name: &str) -> Option<RawNode<'a>> {
        let index = self.slot_infos()?.iter().position(|slot| slot.name == name)?;
        self.slot(index)
    }

    pub fn slot_infos(self) -> Option<&'static [SlotInfo]> {
        self.kind().slots()
    }

    /// Grammar-shape children only, skipping unexpected nodes.
    pub fn children(self) -> impl Iterator<Item = RawNode<'a>> {
        let (arena, slots) = match self.layout_data() {
            Some((arena, layout)) => {
                let start = layout.slots_start as usize;
                (arena, &arena.slots[start..start + layout.slots_len as usize])
            }
            None => (self.arena, &[][..]),
        };
        slots.iter().map(move |&id| RawNode { arena, id })
    }

    /// Children and unexpected nodes interleaved in exact source order,
    /// tagged with whether the node came from the unexpected bucket.
    pub fn children_in_order_tagged(self) -> ChildrenInOrder<'a> {
        match self.layout_data() {
            Some((arena, layout)) => {
                let slots_start = layout.slots_start as usize;
                let unexpected_start = layout.unexpected_start as usize;
                ChildrenInOrder {
                    arena,
                    slots: &arena.slots[slots_start..slots_start + layout.slots_len as usize],
                    unexpected: &arena.unexpected
                        [unexpected_start..unexpected_start + layout.unexpected_len as usize],
                    slot_index: 0,
                    unexpected_index: 0,
                }
            }
            None => ChildrenInOrder {
                arena: self.arena,
                slots: &[],
                unexpected: &[],
                slot_index: 0,
                unexpected_index: 0,
            },
        }
    }

    pub fn children_in_order(self) -> impl Iterator<Item = RawNode<'a>> {
        self.children_in_order_tagged().map(|(node, _)| node)
    }

    /// Reconstructs the exact source text covered by this node.
    pub fn write_text(self, out: &mut String) {
        if self.is_token() {
            out.push_str(self.leading_text());
            out.push_str(self.token_text());
            out.push_str(self.trailing_text());
        } else {
            for child in self.children_in_order() {
                child.write_text(out);
            }
        }
    }

    pub fn text(self) -> String {
        let mut out = String::with_capacity(u32::from(self.text_len()) as usize);
        self.write_text(&mut out);
        out
    }

    /// First token of the subtree in source order, if any.
    pub fn first_token(self) -> Option<RawNode<'a>> {
        if self.is_token() {
            return Some(self);
        }
        self.children_in_order().find_map(Self::first_token)
    }

    /// Raw identity of this node, relative to the arena it was navigated
    /// from. Valid as an [`crate::Arena::adopt`] argument together with that
    /// arena's handle.
    pub fn raw_id(self) -> NodeId {
        self.id
    }

    /// Position-stable identity: the same allocation in the same arena.
    ///
    /// Distinguishes a node reused by adoption from an equal rebuilt one.
    pub fn same_node(self, other: RawNode<'_>) -> bool {
        let (a_arena, a_id) = self.resolve();
        let (b_arena, b_id) = other.resolve();
        std::ptr::eq(a_arena, b_arena) && a_id == b_id
    }

    /// Deep equality over kinds, presence, and exact text (trivia included).
    pub fn structural_eq(self, other: RawNode<'_>) -> bool {
        if self.kind() != other.kind() || self.is_present() != other.is_present() {
            return false;
        }
        if self.is_token() {
            return self.leading_text() == other.leading_text()
                && self.token_text() == other.token_text()
                && self.trailing_text() == other.trailing_text();
        }
        let mut left = self.children_in_order();
        let mut right = other.children_in_order();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.structural_eq(b) => {}
                _ => return false,
            }
        }
    }
}

impl std::fmt::Debug for RawNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_token() {
            write!(f, "{:?} {:?}", self.kind(), self.token_text())
        } else {
            write!(f, "{:?}(..{} slots)", self.kind(), self.slot_count())
        }
    }
}

/// Iterator over slots and unexpected entries in source order.
pub struct ChildrenInOrder<'a> {
    arena: &'a Arena,
    slots: &'a [NodeId],
    unexpected: &'a [UnexpectedEntry],
    slot_index: usize,
    unexpected_index: usize,
}

impl<'a> Iterator for ChildrenInOrder<'a> {
    type Item = (RawNode<'a>, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.unexpected.get(self.unexpected_index) {
            if entry.before_slot as usize <= self.slot_index {
                self.unexpected_index += 1;
                return Some((RawNode { arena: self.arena, id: entry.node }, true));
            }
        }
        if self.slot_index < self.slots.len() {
            let id = self.slots[self.slot_index];
            self.slot_index += 1;
            return Some((RawNode { arena: self.arena, id }, false));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextRange;
    use triomphe::Arc;

    use super::*;
    use crate::SyntaxKind::*;
    use crate::{TriviaPiece, TriviaPieceKind};

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    fn whitespace(len: u32) -> Trivia {
        Trivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, len.into())])
    }

    #[test]
    fn token_text_and_trivia_slices() {
        let mut arena = Arena::new("  nil ");
        let token = arena.push_token(NIL_KW, range(2, 5), whitespace(2), whitespace(1));
        let root = arena.push_layout(NIL_LITERAL_EXPR, &[token], &[]);
        let tree = SyntaxTree::new(Arc::new(arena), root);

        let node = tree.root();
        assert_eq!(node.kind(), NIL_LITERAL_EXPR);
        assert_eq!(node.text(), "  nil ");
        let token = node.slot(0).unwrap();
        assert_eq!(token.token_text(), "nil");
        assert_eq!(token.text_len(), 6.into());
    }

    #[test]
    fn missing_token_has_empty_text() {
        let mut arena = Arena::new("(");
        let lparen = arena.push_token(LEFT_PAREN, range(0, 1), Trivia::empty(), Trivia::empty());
        let elements = arena.push_layout(ARGUMENT_LIST, &[], &[]);
        let rparen = arena.missing_token(RIGHT_PAREN, 1.into());
        let root = arena.push_layout(TUPLE_EXPR, &[lparen, elements, rparen], &[]);
        let tree = SyntaxTree::new(Arc::new(arena), root);

        assert_eq!(tree.root().text(), "(");
        let rparen = tree.root().slot_named("right_paren").unwrap();
        assert!(rparen.is_missing());
        assert_eq!(rparen.token_text(), "");
    }

    #[test]
    fn unexpected_nodes_keep_source_order() {
        let mut arena = Arena::new("@ nil");
        let stray = arena.push_token(AT, range(0, 1), Trivia::empty(), whitespace(1));
        let token = arena.push_token(NIL_KW, range(2, 5), Trivia::empty(), Trivia::empty());
        let root = arena.push_layout(
            NIL_LITERAL_EXPR,
            &[token],
            &[UnexpectedEntry { before_slot: 0, node: stray }],
        );
        let tree = SyntaxTree::new(Arc::new(arena), root);
        assert_eq!(tree.root().text(), "@ nil");
    }

    #[test]
    fn adoption_preserves_identity_and_text() {
        let mut old = Arena::new("nil");
        let token = old.push_token(NIL_KW, range(0, 3), Trivia::empty(), Trivia::empty());
        let old_root = old.push_layout(NIL_LITERAL_EXPR, &[token], &[]);
        let old_tree = SyntaxTree::new(Arc::new(old), old_root);

        let mut new = Arena::new("nil ");
        let adopted = new.adopt(old_tree.arena(), old_root);
        let items = new.push_layout(CODE_BLOCK_ITEM_LIST, &[adopted], &[]);
        let eof = new.missing_token(EOF, 3.into());
        let root = new.push_layout(SOURCE_FILE, &[items, eof], &[]);
        let new_tree = SyntaxTree::new(Arc::new(new), root);

        let reused = new_tree.root().slot(0).unwrap().slot(0).unwrap();
        assert!(reused.same_node(old_tree.root()));
        assert!(reused.structural_eq(old_tree.root()));
        assert_eq!(reused.text(), "nil");
    }

    #[test]
    fn structural_eq_is_not_identity() {
        let mut a = Arena::new("nil");
        let token = a.push_token(NIL_KW, range(0, 3), Trivia::empty(), Trivia::empty());
        let a_root = a.push_layout(NIL_LITERAL_EXPR, &[token], &[]);
        let a_tree = SyntaxTree::new(Arc::new(a), a_root);

        let mut b = Arena::new("nil");
        let token = b.push_token(NIL_KW, range(0, 3), Trivia::empty(), Trivia::empty());
        let b_root = b.push_layout(NIL_LITERAL_EXPR, &[token], &[]);
        let b_tree = SyntaxTree::new(Arc::new(b), b_root);

        assert!(a_tree.root().structural_eq(b_tree.root()));
        assert!(!a_tree.root().same_node(b_tree.root()));
    }
}
