//! Session-scoped storage for raw nodes.
//!
//! An [`Arena`] owns every token and layout produced by one parse session.
//! Allocation is monotonic and nothing is freed individually; the whole arena
//! drops with the last tree handle. Incremental reuse imports nodes from a
//! previous session by storing a reference-counted handle to the previous
//! arena, so ownership forms a chain rather than a single generation.

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::{SyntaxKind, Trivia};

/// Identity of a raw node within one arena's namespace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeId {
    Token(u32),
    Layout(u32),
    /// A node imported from an ancestor arena; resolves through
    /// [`Arena::adopted`].
    Adopted(u32),
}

#[derive(Debug)]
pub(crate) struct TokenData {
    pub(crate) kind: SyntaxKind,
    /// Token text excluding trivia; an empty range at the insertion point
    /// for missing tokens.
    pub(crate) range: TextRange,
    pub(crate) leading: Trivia,
    pub(crate) trailing: Trivia,
    pub(crate) present: bool,
}

#[derive(Debug)]
pub(crate) struct LayoutData {
    pub(crate) kind: SyntaxKind,
    pub(crate) slots_start: u32,
    pub(crate) slots_len: u32,
    pub(crate) unexpected_start: u32,
    pub(crate) unexpected_len: u32,
    pub(crate) text_len: TextSize,
}

/// A node consumed during error recovery that is not part of the owning
/// layout's grammar shape, remembered together with the slot index it
/// appeared before so that source order is preserved exactly.
#[derive(Clone, Copy, Debug)]
pub struct UnexpectedEntry {
    pub before_slot: u32,
    pub node: NodeId,
}

#[derive(Debug)]
pub(crate) struct AdoptedData {
    pub(crate) ancestor: u32,
    /// Id within the ancestor arena; always `Token` or `Layout`, adoption
    /// resolves chains eagerly.
    pub(crate) node: NodeId,
}

pub struct Arena {
    pub(crate) text: Box<str>,
    pub(crate) tokens: Vec<TokenData>,
    pub(crate) layouts: Vec<LayoutData>,
    pub(crate) slots: Vec<NodeId>,
    pub(crate) unexpected: Vec<UnexpectedEntry>,
    pub(crate) adopted: Vec<AdoptedData>,
    pub(crate) ancestors: Vec<Arc<Arena>>,
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("tokens", &self.tokens.len())
            .field("layouts", &self.layouts.len())
            .field("ancestors", &self.ancestors.len())
            .finish_non_exhaustive()
    }
}

impl Arena {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
            layouts: Vec::new(),
            slots: Vec::new(),
            unexpected: Vec::new(),
            adopted: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    /// Source text of this session.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn push_token(
        &mut self,
        kind: SyntaxKind,
        range: TextRange,
        leading: Trivia,
        trailing: Trivia,
    ) -> NodeId {
        debug_assert!(kind.is_token());
        let id = self.tokens.len() as u32;
        self.tokens.push(TokenData { kind, range, leading, trailing, present: true });
        NodeId::Token(id)
    }

    /// Synthesizes an absent token of the expected kind at `offset`.
    pub fn missing_token(&mut self, kind: SyntaxKind, offset: TextSize) -> NodeId {
        debug_assert!(kind.is_token());
        let id = self.tokens.len() as u32;
        self.tokens.push(TokenData {
            kind,
            range: TextRange::empty(offset),
            leading: Trivia::empty(),
            trailing: Trivia::empty(),
            present: false,
        });
        NodeId::Token(id)
    }

    pub fn push_layout(
        &mut self,
        kind: SyntaxKind,
        children: &[NodeId],
        unexpected: &[UnexpectedEntry],
    ) -> NodeId {
        debug_assert!(kind.is_layout());
        if let Some(slots) = kind.slots() {
            debug_assert_eq!(
                slots.len(),
                children.len(),
                "arity mismatch for {kind:?}: expected {} slots, got {}",
                slots.len(),
                children.len(),
            );
        }
        debug_assert!(unexpected.windows(2).all(|pair| pair[0].before_slot <= pair[1].before_slot));

        let text_len = children
            .iter()
            .chain(unexpected.iter().map(|entry| &entry.node))
            .map(|&id| self.text_len_of(id))
            .sum();

        let slots_start = self.slots.len() as u32;
        self.slots.extend_from_slice(children);
        let unexpected_start = self.unexpected.len() as u32;
        self.unexpected.extend_from_slice(unexpected);

        let id = self.layouts.len() as u32;
        self.layouts.push(LayoutData {
            kind,
            slots_start,
            slots_len: children.len() as u32,
            unexpected_start,
            unexpected_len: unexpected.len() as u32,
            text_len,
        });
        NodeId::Layout(id)
    }

    /// Imports a node owned by `from` (or by one of its ancestors) by
    /// reference, keeping the owning arena alive as long as this one.
    pub fn adopt(&mut self, from: &Arc<Self>, node: NodeId) -> NodeId {
        let mut owner = from.clone();
        let mut node = node;
        while let NodeId::Adopted(index) = node {
            let entry = &owner.adopted[index as usize];
            let next = owner.ancestors[entry.ancestor as usize].clone();
            node = entry.node;
            owner = next;
        }

        let ancestor = match self.ancestors.iter().position(|arc| Arc::ptr_eq(arc, &owner)) {
            Some(index) => index as u32,
            None => {
                self.ancestors.push(owner);
                (self.ancestors.len() - 1) as u32
            }
        };

        let id = self.adopted.len() as u32;
        self.adopted.push(AdoptedData { ancestor, node });
        NodeId::Adopted(id)
    }

    /// Re-issues a finished layout with extra trailing unexpected nodes.
    ///
    /// Used by the top-level "parse remainder" step to attach leftover
    /// tokens to an already built root. Entries are clamped to the end of
    /// the slot sequence; the superseded layout simply becomes unreachable.
    pub fn extend_unexpected(&mut self, node: NodeId, extra: &[UnexpectedEntry]) -> NodeId {
        let NodeId::Layout(index) = node else {
            panic!("extend_unexpected requires a layout node");
        };
        let layout = &self.layouts[index as usize];
        let kind = layout.kind;
        let slots_start = layout.slots_start;
        let slots_len = layout.slots_len;
        let old_start = layout.unexpected_start as usize;
        let old_len = layout.unexpected_len as usize;
        let mut text_len = layout.text_len;

        let unexpected_start = self.unexpected.len() as u32;
        for i in 0..old_len {
            let entry = self.unexpected[old_start + i];
            self.unexpected.push(entry);
        }
        for entry in extra {
            text_len += self.text_len_of(entry.node);
            self.unexpected.push(UnexpectedEntry {
                before_slot: entry.before_slot.min(slots_len),
                node: entry.node,
            });
        }

        let id = self.layouts.len() as u32;
        self.layouts.push(LayoutData {
            kind,
            slots_start,
            slots_len,
            unexpected_start,
            unexpected_len: (old_len + extra.len()) as u32,
            text_len,
        });
        NodeId::Layout(id)
    }

    /// Total text length of a node, trivia included.
    pub fn text_len_of(&self, id: NodeId) -> TextSize {
        match id {
            NodeId::Token(index) => {
                let token = &self.tokens[index as usize];
                token.leading.len() + token.range.len() + token.trailing.len()
            }
            NodeId::Layout(index) => self.layouts[index as usize].text_len,
            NodeId::Adopted(index) => {
                let entry = &self.adopted[index as usize];
                self.ancestors[entry.ancestor as usize].text_len_of(entry.node)
            }
        }
    }
}
