//! Trivia pieces attached to tokens.

use text_size::TextSize;
use triomphe::ThinArc;

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
}

impl TriviaPieceKind {
    /// Returns `true` if this piece ends the current line.
    pub fn has_newline(self) -> bool {
        matches!(self, Self::Newline)
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}

/// An immutable, cheaply clonable run of trivia pieces.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Trivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl std::fmt::Debug for Trivia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl Trivia {
    pub fn new(pieces: &[TriviaPiece]) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }
        let total_len = pieces.iter().map(|piece| piece.len).sum();
        Self { ptr: Some(ThinArc::from_header_and_slice(total_len, pieces)) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn len(&self) -> TextSize {
        match self.ptr {
            None => TextSize::new(0),
            Some(ref ptr) => ptr.header.header,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trivia_has_no_pieces() {
        let trivia = Trivia::empty();
        assert!(trivia.is_empty());
        assert_eq!(trivia.len(), TextSize::new(0));
        assert_eq!(trivia.pieces(), &[]);
    }

    #[test]
    fn total_len_sums_pieces() {
        let trivia = Trivia::new(&[
            TriviaPiece::new(TriviaPieceKind::Whitespace, 4.into()),
            TriviaPiece::new(TriviaPieceKind::LineComment, 10.into()),
            TriviaPiece::new(TriviaPieceKind::Newline, 1.into()),
        ]);
        assert_eq!(trivia.len(), TextSize::new(15));
        assert_eq!(trivia.pieces().len(), 3);
    }
}
