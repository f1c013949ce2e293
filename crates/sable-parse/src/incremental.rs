//! Incremental reparse: reusing untouched top-level items across an edit.
//!
//! A reusable item is adopted by reference into the new session's arena, so
//! the previous arena stays alive exactly as long as the new tree references
//! it. Reuse is by identity, which the caller can verify with
//! [`sable_syntax::RawNode::same_node`].

use sable_errors::{Diagnostic, SourceEdit, TextRange, TextSize, apply_edits};
use sable_syntax::SyntaxKind::CODE_BLOCK_ITEM;
use sable_syntax::{Arena, NodeId};
use triomphe::Arc;

use crate::parser::Parser;
use crate::{Parse, grammar};

#[derive(Clone)]
pub(crate) struct ReuseItem {
    node: NodeId,
    /// Full start (leading trivia included) in the edited source.
    new_start: TextSize,
    text_len: TextSize,
    /// Diagnostics carried over from the previous session, already shifted
    /// into the new coordinates.
    diagnostics: Vec<Diagnostic>,
}

pub(crate) struct ReuseMap {
    arena: Arc<Arena>,
    items: Vec<ReuseItem>,
    next: usize,
}

/// Re-parses after a single edit, adopting every top-level item the edit
/// cannot have touched.
pub fn reparse(previous: &Parse, edit: &SourceEdit) -> Parse {
    let new_text = apply_edits(previous.text(), vec![edit]);
    let delta = edit.delta();

    let map = collect_reusable(previous, edit, delta);
    let mut parser = Parser::new(&new_text);
    parser.reuse = Some(map);

    let root = grammar::decls::source_file(&mut parser);
    crate::finish(parser, root, "source file")
}

fn collect_reusable(previous: &Parse, edit: &SourceEdit, delta: i64) -> ReuseMap {
    let mut items = Vec::new();
    let root = previous.tree().root();

    let mut offset = TextSize::new(0);
    if let Some(list) = root.slot(0) {
        for (child, unexpected) in list.children_in_order_tagged() {
            let len = child.text_len();
            let start = offset;
            let end = offset + len;
            offset = end;

            if unexpected || child.kind() != CODE_BLOCK_ITEM {
                continue;
            }
            // Strictly clear of the edited range on either side; touching
            // the boundary could merge tokens across it.
            let before = end < edit.range().start();
            let after = start > edit.range().end();
            if !before && !after {
                continue;
            }

            let shift = if after { delta } else { 0 };
            let new_start = TextSize::new((u32::from(start) as i64 + shift) as u32);
            let span = TextRange::new(start, end);
            let diagnostics = previous
                .diagnostics()
                .iter()
                .filter(|diagnostic| span.contains_range(diagnostic.range()))
                .map(|diagnostic| diagnostic.clone().shifted(shift))
                .collect();

            items.push(ReuseItem { node: child.raw_id(), new_start, text_len: len, diagnostics });
        }
    }

    ReuseMap { arena: previous.tree().arena().clone(), items, next: 0 }
}

/// Called at each top-level item position: adopts the previous session's
/// item if one starts exactly here, skipping its tokens.
pub(crate) fn try_reuse(p: &mut Parser<'_>) -> Option<NodeId> {
    let full_start = p.current_full_start();

    let (arena, node, text_len, diagnostics) = {
        let map = p.reuse.as_mut()?;
        // Items the fresh parse has already moved past can never match.
        while map.items.get(map.next).is_some_and(|item| item.new_start < full_start) {
            map.next += 1;
        }
        let item = map.items.get(map.next)?;
        if item.new_start != full_start {
            return None;
        }
        let item = item.clone();
        map.next += 1;
        (map.arena.clone(), item.node, item.text_len, item.diagnostics)
    };

    for diagnostic in diagnostics {
        p.push_diagnostic(diagnostic);
    }
    let id = p.arena.adopt(&arena, node);
    p.skip_past(full_start + text_len);
    Some(id)
}
