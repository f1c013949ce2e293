//! Diagnostics for the sable parser: severities, notes, fix-its, and the
//! source edits that back both fix-it application and incremental reparse.

use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::{TextRange, TextSize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// A secondary message anchored to its own range, e.g. pointing back at the
/// opening delimiter that a missing closing delimiter should match.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Note {
    message: String,
    range: TextRange,
}

impl Note {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }
}

/// A byte range plus replacement text.
///
/// Used both to materialize fix-its and to describe the invalidated region
/// of an incremental reparse.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceEdit {
    range: TextRange,
    replacement: String,
}

impl SourceEdit {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self { range, replacement: replacement.into() }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn remove(range: TextRange) -> Self {
        Self::replace(range, "")
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Length change this edit causes, in bytes.
    pub fn delta(&self) -> i64 {
        self.replacement.len() as i64 - u32::from(self.range.len()) as i64
    }
}

/// A machine-applicable correction: a human-readable description plus an
/// ordered list of source edits.
///
/// Fix-its attached to the same diagnostic are mutually alternative; fix-its
/// of different diagnostics are independently applicable.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FixIt {
    message: String,
    edits: Vec<SourceEdit>,
}

impl FixIt {
    pub fn new(message: impl Into<String>, edits: Vec<SourceEdit>) -> Self {
        Self { message: message.into(), edits }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn edits(&self) -> &[SourceEdit] {
        &self.edits
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    range: TextRange,
    notes: Vec<Note>,
    fix_its: Vec<FixIt>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            range,
            notes: Vec::new(),
            fix_its: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Warning, ..Self::error(message, range) }
    }

    #[must_use]
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    #[must_use]
    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_its.push(fix_it);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn fix_its(&self) -> &[FixIt] {
        &self.fix_its
    }

    /// Shifts the primary range and every attached range by `delta` bytes.
    ///
    /// Used when carrying diagnostics of a reused subtree across an edit.
    #[must_use]
    pub fn shifted(mut self, delta: i64) -> Self {
        self.range = shift(self.range, delta);
        for note in &mut self.notes {
            note.range = shift(note.range, delta);
        }
        for fix_it in &mut self.fix_its {
            for edit in &mut fix_it.edits {
                edit.range = shift(edit.range, delta);
            }
        }
        self
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = match self.severity {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warning,
        };
        let mut snippet = Snippet::source(text)
            .origin(path)
            .annotation(level.span(self.range.into()).label("here"))
            .fold(true);
        for note in &self.notes {
            snippet = snippet.annotation(Level::Info.span(note.range.into()).label(&note.message));
        }
        let mut message = level.title(&self.message).snippet(snippet);
        for fix_it in &self.fix_its {
            message = message.footer(Level::Help.title(&fix_it.message));
        }
        renderer.render(message)
    }
}

fn shift(range: TextRange, delta: i64) -> TextRange {
    let start = (u32::from(range.start()) as i64 + delta).max(0) as u32;
    let end = (u32::from(range.end()) as i64 + delta).max(0) as u32;
    TextRange::new(start.into(), end.into())
}

/// Applies the edits of the chosen fix-its to `source`.
///
/// The caller picks at most one fix-it per diagnostic; edits across the
/// chosen set must not overlap.
pub fn apply_fix_its<'a>(source: &str, chosen: impl IntoIterator<Item = &'a FixIt>) -> String {
    let edits: Vec<&SourceEdit> = chosen.into_iter().flat_map(FixIt::edits).collect();
    apply_edits(source, edits)
}

/// Applies non-overlapping source edits to `source`.
pub fn apply_edits(source: &str, mut edits: Vec<&SourceEdit>) -> String {
    edits.sort_by_key(|edit| (edit.range().start(), edit.range().end()));
    debug_assert!(
        edits.windows(2).all(|pair| pair[0].range().end() <= pair[1].range().start()),
        "overlapping edits"
    );

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in edits {
        let range: std::ops::Range<usize> = edit.range().into();
        out.push_str(&source[cursor..range.start]);
        out.push_str(edit.replacement());
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn apply_insert_and_remove() {
        let source = "a ? b :";
        let fix_it = FixIt::new(
            "insert expression",
            vec![SourceEdit::insert(TextSize::new(7), " <#expression#>")],
        );
        assert_eq!(apply_fix_its(source, [&fix_it]), "a ? b : <#expression#>");

        let removal = FixIt::new("remove operator", vec![SourceEdit::remove(range(2, 4))]);
        assert_eq!(apply_fix_its(source, [&removal]), "a b :");
    }

    #[test]
    fn apply_multiple_fix_its_back_to_front() {
        let source = "let x = ";
        let a = FixIt::new("insert name", vec![SourceEdit::replace(range(4, 5), "y")]);
        let b = FixIt::new("insert expression", vec![SourceEdit::insert(TextSize::new(8), "0")]);
        assert_eq!(apply_fix_its(source, [&a, &b]), "let y = 0");
    }

    #[test]
    fn shifted_moves_all_ranges() {
        let diagnostic = Diagnostic::error("missing ')'", range(10, 11))
            .with_note(Note::new("to match this '('", range(2, 3)));
        let shifted = diagnostic.shifted(5);
        assert_eq!(shifted.range(), range(15, 16));
        assert_eq!(shifted.notes()[0].range(), range(7, 8));
    }

    #[test]
    fn reorder_fix_it_swaps_spans() {
        // Moving a keyword is modeled as one removal plus one insertion.
        let source = "() -> async Int";
        let fix_it = FixIt::new(
            "move 'async' before '->'",
            vec![SourceEdit::remove(range(6, 12)), SourceEdit::insert(TextSize::new(3), "async ")],
        );
        assert_eq!(apply_fix_its(source, [&fix_it]), "() async -> Int");
    }
}
