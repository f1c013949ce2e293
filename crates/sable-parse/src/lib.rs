//! Total, full-fidelity parser for sable.
//!
//! Every entry point takes source text and returns a [`Parse`]: a lossless
//! raw tree plus an ordered list of diagnostics. Parsing cannot fail;
//! arbitrarily malformed input still yields a complete tree whose
//! reconstructed text is byte-identical to the input.
//!
//! After parsing the requested construct, each entry point drains whatever
//! tokens remain into the root's unexpected bucket ("parse remainder"), so
//! no input is ever silently discarded.

use sable_errors::Diagnostic;
pub use sable_errors::{FixIt, Note, SourceEdit, Severity, apply_fix_its};
use sable_syntax::{NodeId, SyntaxTree};
use triomphe::Arc;

mod grammar;
pub mod incremental;
mod parser;
mod recovery;
mod strings;
#[cfg(test)]
mod tests;

pub use incremental::reparse;

use parser::{Flavor, Parser};

/// Result of one parse session.
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Diagnostics in tree order. Never a reason for a missing tree.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn text(&self) -> &str {
        self.tree.text()
    }

    /// Tree rendering plus diagnostic lines, for snapshot tests.
    pub fn debug_dump(&self) -> String {
        let mut out = self.tree.debug_dump();
        out.push_str("---\n");
        for diagnostic in &self.diagnostics {
            out.push_str(&format!("{:?}: {}\n", diagnostic.range(), diagnostic.message()));
        }
        out
    }
}

impl std::fmt::Debug for Parse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parse").field("diagnostics", &self.diagnostics.len()).finish_non_exhaustive()
    }
}

pub(crate) fn finish(mut parser: Parser<'_>, node: NodeId, what: &str) -> Parse {
    let node = parser.finish_root(node, what);
    let (arena, diagnostics) = parser.finish();
    Parse { tree: SyntaxTree::new(Arc::new(arena), node), diagnostics }
}

fn run(text: &str, what: &str, parse: impl FnOnce(&mut Parser<'_>) -> NodeId) -> Parse {
    let mut parser = Parser::new(text);
    let node = parse(&mut parser);
    finish(parser, node, what)
}

pub fn source_file(text: &str) -> Parse {
    run(text, "source file", grammar::decls::source_file)
}

pub fn declaration(text: &str) -> Parse {
    run(text, "declaration", grammar::decls::declaration)
}

pub fn expression(text: &str) -> Parse {
    run(text, "expression", |p| grammar::exprs::expr(p, Flavor::default()))
}

pub fn statement(text: &str) -> Parse {
    run(text, "statement", grammar::stmts::statement)
}

pub fn pattern(text: &str) -> Parse {
    run(text, "pattern", |p| grammar::patterns::pattern(p, None))
}

pub fn type_(text: &str) -> Parse {
    run(text, "type", |p| grammar::types::type_(p, None))
}

pub fn code_block(text: &str) -> Parse {
    run(text, "code block", grammar::stmts::code_block)
}

pub fn code_block_item(text: &str) -> Parse {
    run(text, "code block item", grammar::decls::code_block_item)
}

pub fn member_block(text: &str) -> Parse {
    run(text, "member block", grammar::decls::member_block)
}

pub fn accessor_block(text: &str) -> Parse {
    run(text, "accessor block", grammar::decls::accessor_block)
}

pub fn accessor_declaration(text: &str) -> Parse {
    run(text, "accessor declaration", grammar::decls::accessor_decl)
}

pub fn attribute(text: &str) -> Parse {
    run(text, "attribute", grammar::decls::attribute)
}

pub fn availability_macro_definition(text: &str) -> Parse {
    run(text, "availability macro definition", grammar::decls::availability_macro_definition)
}

pub fn version_tuple(text: &str) -> Parse {
    run(text, "version tuple", grammar::decls::version_tuple)
}

pub fn function_parameter(text: &str) -> Parse {
    run(text, "function parameter", grammar::decls::function_parameter)
}

pub fn enum_case_parameter(text: &str) -> Parse {
    run(text, "enum case parameter", grammar::decls::enum_case_parameter)
}

pub fn generic_parameter_clause(text: &str) -> Parse {
    run(text, "generic parameter clause", grammar::decls::generic_parameter_clause)
}

pub fn closure_parameter(text: &str) -> Parse {
    run(text, "closure parameter", grammar::exprs::closure_parameter)
}

pub fn catch_clause(text: &str) -> Parse {
    run(text, "catch clause", grammar::stmts::catch_clause)
}

pub fn switch_case(text: &str) -> Parse {
    run(text, "switch case", grammar::stmts::switch_case)
}
