use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use sable_errors::Renderer;

#[derive(Parser)]
enum Options {
    /// Parse a source file and report diagnostics.
    Check { path: Utf8PathBuf },
    /// Parse a source file and dump the raw syntax tree.
    Dump { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    match Options::parse() {
        Options::Check { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;

            let renderer = Renderer::styled();
            let parse = sable_parse::source_file(&text);

            for diagnostic in parse.diagnostics() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }

            Ok(())
        }
        Options::Dump { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;

            let parse = sable_parse::source_file(&text);
            print!("{}", parse.tree().debug_dump());

            Ok(())
        }
    }
}
