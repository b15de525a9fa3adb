//! Argument parsing and command dispatch for `docthis`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use dt_synth::{apply_edits, Documenter, EditOperation, Language, Position, Span, SynthConfig};

#[derive(Parser, Debug)]
#[command(name = "docthis")]
#[command(about = "Generate JSDoc comments for JavaScript and TypeScript")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON settings file (camelCase keys, unknown keys ignored)
    #[arg(long, global = true, env = "DOCTHIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Editor language id; inferred from the file extension when omitted
    #[arg(long, global = true)]
    pub language_id: Option<String>,

    /// Apply the edits to the file in place instead of printing them
    #[arg(long, global = true)]
    pub write: bool,

    /// Print edits, reports and traces as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Document the construct at a cursor
    This {
        file: PathBuf,
        #[command(flatten)]
        cursor: CursorArgs,
    },
    /// Document every eligible construct in the file
    Everything {
        file: PathBuf,
        /// First line of the range (1-based, inclusive)
        #[arg(long, requires = "to_line")]
        from_line: Option<u32>,
        /// Last line of the range (1-based, inclusive)
        #[arg(long, requires = "from_line")]
        to_line: Option<u32>,
        /// Refresh blocks that already exist
        #[arg(long)]
        overwrite: bool,
    },
    /// Show how a cursor resolves to a target
    Trace {
        file: PathBuf,
        #[command(flatten)]
        cursor: CursorArgs,
    },
}

/// 1-based cursor, as editors display it.
#[derive(Args, Debug, Clone, Copy)]
pub struct CursorArgs {
    #[arg(long)]
    pub line: u32,
    #[arg(long, default_value = "1")]
    pub column: u32,
}

impl CursorArgs {
    fn position(self) -> Result<Position> {
        if self.line == 0 || self.column == 0 {
            bail!("--line and --column are 1-based");
        }
        Ok(Position::new(self.line - 1, self.column - 1))
    }
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Self::This { file, .. } | Self::Everything { file, .. } | Self::Trace { file, .. } => {
                file
            }
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let documenter = Documenter::new(config);

    let path = cli.command.file();
    let language = resolve_language(path, cli.language_id.as_deref())?;
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), language = language.language_id(), "loaded source");

    match &cli.command {
        Command::This { cursor, .. } => {
            let edits = documenter.document_this(&source, language, cursor.position()?)?;
            emit_edits(&cli, path, &source, &edits)
        }
        Command::Everything {
            from_line,
            to_line,
            overwrite,
            ..
        } => {
            let bounds = match (from_line, to_line) {
                (Some(from), Some(to)) => {
                    if *from == 0 || to < from {
                        bail!("invalid line range {from}..{to}");
                    }
                    Some(Span::lines(from - 1, to - 1))
                }
                _ => None,
            };
            let outcome = documenter.document_everything(&source, language, bounds, *overwrite)?;
            if cli.json && !cli.write {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            let report = &outcome.report;
            eprintln!(
                "documented {} of {} ({} up to date, {} skipped)",
                report.documented,
                report.visited,
                report.up_to_date,
                report.total_skipped()
            );
            emit_edits(&cli, path, &source, &outcome.edits)
        }
        Command::Trace { cursor, .. } => {
            let trace = documenter.trace_node(&source, language, cursor.position()?)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&trace)?);
            } else {
                print!("{trace}");
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SynthConfig> {
    let Some(path) = path else {
        return Ok(SynthConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SynthConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn resolve_language(path: &Path, language_id: Option<&str>) -> Result<Language> {
    if let Some(id) = language_id {
        return Ok(Documenter::language_for_id(id)?);
    }
    let id = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    Language::from_path(path).ok_or_else(|| {
        dt_synth::SynthError::UnsupportedLanguage {
            language_id: id.to_string(),
        }
        .into()
    })
}

fn emit_edits(cli: &Cli, path: &Path, source: &str, edits: &[EditOperation]) -> Result<()> {
    if cli.write {
        if edits.is_empty() {
            tracing::info!(path = %path.display(), "nothing to change");
            return Ok(());
        }
        let updated = apply_edits(source, edits)?;
        fs::write(path, updated)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("applied {} edit(s) to {}", edits.len(), path.display());
    } else if cli.json {
        println!("{}", serde_json::to_string_pretty(edits)?);
    } else {
        print!("{}", apply_edits(source, edits)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cursor_is_one_based() {
        let cursor = CursorArgs { line: 3, column: 1 };
        assert_eq!(cursor.position().unwrap(), Position::new(2, 0));
        assert!(CursorArgs { line: 0, column: 1 }.position().is_err());
    }

    #[test]
    fn range_flags_come_in_pairs() {
        let err = Cli::try_parse_from(["docthis", "everything", "a.js", "--from-line", "2"]);
        assert!(err.is_err());
        let cli = Cli::try_parse_from([
            "docthis", "everything", "a.js", "--from-line", "2", "--to-line", "4", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Everything { from_line: Some(2), to_line: Some(4), .. }
        ));
    }

    #[test]
    fn language_from_extension_or_id() {
        assert_eq!(
            resolve_language(Path::new("x.tsx"), None).unwrap(),
            Language::TypeScriptReact
        );
        assert_eq!(
            resolve_language(Path::new("x.txt"), Some("javascript")).unwrap(),
            Language::JavaScript
        );
        let err = resolve_language(Path::new("x.py"), None).unwrap_err();
        let synth = err.downcast_ref::<dt_synth::SynthError>().unwrap();
        assert!(synth.is_silent());
    }

    #[test]
    fn write_applies_edits_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("add.js");
        fs::write(&file, "function add(a, b) {\n  return a + b;\n}\n").unwrap();

        let cli = Cli::try_parse_from([
            "docthis",
            "this",
            file.to_str().unwrap(),
            "--line",
            "2",
            "--column",
            "3",
            "--write",
        ])
        .unwrap();
        run(cli).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "/**\n *\n * @param a\n * @param b\n */\nfunction add(a, b) {\n  return a + b;\n}\n"
        );
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        fs::write(&config, r#"{ "returns": "always", "unknownKey": 1 }"#).unwrap();
        let loaded = load_config(Some(&config)).unwrap();
        assert_eq!(loaded.returns, dt_synth::ReturnsPolicy::Always);

        fs::write(&config, r#"{ "returnsTagName": "yields" }"#).unwrap();
        assert!(load_config(Some(&config)).is_err());
    }
}
