use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use rayon::prelude::*;

use tocsync::cache::OutlineCache;
use tocsync::read::{outline_file, read_document, walk::collect_documents};
use tocsync::track::{evaluate, positions_from_str};
use tocsync::{extract_with, format, Config, Result};

/// Markdown table of contents with scroll-synchronized active heading.
#[derive(Parser)]
#[command(name = "tocsync", version, about)]
struct Cli {
    /// Config file. Default: ./tocsync.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the outline of markdown files or of every markdown file under directories.
    Outline {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Emit JSON instead of an indented list.
        #[arg(long)]
        json: bool,
        /// Only walked files matching this glob (relative to the directory).
        #[arg(long)]
        glob: Option<String>,
    },
    /// Print the heading active for a set of anchor positions.
    Active {
        /// Markdown file, or `-` for stdin.
        file: PathBuf,
        /// JSON object of heading id -> offset from viewport top; file or `-` for stdin.
        #[arg(long)]
        positions: PathBuf,
        /// Trigger line distance from the viewport top.
        #[arg(long)]
        offset: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Run as an MCP server over stdio.
    Mcp,
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("TOCSYNC_LOG", "warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match cli.command {
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tocsync", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Command::Mcp => {
            let config = Config::discover(cli.config.as_deref(), &cwd)?;
            tocsync::mcp::run(&config).map_err(|e| tocsync::TocError::from_io("<stdio>", e))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Outline { paths, json, glob } => {
            let config = Config::discover(cli.config.as_deref(), &cwd)?;
            print_outlines(&paths, json, glob.as_deref(), &config)
        }
        Command::Active {
            file,
            positions,
            offset,
            json,
        } => {
            let config = Config::discover(cli.config.as_deref(), &cwd)?;
            if file.as_os_str() == "-" && positions.as_os_str() == "-" {
                return Err(tocsync::TocError::InvalidPositions {
                    reason: "document and positions cannot both come from stdin".into(),
                });
            }
            let content = read_input(&file)?;
            let positions = positions_from_str(&read_input(&positions)?)?;
            let outline = extract_with(&content, &config.slug);
            let active = evaluate(&outline, &positions, offset.unwrap_or(config.trigger_offset));

            let mut out = io::stdout().lock();
            let written = if json {
                writeln!(out, "{}", serde_json::json!({ "active": active }))
            } else {
                match active {
                    Some(id) => writeln!(out, "{id}"),
                    None => Ok(()),
                }
            };
            written.map_err(|e| tocsync::TocError::from_io("<stdout>", e))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_outlines(paths: &[PathBuf], json: bool, glob: Option<&str>, config: &Config) -> Result<ExitCode> {
    let files = collect_documents(paths, glob)?;
    let cache = OutlineCache::new();

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, outline_file(path, &config.slug, &cache)))
        .collect();

    let mut failed = false;
    let mut out = io::stdout().lock();
    let mut documents = Vec::new();

    for (path, result) in results {
        let outline = match result {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
                continue;
            }
        };
        for id in tocsync::duplicate_ids(&outline) {
            log::warn!("{}: duplicate anchor id {id:?}", path.display());
        }

        if json {
            let mut doc = format::render_json(&outline, None);
            doc["path"] = serde_json::json!(path.display().to_string());
            documents.push(doc);
        } else {
            let written = writeln!(
                out,
                "{}\n\n{}",
                format::outline_header(path, outline.len()),
                format::render_text(&outline, None)
            );
            written.map_err(|e| tocsync::TocError::from_io("<stdout>", e))?;
        }
    }

    if json {
        writeln!(out, "{}", serde_json::Value::Array(documents))
            .map_err(|e| tocsync::TocError::from_io("<stdout>", e))?;
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// File contents, or all of stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| tocsync::TocError::from_io("<stdin>", e))?;
        return Ok(buf);
    }
    read_document(path)
}
