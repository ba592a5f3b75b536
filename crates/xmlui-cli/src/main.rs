use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::debug;
use xmlui_analysis::{completion_context, hover};
use xmlui_lexer::Scanner;
use xmlui_parser::{find_token_at_pos, LineCol, LineIndex, Node};

#[derive(Parser)]
#[command(name = "xmlui")]
#[command(about = "Inspect and check XMLUI markup files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report syntax errors; exits non-zero when there are any
    Check {
        /// Input .xmlui file
        path: String,
        /// Print errors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the syntax tree
    Tree {
        /// Input .xmlui file
        path: String,
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream
    Tokens {
        /// Input .xmlui file
        path: String,
        /// Include whitespace, newline and comment tokens
        #[arg(long)]
        trivia: bool,
    },

    /// Show the tokens, completion context and hover at a position
    At {
        /// Input .xmlui file
        path: String,
        /// Byte offset, or LINE:COLUMN (1-based)
        position: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path, json } => cmd_check(&path, json),
        Command::Tree { path, json } => cmd_tree(&path, json),
        Command::Tokens { path, trivia } => cmd_tokens(&path, trivia),
        Command::At { path, position } => cmd_at(&path, &position),
    }
}

/// Log to stderr, filtered by `RUST_LOG`. Nothing is installed when it is unset.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => {
            debug!(path, bytes = source.len(), "read source");
            source
        }
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str, json: bool) {
    let source = read_source(path);
    let result = xmlui_parser::parse(&source);

    if json {
        print_json(&result.errors);
    } else {
        let index = LineIndex::new(&source);
        for error in &result.errors {
            println!("{path}:{}: {error}", index.line_col(error.pos));
        }
    }

    if !result.errors.is_empty() {
        eprintln!("{} error(s) in {path}", result.errors.len());
        std::process::exit(1);
    }
    eprintln!("OK: {path}");
}

fn cmd_tree(path: &str, json: bool) {
    let source = read_source(path);
    let result = xmlui_parser::parse(&source);

    if json {
        print_json(&result);
    } else {
        print!("{}", result.node.dump(&source));
    }
}

fn cmd_tokens(path: &str, trivia: bool) {
    let source = read_source(path);
    let index = LineIndex::new(&source);
    let (tokens, diagnostics) = Scanner::tokenize(&source, !trivia);

    for token in &tokens {
        println!(
            "{:<8} {:?} {}..{} {:?}",
            index.line_col(token.start).to_string(),
            token.kind,
            token.start,
            token.end,
            token.text(&source)
        );
    }
    for diagnostic in &diagnostics {
        eprintln!("{path}:{}: {diagnostic}", index.line_col(diagnostic.pos));
    }
}

fn cmd_at(path: &str, position: &str) {
    let source = read_source(path);
    let index = LineIndex::new(&source);
    let Some(offset) = parse_position(&index, position) else {
        eprintln!("Error: invalid position: {position}");
        std::process::exit(1);
    };

    let result = xmlui_parser::parse(&source);
    println!("offset {offset} ({})", index.line_col(offset));

    let Some(found) = find_token_at_pos(&result.node, offset) else {
        println!("no token at this position");
        return;
    };

    if let Some(before) = &found.chain_before_pos {
        println!("before: {}", describe_chain(before, &source));
    }
    println!("at:     {}", describe_chain(&found.chain_at_pos, &source));
    println!("shared: {} node(s)", found.shared_parents.len());
    println!("completion: {:?}", completion_context(&result, &source, offset));
    if let Some(info) = hover(&result, &source, offset) {
        println!("hover {}..{}: {}", info.pos, info.end, info.contents);
    }
}

/// A byte offset, or `LINE:COLUMN`.
fn parse_position(index: &LineIndex<'_>, position: &str) -> Option<usize> {
    match position.split_once(':') {
        Some((line, column)) => index.offset(LineCol {
            line: line.parse().ok()?,
            column: column.parse().ok()?,
        }),
        None => position.parse().ok(),
    }
}

fn describe_chain(chain: &[&Node], source: &str) -> String {
    chain
        .iter()
        .map(|node| {
            if node.is_token() {
                format!("{:?} {:?}", node.kind, node.text(source, true))
            } else {
                format!("{:?}", node.kind)
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}
