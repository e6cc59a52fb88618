//! CLI for browsing the catalog tree from a terminal.
//!
//! Loads the catalog the same way the server does (fixture, retries,
//! default path) and prints the resulting tree.
//!
//! # Usage
//!
//! ```bash
//! # Load the catalog and print the tree with the default path opened
//! cargo run --bin catalog -- tree
//!
//! # Toggle nodes in order, then print the tree
//! cargo run --bin catalog -- expand domain:d2 technology:t7
//!
//! # Print every cached node as JSON
//! cargo run --bin catalog -- --no-default-path tree --json
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (`CATALOG_PATH`, `FETCH_RETRY_ATTEMPTS`, ...); flags
//! take priority.

use catalog_navigator::api::dto::tree::TreeResponse;
use catalog_navigator::application::services::{
    CatalogView, RootLoad, ToggleOutcome, ViewSnapshot,
};
use catalog_navigator::config::Config;
use catalog_navigator::domain::expansion::ExpansionState;
use catalog_navigator::domain::level::NodeKey;
use catalog_navigator::domain::tree::NodeRef;
use catalog_navigator::server::build_view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

/// CLI tool for browsing the catalog tree.
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON file (overrides CATALOG_PATH)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Do not open the default path after loading
    #[arg(long, global = true)]
    no_default_path: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and print the tree
    Tree {
        /// Print the snapshot as JSON instead of a tree
        #[arg(long)]
        json: bool,

        /// Also print cached children of collapsed nodes
        #[arg(short, long)]
        all: bool,
    },

    /// Toggle nodes in order, then print the tree
    Expand {
        /// Nodes as `level:id`, e.g. `domain:d1` or `tutorial:u3`
        #[arg(required = true)]
        keys: Vec<String>,

        /// Print the snapshot as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if cli.no_default_path {
        config.default_path_enabled = false;
    }
    config.validate()?;

    let view = build_view(&config)?;
    load(&view).await?;

    match cli.command {
        Commands::Tree { json, all } => {
            print_snapshot(&view.snapshot().await, json, all)?;
        }
        Commands::Expand { keys, json } => {
            let keys = keys
                .iter()
                .map(|raw| {
                    raw.parse::<NodeKey>()
                        .with_context(|| format!("Invalid node key '{raw}'"))
                })
                .collect::<Result<Vec<_>>>()?;

            for key in &keys {
                let outcome = view.toggle(key).await;
                print_outcome(key, &outcome);
            }
            println!();
            print_snapshot(&view.snapshot().await, json, false)?;
        }
    }

    Ok(())
}

async fn load(view: &CatalogView) -> Result<()> {
    let load = view
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {e}"))?;

    if let RootLoad::Loaded {
        domains,
        default_path,
    } = load
    {
        println!(
            "{} {} domains, default path depth {}",
            "Loaded".green().bold(),
            domains.to_string().bright_white().bold(),
            default_path.depth()
        );
        println!();
    }
    Ok(())
}

fn print_outcome(key: &NodeKey, outcome: &ToggleOutcome) {
    let label = match outcome {
        ToggleOutcome::Fetched { count } => format!("fetched {count}").green(),
        ToggleOutcome::Shown { count } => format!("shown {count} (cached)").cyan(),
        ToggleOutcome::Hidden => "hidden".bright_black(),
        ToggleOutcome::AlreadyLoading => "already loading".yellow(),
        ToggleOutcome::Failed(e) => format!("failed: {e}").red(),
        ToggleOutcome::NotFound => "not in cache".red(),
        ToggleOutcome::Leaf => "leaf".bright_black(),
        ToggleOutcome::Stale => "stale".yellow(),
    };
    println!("  {} {}", key.to_string().bright_white(), label);
}

fn print_snapshot(snapshot: &ViewSnapshot, json: bool, all: bool) -> Result<()> {
    if json {
        let body = serde_json::to_string_pretty(&TreeResponse::from(snapshot))?;
        println!("{body}");
        return Ok(());
    }

    let Some(domains) = snapshot.tree.domains().items() else {
        println!("{}", "  Catalog not loaded".yellow());
        return Ok(());
    };
    if domains.is_empty() {
        println!("{}", "  No domains".yellow());
    }
    for domain in domains {
        print_node(NodeRef::Domain(domain), snapshot, 0, all);
    }
    Ok(())
}

/// Prints a node, then its children when it is expanded (or `all` is set).
///
/// ```text
/// v Web Development  domain:d1
///   v HTML  technology:t1
///     > Intro to HTML  tutorial:u1
///   - CSS  technology:t2
/// ```
fn print_node(node: NodeRef<'_>, snapshot: &ViewSnapshot, depth: usize, all: bool) {
    let key = node.key();
    let indent = "  ".repeat(depth);
    let state = snapshot.node_state(&key);

    let marker = match (key.level.is_leaf(), state) {
        (true, _) => "*".normal(),
        (_, Some(ExpansionState::Expanding)) => "~".yellow(),
        (_, Some(s)) if s.is_expanded() => "v".green(),
        (_, Some(ExpansionState::CollapsedAfterExpand)) => ">".cyan(),
        _ => "-".bright_black(),
    };

    let mut line = format!(
        "{indent}{marker} {}  {}",
        node.label(),
        key.to_string().bright_black()
    );
    if let NodeRef::Lesson(lesson) = node {
        if let Some(minutes) = lesson.duration_minutes {
            line.push_str(&format!("  {minutes} min"));
        }
        if lesson.completed {
            line.push_str(&format!("  {}", "done".green()));
        }
    }
    if let Some(error) = snapshot.expansion.error(&key) {
        line.push_str(&format!("  {}", error.red()));
    }
    println!("{line}");

    let open = all || state.is_some_and(|s| s.is_expanded());
    if !open {
        return;
    }
    match node.children() {
        Some(children) if children.is_empty() => {
            println!("{indent}  {}", "(empty)".bright_black());
        }
        Some(children) => {
            for child in children {
                print_node(child, snapshot, depth + 1, all);
            }
        }
        None => {}
    }
}
