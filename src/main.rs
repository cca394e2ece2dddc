//! story-graph command line entrypoint

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use story_graph::{
    export_with_view, Choice, ExportConfig, ExportStatus, LogProgress, NodeKind, ProjectFile,
    StoryGraph, StoryNode, ValidationSeverity, Validator,
};

#[derive(Parser)]
#[command(name = "story-graph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export branching story graphs to Ren'Py scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a project to a .rpy script
    Export {
        /// Project JSON file
        project: PathBuf,

        /// Output script path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Export only these nodes and what they reach (repeatable, in order)
        #[arg(short, long = "select", value_name = "ID")]
        select: Vec<String>,

        /// Start whole-graph export at this node
        #[arg(long, value_name = "ID")]
        entry: Option<String>,

        /// Spaces per nesting level
        #[arg(long, value_name = "N")]
        indent: Option<usize>,

        /// Export settings JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Report dangling choices, unreachable nodes, cycles, and dead ends
    Check {
        /// Project JSON file
        project: PathBuf,

        /// Entry to check reachability from
        #[arg(long, value_name = "ID")]
        entry: Option<String>,
    },

    /// Write a small starter project
    New {
        /// Project JSON file to create
        project: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STORY_GRAPH_LOG")
                .unwrap_or_else(|_| EnvFilter::new("story_graph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Export {
            project,
            output,
            select,
            entry,
            indent,
            config,
        } => {
            let mut export_config = match config {
                Some(path) => ExportConfig::load(&path)?,
                None => ExportConfig::default(),
            };
            if let Some(entry) = entry {
                export_config.entry = Some(entry);
            }
            if let Some(indent) = indent {
                export_config.indent_width = indent;
            }
            export_config.validate()?;

            let graph = ProjectFile::load(&project)?;
            let mut view = LogProgress::new();
            let report = export_with_view(&graph, &output, &select, export_config, &mut view)
                .with_context(|| format!("Could not export {}", project.display()))?;

            match report.status {
                ExportStatus::Completed => {
                    println!(
                        "Exported {} node(s) to {}",
                        report.processed_nodes,
                        output.display()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                ExportStatus::Canceled => {
                    println!("export canceled");
                    Ok(ExitCode::from(2))
                }
            }
        }

        Command::Check { project, entry } => {
            let graph = ProjectFile::load(&project)?;
            let result = Validator::validate(&graph, entry.as_deref());

            if result.issues.is_empty() {
                println!("No issues found.");
            }
            for issue in &result.issues {
                let tag = match issue.severity {
                    ValidationSeverity::Info => "info",
                    ValidationSeverity::Warning => "warning",
                    ValidationSeverity::Error => "error",
                };
                println!("{}: {}", tag, issue.message);
                for id in &issue.affected_nodes {
                    println!("    {}", id);
                }
            }

            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::New { project } => {
            let graph = starter_graph()?;
            ProjectFile::save(&project, &graph)?;
            println!("Created {}", project.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn starter_graph() -> Result<StoryGraph> {
    let mut graph = StoryGraph::new();

    let ending = StoryNode::new(NodeKind::End)
        .titled("Ending")
        .scripted("\"The end.\"");
    let opening = StoryNode::new(NodeKind::Dialogue)
        .titled("Opening")
        .scripted("\"Once upon a time...\"")
        .with_choice(Choice::new("Continue", ending.id.clone()));

    let opening_id = opening.id.clone();
    graph.insert_node(opening)?;
    graph.insert_node(ending)?;
    graph.set_entry(&opening_id)?;

    Ok(graph)
}
