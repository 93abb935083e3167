use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dm_core::Value;
use dm_exec::{
    Engine, ExecError, ExecutionMode, NodeEvent, NoopObserver, Plan, RunOptions, TracingObserver,
};
use dm_graph::{Graph, GraphError, resolve};
use dm_project::{DagDef, ProjectError};
use tracing_subscriber::EnvFilter;

/// Starting value used when neither the command line nor the file sets one.
const DEFAULT_STARTING_VALUE: Value = 13;

#[derive(Parser)]
#[command(name = "dagman")]
#[command(about = "dagman - run a DAG of arithmetic nodes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a DAG file: structure, cycles, root/leaf and operations
    Validate {
        /// Path to the DAG file (YAML, or JSON by extension)
        dag_path: PathBuf,
    },
    /// Dump nodes with their successors and predecessors
    Show {
        /// Path to the DAG file
        dag_path: PathBuf,
    },
    /// Print the execution order
    Order {
        /// Path to the DAG file
        dag_path: PathBuf,
    },
    /// Execute the DAG and print the leaf's value
    Run {
        /// Path to the DAG file
        dag_path: PathBuf,
        /// Value fed to the root (overrides the file's starting_value)
        #[arg(long, allow_hyphen_values = true)]
        start: Option<Value>,
        /// Run independent nodes concurrently
        #[arg(long)]
        parallel: bool,
        /// Worker threads for --parallel (defaults to one per core)
        #[arg(long, requires = "parallel")]
        threads: Option<usize>,
        /// Print every executed node
        #[arg(short, long)]
        verbose: bool,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Configuration error: {0}")]
    Graph(#[from] GraphError),

    #[error("Execution error: {0}")]
    Exec(ExecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ExecError> for CliError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Graph(err) => CliError::Graph(err),
            other => CliError::Exec(other),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&cli))),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { dag_path } => cmd_validate(&dag_path),
        Commands::Show { dag_path } => cmd_show(&dag_path),
        Commands::Order { dag_path } => cmd_order(&dag_path),
        Commands::Run {
            dag_path,
            start,
            parallel,
            threads,
            verbose,
            json,
        } => {
            let mode = if parallel {
                ExecutionMode::Parallel { threads }
            } else {
                ExecutionMode::Sequential
            };
            cmd_run(&dag_path, start, RunOptions { mode }, verbose, json)
        }
    }
}

/// Log filter used when `RUST_LOG` is unset. A verbose JSON run reports
/// nodes through `TracingObserver`, which logs at `info`.
fn default_filter(cli: &Cli) -> &'static str {
    match cli.command {
        Commands::Run {
            verbose: true,
            json: true,
            ..
        } => "dm_exec=info,warn",
        _ => "warn",
    }
}

fn load(dag_path: &Path) -> CliResult<(DagDef, Graph)> {
    let dag = dm_project::load(dag_path)?;
    let graph = dag.builder().build()?;
    tracing::debug!(path = %dag_path.display(), nodes = graph.len(), "loaded DAG");
    Ok((dag, graph))
}

fn cmd_validate(dag_path: &Path) -> CliResult<()> {
    println!("Validating DAG: {}", dag_path.display());
    let dag = dm_project::load(dag_path)?;
    let (graph, warnings) = dag.builder().build_with_report()?;
    let plan = Plan::prepare(&graph)?;
    Engine::with_builtins().check_operations(&graph)?;

    for warning in &warnings {
        println!("  ⚠ {warning}");
    }
    println!(
        "✓ DAG is valid ({} nodes, {} transitions, root {}, leaf {})",
        graph.len(),
        graph.edges().len(),
        plan.root(),
        plan.leaf()
    );
    Ok(())
}

fn cmd_show(dag_path: &Path) -> CliResult<()> {
    let (dag, graph) = load(dag_path)?;
    let fallback = dag_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("DAG: {}", dag.display_name(&fallback));

    println!("Nodes:");
    for node in graph.nodes() {
        println!("  {} - {}", node.id, node.operation);
        println!("    next: {}", join(graph.successors(node.id.as_str())));
        println!("    after: {}", join(graph.predecessors(node.id.as_str())));
    }

    println!("Roots: {}", join(resolve::roots(&graph)));
    println!("Leaves: {}", join(resolve::leaves(&graph)));
    Ok(())
}

fn cmd_order(dag_path: &Path) -> CliResult<()> {
    let (_dag, graph) = load(dag_path)?;
    let order = dm_graph::sort::topological_order(&graph)?;
    for (i, id) in order.iter().enumerate() {
        println!("{:>3}. {}", i + 1, id);
    }
    Ok(())
}

fn cmd_run(
    dag_path: &Path,
    start: Option<Value>,
    options: RunOptions,
    verbose: bool,
    json: bool,
) -> CliResult<()> {
    let (dag, graph) = load(dag_path)?;
    let plan = Plan::prepare(&graph)?;
    let starting_value = start
        .or(dag.starting_value)
        .unwrap_or(DEFAULT_STARTING_VALUE);

    let engine = Engine::with_builtins();
    let print_node = |event: &NodeEvent<'_>| {
        println!(
            "executing node {} ({}) inputs {:?} -> {}",
            event.node, event.operation, event.inputs, event.output
        );
    };
    // stdout carries only the JSON document, so node events go to the log
    let outcome = match (verbose, json) {
        (true, false) => engine.execute(&plan, starting_value, &options, &print_node)?,
        (true, true) => engine.execute(&plan, starting_value, &options, &TracingObserver)?,
        (false, _) => engine.execute(&plan, starting_value, &options, &NoopObserver)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Result ({}): {}", outcome.leaf, outcome.result);
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
