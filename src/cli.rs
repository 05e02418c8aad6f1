use crate::config::{DelegateFailurePolicy, LayoutConfig, load_config};
use crate::ir::FlowGraph;
use crate::layout::{DagreDelegate, compute_layout_report};
use crate::layout_dump::write_layout_dump;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "flowlayout",
    version,
    about = "Lay out a flow graph (nodes + edges JSON) left to right"
)]
pub struct Args {
    /// Input graph (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum gap between nodes of one rank
    #[arg(long = "spacing")]
    pub spacing: Option<f32>,

    /// Width for nodes without explicit or measured size
    #[arg(long = "default-width")]
    pub default_width: Option<f32>,

    /// Height for nodes without explicit or measured size
    #[arg(long = "default-height")]
    pub default_height: Option<f32>,

    /// What to do when a group cannot be laid out
    #[arg(long = "on-delegate-error", value_enum)]
    pub on_delegate_error: Option<DelegateFailurePolicy>,

    /// Lay out groups one after another
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Also write a JSON dump of groups and raw coordinates
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = apply_args(load_config(args.config.as_deref())?, &args);
    config.validate()?;

    let input = read_input(args.input.as_deref())?;
    let mut graph: FlowGraph =
        serde_json::from_str(&input).context("input is not a flow graph document")?;

    let report = compute_layout_report(&DagreDelegate, &graph.nodes, &graph.edges, &config)?;
    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &report, &config)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }
    graph.nodes = report.nodes;

    let json = if args.pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    write_output(&json, args.output.as_deref())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_args(mut config: LayoutConfig, args: &Args) -> LayoutConfig {
    if let Some(v) = args.spacing {
        config.spacing = v;
    }
    if let Some(v) = args.default_width {
        config.default_width = v;
    }
    if let Some(v) = args.default_height {
        config.default_height = v;
    }
    if let Some(v) = args.on_delegate_error {
        config.on_delegate_error = v;
    }
    if args.sequential {
        config.parallel = false;
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
