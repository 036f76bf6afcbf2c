//! Binary entry point for the callscope CLI.
//!
//! ```bash
//! # Registry summary, optionally exported as JSON
//! callscope build-call-graph ./repo --out-file graph.json
//!
//! # Impact of the last commit
//! callscope analyze-impact ./repo --base HEAD~1 --target HEAD --output markdown
//!
//! # Who is affected if these change
//! callscope downstream ./repo pkg.mod.helper --depth 2
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use callscope_analysis::call_graph::{self, CallGraph, Unit};
use callscope_analysis::impact::{render, FullImpactReport, ImpactAnalyzer};
use callscope_core::config::{CallscopeConfig, CliOverrides};
use callscope_core::constants::MOST_CALLED_LIMIT;
use callscope_core::errors::{ErrorCode, ImpactError, PipelineError};
use callscope_core::tracing::setup::{init_tracing, init_tracing_with_default};

// ============================================================================
// CLI Structure
// ============================================================================

/// Static call graphs and change impact for Python code.
#[derive(Parser, Debug)]
#[command(
    name = "callscope",
    version,
    about = "Static call graphs and change impact for Python code"
)]
struct Cli {
    /// Log level for tracing output. `CALLSCOPE_LOG` takes precedence.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Worker threads for parsing (0 = one per core).
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn filter(self) -> String {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        format!("callscope={level}")
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the call graph and print the most-called functions.
    BuildCallGraph {
        /// Repository root.
        repo: PathBuf,
        /// Write the graph as JSON to this file.
        #[arg(long)]
        out_file: Option<PathBuf>,
    },

    /// Report the impact of every function changed between two revisions.
    AnalyzeImpact {
        /// Repository root (a git work tree).
        repo: PathBuf,
        #[arg(long, default_value = "HEAD~1")]
        base: String,
        #[arg(long, default_value = "HEAD")]
        target: String,
        /// Traversal depth in call edges.
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
        /// Write the rendered report to this file instead of stdout.
        #[arg(long)]
        out_file: Option<PathBuf>,
    },

    /// Report the impact of every function defined in one file.
    AnalyzeFileImpact {
        repo: PathBuf,
        /// File to analyze, absolute or relative to the repository root.
        file: PathBuf,
        #[arg(long)]
        depth: Option<u32>,
    },

    /// List units that transitively call the given units.
    Downstream {
        repo: PathBuf,
        #[arg(required = true)]
        qualified_names: Vec<String>,
        #[arg(long)]
        depth: Option<u32>,
    },

    /// List units the given unit transitively calls.
    Upstream {
        repo: PathBuf,
        qualified_name: String,
        #[arg(long)]
        depth: Option<u32>,
    },
}

// ============================================================================
// Entry
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.log_level {
        Some(level) => init_tracing_with_default(&level.filter()),
        None => init_tracing(),
    }

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.coded_string());
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), PipelineError> {
    let threads = cli.threads;
    match cli.command {
        Command::BuildCallGraph { repo, out_file } => {
            let config = load_config(&repo, threads, None)?;
            cmd_build_call_graph(&repo, &config, out_file.as_deref())
        }
        Command::AnalyzeImpact {
            repo,
            base,
            target,
            depth,
            output,
            out_file,
        } => {
            let config = load_config(&repo, threads, depth)?;
            let depth = config.impact.effective_max_depth();
            let mut analyzer = ImpactAnalyzer::new(&repo, config);
            let report = analyzer.analyze_commit(&base, &target, depth)?;
            emit_report(&report, output, out_file.as_deref())
        }
        Command::AnalyzeFileImpact { repo, file, depth } => {
            let config = load_config(&repo, threads, depth)?;
            let depth = config.impact.effective_max_depth();
            let mut analyzer = ImpactAnalyzer::new(&repo, config);
            let report = analyzer.analyze_file(&file, depth)?;
            print_file_impact(&file, &report);
            Ok(())
        }
        Command::Downstream {
            repo,
            qualified_names,
            depth,
        } => {
            let config = load_config(&repo, threads, depth)?;
            let graph = build_graph(&repo, &config)?;
            let known: Vec<&str> = qualified_names
                .iter()
                .map(String::as_str)
                .filter(|qn| {
                    let found = graph.contains(qn);
                    if !found {
                        tracing::warn!(qualified_name = %qn, "unknown unit, skipping");
                    }
                    found
                })
                .collect();
            let units =
                call_graph::downstream(&graph, known, config.impact.effective_max_depth());
            print_units(&units);
            Ok(())
        }
        Command::Upstream {
            repo,
            qualified_name,
            depth,
        } => {
            let config = load_config(&repo, threads, depth)?;
            let graph = build_graph(&repo, &config)?;
            if !graph.contains(&qualified_name) {
                tracing::warn!(qualified_name = %qualified_name, "unknown unit");
            }
            let units =
                call_graph::upstream(&graph, &qualified_name, config.impact.effective_max_depth());
            print_units(&units);
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_build_call_graph(
    repo: &Path,
    config: &CallscopeConfig,
    out_file: Option<&Path>,
) -> Result<(), PipelineError> {
    let graph = build_graph(repo, config)?;
    let stats = graph.stats();

    println!("Found {} functions.", graph.len());
    println!(
        "Scanned {} files ({} failed), {} call edges, {} cycles, {:.1}% of call sites resolved.",
        stats.files_scanned,
        stats.files_failed,
        stats.total_edges,
        stats.cycles_detected,
        stats.diagnostics.resolution_rate() * 100.0
    );

    let most_called = graph.most_called(MOST_CALLED_LIMIT);
    if !most_called.is_empty() {
        println!("\nTop {MOST_CALLED_LIMIT} most-called functions:");
        for unit in most_called {
            println!(
                "  {} - called by {} functions",
                unit.qualified_name,
                unit.called_by.len()
            );
        }
    }

    if let Some(path) = out_file {
        let json = call_graph::export::to_json(&graph)?;
        write_file(path, &json)?;
        println!("\nCall graph saved to {}", path.display());
    }
    Ok(())
}

fn emit_report(
    report: &FullImpactReport,
    format: OutputFormat,
    out_file: Option<&Path>,
) -> Result<(), PipelineError> {
    let rendered = match format {
        OutputFormat::Console => render::to_console(report),
        OutputFormat::Json => render::to_json(report)?,
        OutputFormat::Markdown => render::to_markdown(report),
    };
    match out_file {
        Some(path) => {
            write_file(path, &rendered)?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn print_file_impact(file: &Path, report: &FullImpactReport) {
    const SHOWN: usize = 5;

    println!("Analyzing {}", file.display());
    println!("Found {} function(s):\n", report.function_reports.len());
    for fr in &report.function_reports {
        println!(
            "  {} (line {}): {} downstream, {} upstream, risk {}",
            fr.function_name, fr.line, fr.downstream_count, fr.upstream_count, fr.risk_level
        );
        for affected in fr.downstream.iter().take(SHOWN) {
            println!("    -> {} ({}:{})", affected.qualified_name, affected.file_path, affected.line);
        }
        if fr.downstream.len() > SHOWN {
            println!("    ... and {} more", fr.downstream.len() - SHOWN);
        }
    }
}

fn print_units(units: &[&Unit]) {
    if units.is_empty() {
        println!("No units reached.");
        return;
    }
    for unit in units {
        println!(
            "{} ({}:{})",
            unit.qualified_name,
            unit.file_path.display(),
            unit.start_line
        );
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(
    repo: &Path,
    threads: Option<usize>,
    depth: Option<u32>,
) -> Result<CallscopeConfig, PipelineError> {
    let overrides = CliOverrides {
        scan_threads: threads,
        impact_max_depth: depth,
        ..Default::default()
    };
    Ok(CallscopeConfig::load(repo, Some(&overrides))?)
}

fn build_graph(repo: &Path, config: &CallscopeConfig) -> Result<CallGraph, PipelineError> {
    Ok(call_graph::CallGraphBuilder::new(config).build(repo)?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    std::fs::write(path, contents).map_err(|source| {
        ImpactError::Io {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}
