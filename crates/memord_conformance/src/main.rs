//! CLI entrypoint for the memord conformance suite.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use memord_conformance::{ConformanceCase, all_cases, run_cases};
use memord_core::order::MemOrder;
use memord_harness::structured_log::{LogEmitter, LogLevel, Outcome};
use memord_harness::{HarnessError, ThreadPolicy, TrialConfig};

/// CLI for running the memory-ordering conformance matrix.
#[derive(Debug, Parser)]
#[command(name = "memord-conformance")]
#[command(about = "Memory-ordering conformance suite for atomic primitives")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List the registered conformance cases.
    List,
    /// Run conformance cases and write reports.
    Run {
        /// Restrict to cases whose store side is bound to this memory order.
        #[arg(long)]
        order: Option<String>,
        /// Restrict to case names containing this substring.
        #[arg(long)]
        case: Option<String>,
        /// Override the trial count per case.
        #[arg(long)]
        trials: Option<u32>,
        /// Override the publication reader count.
        #[arg(long)]
        readers: Option<usize>,
        /// Spin-wait cap in iterations; 0 disables the cap.
        #[arg(long)]
        spin_cap: Option<u64>,
        /// Disable thread spawning (provers pass trivially).
        #[arg(long)]
        no_threads: bool,
        /// Output markdown report path.
        #[arg(long)]
        report_md: Option<PathBuf>,
        /// Output json report path.
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Output JSONL log path (defaults to stderr).
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run_cli(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("memord-conformance: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<ExitCode, HarnessError> {
    match cli.command {
        Command::List => {
            for case in all_cases() {
                println!(
                    "{:<40} {:<20} {:<8} -> {:<8} {:<13} {}",
                    case.name,
                    case.prover.label(),
                    case.order.label(),
                    case.load_order.label(),
                    case.op.label(),
                    case.cell_type,
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            order,
            case,
            trials,
            readers,
            spin_cap,
            no_threads,
            report_md,
            report_json,
            log,
        } => {
            let order_filter = match order {
                Some(raw) => Some(
                    MemOrder::from_str_loose(&raw).ok_or(HarnessError::UnknownOrder(raw))?,
                ),
                None => None,
            };

            let mut cfg = TrialConfig::default();
            if let Some(trials) = trials {
                cfg = cfg.with_trials(trials);
            }
            if let Some(readers) = readers {
                cfg = cfg.with_publish_readers(readers);
            }
            if let Some(cap) = spin_cap {
                cfg = cfg.with_spin_cap((cap != 0).then_some(cap));
            }
            if no_threads {
                cfg = cfg.with_threads(ThreadPolicy::Disabled);
            }

            let cases: Vec<ConformanceCase> = all_cases()
                .into_iter()
                .filter(|c| order_filter.is_none_or(|f| c.order == f))
                .filter(|c| case.as_deref().is_none_or(|needle| c.name.contains(needle)))
                .collect();
            if cases.is_empty() {
                return Err(HarnessError::InvalidConfig(
                    "no cases match the given filters".to_string(),
                ));
            }

            let mut emitter = match &log {
                Some(path) => LogEmitter::to_file(path, "memord::conformance")?,
                None => LogEmitter::to_stderr("memord::conformance"),
            };
            emitter.emit_entry(
                memord_harness::structured_log::LogEntry::new(
                    "",
                    LogLevel::Info,
                    "run_start",
                )
                .with_trials(cfg.trials)
                .with_readers(cfg.publish_readers),
            )?;

            let report = run_cases(&cfg, &cases, "memord conformance");

            for result in &report.results {
                let outcome = if result.passed {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                let mut entry = memord_harness::structured_log::LogEntry::new(
                    "",
                    if result.passed {
                        LogLevel::Info
                    } else {
                        LogLevel::Error
                    },
                    "case_end",
                )
                .with_order(result.order.clone())
                .with_operation(result.operation.clone())
                .with_cell_type(result.cell_type.clone())
                .with_outcome(outcome)
                .with_duration_ms(result.duration_ms);
                if let Some(detail) = &result.detail {
                    entry = entry.with_detail(serde_json::Value::String(detail.clone()));
                }
                emitter.emit_entry(entry)?;
            }
            emitter.emit(LogLevel::Info, "run_end")?;
            emitter.flush()?;

            if let Some(path) = report_md {
                fs::write(path, report.to_markdown())?;
            }
            if let Some(path) = report_json {
                fs::write(path, report.to_json())?;
            }

            println!(
                "{}: {}/{} passed (digest {})",
                report.title,
                report.summary.passed,
                report.summary.total,
                report.digest(),
            );

            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
