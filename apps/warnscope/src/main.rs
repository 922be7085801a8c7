//! Warnscope CLI binary entry point.
//! Resolves configuration, delegates to the recorder or the history and
//! prints results.

use clap::Parser;
use std::path::Path;
use std::process;
use warnscope::cli::{Cli, Commands};
use warnscope::config::{self, Effective, Overrides};
use warnscope::error::WarnscopeError;
use warnscope::history::BuildHistory;
use warnscope::models::{BuildRecord, JobResult, Severity};
use warnscope::record::{self, RecordRequest};
use warnscope::{logging, output, tokens, utils};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), message);
    process::exit(2);
}

fn effective(overrides: &Overrides<'_>) -> Effective {
    config::resolve_effective(overrides).unwrap_or_else(|e| fail(e))
}

fn load_build(eff: &Effective, build: Option<u64>) -> BuildRecord {
    BuildHistory::new(&eff.history_dir)
        .load_or_latest(build)
        .unwrap_or_else(|e| fail(e))
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Record {
            repo_root,
            config,
            output,
            history_dir,
            job_result,
            console,
        } => {
            let eff = effective(&Overrides {
                repo_root: repo_root.as_deref(),
                config: config.as_deref(),
                output: output.as_deref(),
                history_dir: history_dir.as_deref(),
            });
            if eff.config_path.is_none() {
                eprintln!(
                    "{} No warnscope.toml found in {}; add [[tools]] to record builds.",
                    utils::note_prefix(),
                    eff.repo_root.display()
                );
            }
            let job_result = match job_result.as_deref() {
                None => JobResult::Success,
                Some(s) => JobResult::parse(s).unwrap_or_else(|| {
                    fail(format!(
                        "Unknown job result '{}' (expected success|unstable|failure)",
                        s
                    ))
                }),
            };
            let req = RecordRequest {
                job_result,
                console: console.as_deref().map(Path::new),
            };
            let record = record::run_record(&eff, &req).unwrap_or_else(|e| fail(e));
            output::print_record(&record, &eff.output);
            if record.overall == JobResult::Failure {
                process::exit(1);
            }
        }
        Commands::Show {
            repo_root,
            history_dir,
            build,
            tool,
            severity,
            output,
        } => {
            let eff = effective(&Overrides {
                repo_root: repo_root.as_deref(),
                output: output.as_deref(),
                history_dir: history_dir.as_deref(),
                ..Overrides::default()
            });
            let severity = severity.as_deref().map(|s| {
                Severity::parse(s).unwrap_or_else(|| {
                    fail(format!(
                        "Unknown severity '{}' (expected error|high|normal|low)",
                        s
                    ))
                })
            });
            let record = load_build(&eff, build);
            let results = match tool.as_deref() {
                Some(id) => match record.find(id) {
                    Some(r) => vec![r],
                    None => fail(WarnscopeError::ResultNotFound {
                        id: id.to_string(),
                        build: record.number,
                    }),
                },
                None => record.published(),
            };
            if results.is_empty() {
                eprintln!(
                    "{} Build #{} has no results.",
                    utils::info_prefix(),
                    record.number
                );
            }
            for (i, r) in results.into_iter().enumerate() {
                if i > 0 && eff.output != "json" {
                    println!();
                }
                output::print_show(r, severity, &eff.repo_root, &eff.output);
            }
        }
        Commands::Source {
            repo_root,
            history_dir,
            build,
            file,
        } => {
            let eff = effective(&Overrides {
                repo_root: repo_root.as_deref(),
                history_dir: history_dir.as_deref(),
                ..Overrides::default()
            });
            let history = BuildHistory::new(&eff.history_dir);
            let number = match build {
                Some(n) => n,
                None => history.latest().map(|r| r.number).unwrap_or_else(|e| fail(e)),
            };
            let content = history.read_source(number, &file).unwrap_or_else(|e| fail(e));
            print!("{}", content);
        }
        Commands::Expand {
            repo_root,
            history_dir,
            build,
            template,
        } => {
            let eff = effective(&Overrides {
                repo_root: repo_root.as_deref(),
                history_dir: history_dir.as_deref(),
                ..Overrides::default()
            });
            let record = load_build(&eff, build);
            println!("{}", tokens::expand(&template, &record));
        }
    }
}
