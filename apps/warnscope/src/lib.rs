//! Warnscope core library.
//!
//! This crate records static-analysis warnings per build: it parses reports,
//! normalizes and post-processes issues, filters them, classifies them as
//! new, fixed or outstanding against a reference build, and evaluates
//! quality gates and a health report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Issues, results, build records and the recorder schema.
//! - `parsers`: Report parsers (CheckStyle, PMD, FindBugs, CPD, Maven, ECJ).
//! - `scan`: Report discovery and parallel parsing.
//! - `resolve`: Paths, source copies, modules, packages and fingerprints.
//! - `filter`: Include/exclude issue filters.
//! - `delta`: New/fixed/outstanding classification.
//! - `history`: Persisted builds and reference selection.
//! - `aggregate`: Composite result across tools.
//! - `gates`, `health`: Quality gates and health report.
//! - `stats`, `tokens`: Breakdowns/tabs and token macros.
//! - `record`: The recording pipeline.
//! - `output`: Human/JSON printers.
//! - `error`, `logging`, `utils`: Supporting pieces.
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod delta;
pub mod error;
pub mod filter;
pub mod gates;
pub mod health;
pub mod history;
pub mod logging;
pub mod models;
pub mod output;
pub mod parsers;
pub mod record;
pub mod resolve;
pub mod scan;
pub mod stats;
pub mod tokens;
pub mod utils;
