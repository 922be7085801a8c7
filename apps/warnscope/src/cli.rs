//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "warnscope",
    version,
    about = "Static-analysis warnings recorder",
    long_about = "Warnscope parses static-analysis reports (CheckStyle, PMD, FindBugs, CPD, Maven, Eclipse ECJ), tracks new, fixed and outstanding issues across builds, and evaluates quality gates.\n\nConfiguration precedence: CLI > warnscope.toml > defaults.",
    after_help = "Examples:\n  warnscope record --job-result success\n  warnscope record --console build.log --output json\n  warnscope show --tool checkstyle --severity high\n  warnscope expand '${ANALYSIS_ISSUES_COUNT, type=\"NEW\"}'",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, help = "Enable debug diagnostics on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current warnscope version.")]
    Version,
    /// Record a new build
    #[command(
        about = "Record a build",
        long_about = "Scan the workspace for reports of all configured tools, compare them with the reference build and persist the result as a new build. Exits 1 when the overall result is FAILURE.",
        after_help = "Examples:\n  warnscope record\n  warnscope record --job-result unstable --console target/build.log"
    )]
    Record {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Config file (default: warnscope.toml|yaml|yml in repo root)")]
        config: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "History directory (default: .warnscope)")]
        history_dir: Option<String>,
        #[arg(long, help = "Result of the build so far: success|unstable|failure (default: success)")]
        job_result: Option<String>,
        #[arg(long, help = "Console log scanned by tools without a report pattern")]
        console: Option<String>,
    },
    /// Show a recorded result
    #[command(
        about = "Show a recorded result",
        long_about = "Print the summary, breakdown tabs and issues of a recorded build. Defaults to the latest build and its published result.",
        after_help = "Examples:\n  warnscope show\n  warnscope show --build 3 --tool pmd --output json"
    )]
    Show {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "History directory (default: .warnscope)")]
        history_dir: Option<String>,
        #[arg(long, help = "Build number (default: latest)")]
        build: Option<u64>,
        #[arg(long, help = "Result id (default: every published result)")]
        tool: Option<String>,
        #[arg(long, help = "Only list issues of this severity: error|high|normal|low")]
        severity: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Print the stored copy of an affected file
    #[command(
        about = "Print an affected source file",
        long_about = "Print the copy of an affected file that was stored with a build."
    )]
    Source {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "History directory (default: .warnscope)")]
        history_dir: Option<String>,
        #[arg(long, help = "Build number (default: latest)")]
        build: Option<u64>,
        #[arg(help = "Affected file, as shown by `warnscope show`")]
        file: String,
    },
    /// Expand token macros
    #[command(
        about = "Expand token macros",
        long_about = "Replace ${ANALYSIS_ISSUES_COUNT[, tool=\"id\"][, type=\"TYPE\"]} tokens in a template with the counts of a recorded build."
    )]
    Expand {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "History directory (default: .warnscope)")]
        history_dir: Option<String>,
        #[arg(long, help = "Build number (default: latest)")]
        build: Option<u64>,
        #[arg(help = "Template text")]
        template: String,
    },
}
