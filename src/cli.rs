// src/cli.rs
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::catalog::{Catalog, Merger, normalize_name};
use crate::config::consts::DEFAULT_LOG_FILE;
use crate::config::options::{AppOptions, MandatoryPolicy, SolverKind};
use crate::csv::{Delim, rows_to_string};
use crate::ingest::{self, EventSource};
use crate::optimize::{self, Constraints, Outcome, Roster};
use crate::progress::Progress;
use crate::{Result, seed, store};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// No roster could be produced (infeasible or out of time).
pub const EXIT_NO_ROSTER: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "wm_roster", version, about = "Build a rider catalog and pick the best team under budget")]
pub struct Cli {
    /// TOML options file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_LOG_FILE)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the built-in backup catalog
    Seed {
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Merge saved startlists into a catalog
    Ingest {
        /// CODE=PATH, one per event (.html page or one name per line)
        #[arg(long = "event", value_name = "CODE=PATH", required = true)]
        events: Vec<EventSource>,
        /// Existing catalog to merge into (prices and points kept)
        #[arg(long, value_name = "FILE")]
        base: Option<PathBuf>,
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show what the catalog holds
    Status {
        file: Option<PathBuf>,
    },
    /// Pick the highest-scoring roster
    Optimize(OptimizeArgs),
}

#[derive(clap::Args, Debug)]
pub struct OptimizeArgs {
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub budget: Option<f64>,
    #[arg(long)]
    pub size: Option<usize>,
    /// Rider that must be in the team (repeatable)
    #[arg(long = "must", value_name = "NAME")]
    pub must: Vec<String>,
    /// Fail on --must names that are not in the catalog
    #[arg(long)]
    pub strict: bool,
    #[arg(long, value_enum)]
    pub solver: Option<SolverArg>,
    #[arg(long, value_name = "MS")]
    pub time_limit_ms: Option<u64>,
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolverArg {
    Bnb,
    Exhaustive,
}

impl From<SolverArg> for SolverKind {
    fn from(s: SolverArg) -> Self {
        match s {
            SolverArg::Bnb => SolverKind::Bnb,
            SolverArg::Exhaustive => SolverKind::Exhaustive,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

impl From<FormatArg> for Delim {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => Delim::Csv,
            FormatArg::Tsv => Delim::Tsv,
        }
    }
}

/// Prints one line per event to stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn log(&mut self, msg: &str) { eprintln!("{msg}"); }

    fn item_done(&mut self, code: &str, found: usize) {
        self.seen += 1;
        eprintln!("[{}/{}] {code}: {found} riders", self.seen, self.total);
    }

    fn item_failed(&mut self, code: &str, reason: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {code}: skipped ({reason})", self.seen, self.total);
    }
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose, cli.log_file.as_deref())?;
    execute(cli).map(ExitCode::from)
}

/// Run one parsed command; returns the process exit status.
pub fn execute(cli: Cli) -> Result<u8> {
    let opts = match &cli.config {
        Some(path) => AppOptions::load(path)?,
        None => AppOptions::default(),
    };
    let default_path = opts.store.catalog_path.clone();
    let path_or_default = |p: Option<PathBuf>| p.unwrap_or_else(|| default_path.clone());

    match cli.command {
        Command::Seed { out } => {
            let path = path_or_default(out);
            let catalog = seed::backup_catalog();
            store::save_catalog(&path, &catalog, &opts.event_codes())?;
            println!("Backup catalog written: {} riders → {}", catalog.len(), path.display());
            Ok(EXIT_OK)
        }
        Command::Ingest { events, base, out } => {
            let base = match &base {
                Some(p) => store::load_catalog(p)?,
                None => Catalog::new(),
            };
            let merger = Merger::new(opts.merge.clone());
            let mut progress = ConsoleProgress::default();
            let (catalog, report) = ingest::run(base, &events, &merger, Some(&mut progress));

            if !report.found_any() {
                eprintln!("No startlist produced any riders; catalog not written. `wm_roster seed` writes the backup.");
                return Ok(EXIT_FAILURE);
            }
            let path = path_or_default(out);
            store::save_catalog(&path, &catalog, &opts.event_codes())?;
            println!("Catalog written: {} riders → {}", catalog.len(), path.display());
            Ok(EXIT_OK)
        }
        Command::Status { file } => {
            let path = path_or_default(file);
            let catalog = store::load_catalog(&path)?;
            print!("{}", status_text(&path, &catalog));
            Ok(EXIT_OK)
        }
        Command::Optimize(args) => optimize_cmd(args, &opts, path_or_default),
    }
}

fn optimize_cmd(
    args: OptimizeArgs,
    opts: &AppOptions,
    path_or_default: impl Fn(Option<PathBuf>) -> PathBuf,
) -> Result<u8> {
    let catalog = store::load_catalog(&path_or_default(args.file))?;

    let mut selection = opts.selection.clone();
    if let Some(b) = args.budget { selection.budget = b; }
    if let Some(n) = args.size { selection.roster_size = n; }
    if let Some(s) = args.solver { selection.solver = s.into(); }
    if args.time_limit_ms.is_some() { selection.time_limit_ms = args.time_limit_ms; }
    if args.strict { selection.mandatory_policy = MandatoryPolicy::Reject; }

    // --must accepts any spelling the startlists use
    let constraints = Constraints::new(selection.budget, selection.roster_size)
        .with_mandatory(args.must.iter().map(|n| normalize_name(n.trim())));

    let solver = optimize::solver_for(&selection);
    let result = optimize::optimize(&catalog, &constraints, selection.mandatory_policy, solver.as_ref())?;

    if !result.dropped_mandatory.is_empty() {
        eprintln!("Not in catalog, ignored: {}", result.dropped_mandatory.join(", "));
    }

    match &result.outcome {
        Outcome::Selected(roster) => {
            let table = roster_text(roster, args.format.into());
            match &args.out {
                Some(path) => write_text(path, &table)?,
                None => print!("{table}"),
            }
            eprintln!(
                "{} riders, cost {} of {}, score {}",
                roster.len(),
                roster.total_cost(),
                selection.budget,
                roster.total_score()
            );
            Ok(EXIT_OK)
        }
        Outcome::Infeasible => {
            eprintln!(
                "No team of {} riders fits a budget of {} with the required riders.",
                selection.roster_size, selection.budget
            );
            Ok(EXIT_NO_ROSTER)
        }
        Outcome::TimedOut => {
            eprintln!("Solver stopped at the time limit without a proven answer.");
            Ok(EXIT_NO_ROSTER)
        }
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    crate::file::ensure_parent(path)?;
    std::fs::write(path, text)?;
    Ok(())
}

fn roster_text(roster: &Roster, delim: Delim) -> String {
    let headers: Vec<String> = ["Name", "Team", "Price", "Type", "Total"].iter().map(|h| s!(*h)).collect();
    let rows: Vec<Vec<String>> = roster
        .members
        .iter()
        .map(|e| vec![
            e.name.clone(),
            e.group.clone(),
            e.cost.to_string(),
            e.category.clone(),
            e.total_score().to_string(),
        ])
        .collect();
    rows_to_string(&headers, &rows, delim.sep())
}

fn status_text(path: &Path, catalog: &Catalog) -> String {
    let sum = store::summary(catalog);
    let mut out = format!("{}: {} riders, {} events\n", path.display(), sum.entities, sum.events);
    if let Some((name, total)) = sum.favourite {
        out.push_str(&format!("Top favourite: {name} ({total} pts)\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optimize_flags() {
        let cli = Cli::try_parse_from([
            "wm_roster", "-vv", "optimize", "riders.tsv", "--budget", "50", "--size", "3",
            "--must", "POGACAR Tadej", "--must", "Mads Pedersen", "--strict",
            "--solver", "exhaustive", "--format", "tsv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Optimize(args) = cli.command else { panic!("expected optimize") };
        assert_eq!(args.file, Some(PathBuf::from("riders.tsv")));
        assert_eq!((args.budget, args.size), (Some(50.0), Some(3)));
        assert_eq!(args.must.len(), 2);
        assert!(args.strict);
        assert_eq!(args.solver, Some(SolverArg::Exhaustive));
        assert_eq!(args.format, FormatArg::Tsv);
    }

    #[test]
    fn ingest_needs_an_event() {
        assert!(Cli::try_parse_from(["wm_roster", "ingest"]).is_err());
        let cli = Cli::try_parse_from(["wm_roster", "ingest", "--event", "RVV=rvv.html", "--event", "PR=pr.txt"]).unwrap();
        let Command::Ingest { events, .. } = cli.command else { panic!() };
        assert_eq!(events[1], EventSource::new("PR", "pr.txt"));
    }

    #[test]
    fn bare_log_file_flag_uses_default_path() {
        let cli = Cli::try_parse_from(["wm_roster", "status", "--log-file"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
    }

    #[test]
    fn roster_text_lists_members() {
        let roster = Roster { members: seed::backup_catalog().iter().take(2).cloned().collect() };
        let text = roster_text(&roster, Delim::Tsv);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name\tTeam\tPrice\tType\tTotal"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn status_mentions_favourite() {
        let text = status_text(Path::new("riders.csv"), &seed::backup_catalog());
        assert!(text.starts_with("riders.csv: 12 riders, 13 events"));
        assert!(text.contains("Top favourite: Wout Van Aert (570 pts)"));
    }
}
