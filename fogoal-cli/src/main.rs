use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fogoal_core::{build_week_agenda, Planner, SlotPass, Task};
use std::path::{Path, PathBuf};
use tracing::info;

mod calendar;
mod config;
mod logging;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "fogoal",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOGOAL_BUILD_SHA"), ")"),
    about = "FoGoal Smart Planner CLI"
)]
struct Cli {
    /// Debug logging (FOGOAL_LOG / RUST_LOG still take precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Auto-place backlog tasks into free slots of the current week
    Plan {
        /// Task list exported from the app (JSON array)
        #[arg(long)]
        tasks: PathBuf,

        /// Reference date (default: today in the configured timezone)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Where to write the planned list (default: overwrite --tasks)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the placements without writing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Print the week agenda for a task list
    Agenda {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Export the week's timed tasks as an ICS calendar
    ExportIcs {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage ~/.fogoal/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with the default planner settings
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Plan {
            tasks,
            date,
            out,
            dry_run,
        } => plan(&tasks, date, out, dry_run)?,

        Command::Agenda { tasks, date } => agenda(&tasks, date)?,

        Command::ExportIcs { tasks, date, out } => export_ics(&tasks, date, out)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        bail!("Task file not found: {} (pass --tasks <file.json>)", path.display());
    }
    state::read_tasks(path)
}

fn reference_date(date: Option<NaiveDate>, cfg: &config::Config) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(d),
        None => cfg.today(),
    }
}

fn plan(
    tasks_path: &Path,
    date: Option<NaiveDate>,
    out: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let reference = reference_date(date, &cfg)?;
    let tasks = load_tasks(tasks_path)?;

    let planner = Planner::new(cfg.planner.clone());
    let outcome = planner.plan(&tasks, reference);

    println!(
        "# Plan for week of {}\n",
        planner.horizon_start(reference).format("%a %Y-%m-%d")
    );

    for p in &outcome.placements {
        let title = outcome
            .tasks
            .iter()
            .find(|t| t.id == p.task_id)
            .map(|t| t.title.as_str())
            .unwrap_or_default();
        let note = match p.pass {
            SlotPass::Preferred => "",
            SlotPass::Fallback => "  (outside preferred window)",
        };
        println!(
            "- {} {}-{}  {}{}",
            p.start.format("%a %Y-%m-%d"),
            p.start.format("%H:%M"),
            p.end.format("%H:%M"),
            title,
            note
        );
    }

    if !outcome.unplaced.is_empty() {
        println!("\nStill in backlog (no free slot this week):");
        for id in &outcome.unplaced {
            println!("- {}", id);
        }
    }
    println!("\n{}", outcome.summary());

    if dry_run {
        println!("(dry run: nothing written)");
        return Ok(());
    }

    let target = out.unwrap_or_else(|| tasks_path.to_path_buf());
    state::write_tasks(&target, &outcome.tasks)?;
    info!(path = %target.display(), "wrote planned tasks");
    Ok(())
}

fn agenda(tasks_path: &Path, date: Option<NaiveDate>) -> Result<()> {
    let cfg = config::load_config()?;
    let reference = reference_date(date, &cfg)?;
    let tasks = load_tasks(tasks_path)?;

    for day in build_week_agenda(&tasks, reference, &cfg.planner) {
        let busy = day.busy_minutes();
        println!(
            "## {}  ({}h{:02} busy)",
            day.date.format("%a %Y-%m-%d"),
            busy / 60,
            busy % 60
        );
        for e in &day.entries {
            let mark = if e.completed { "x" } else { " " };
            println!(
                "  [{}] {}-{}  {}",
                mark,
                e.start.format("%H:%M"),
                e.end.format("%H:%M"),
                e.title
            );
        }
        for id in &day.all_day {
            println!("  [ ] all day  {}", id);
        }
        println!();
    }

    let backlog = tasks.iter().filter(|t| t.is_backlog()).count();
    if backlog > 0 {
        println!("Backlog: {} task(s). Run: fogoal plan --tasks {}", backlog, tasks_path.display());
    }
    Ok(())
}

fn export_ics(tasks_path: &Path, date: Option<NaiveDate>, out: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config()?;
    let reference = reference_date(date, &cfg)?;
    let tasks = load_tasks(tasks_path)?;

    let days = build_week_agenda(&tasks, reference, &cfg.planner);
    let events = calendar::agenda_to_events(&days, cfg.timezone()?);
    let ics = calendar::events_to_ics(&events);

    match out {
        Some(path) => {
            std::fs::write(&path, ics).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), events = events.len(), "wrote calendar");
        }
        None => print!("{}", ics),
    }
    Ok(())
}
