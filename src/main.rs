mod activity;
mod aggregate;
mod config;
mod error;
mod logging;
mod report;
mod sheet;
mod table;

use activity::DecodeMode;
use anyhow::Result;
use chrono::prelude::*;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "timetally")]
#[command(about = "Time-sheet activity tally and report generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly tables and annual summary from a time-sheet CSV
    Report {
        /// Path to the time-sheet CSV
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output directory (default: from config, usually "output")
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Upper bound of the activity-letter range (default: from config, usually Q)
        #[arg(short = 'm', long)]
        max_letter: Option<char>,

        /// Abort on the first malformed activity code instead of flagging it
        #[arg(short = 's', long, conflicts_with = "lenient")]
        strict: bool,

        /// Flag malformed activity codes and continue, overriding a
        /// persisted strict default
        #[arg(short = 'l', long)]
        lenient: bool,

        /// Omit the computed "Activity Total" column
        #[arg(long)]
        no_activity_total: bool,

        /// Verbose output
        #[arg(short = 'v', long)]
        verbose: bool,
    },
    /// Validate a time-sheet CSV without writing any output
    Check {
        /// Path to the time-sheet CSV
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Upper bound of the activity-letter range (default: from config, usually Q)
        #[arg(short = 'm', long)]
        max_letter: Option<char>,

        /// Verbose output
        #[arg(short = 'v', long)]
        verbose: bool,
    },
    /// Show or persist default settings
    Config {
        /// Persist a new default upper bound for the activity-letter range
        #[arg(short = 'm', long)]
        max_letter: Option<char>,

        /// Persist strict mode as the default (true or false)
        #[arg(short = 's', long)]
        strict: Option<bool>,

        /// Persist whether tables include the "Activity Total" column
        #[arg(long)]
        activity_total: Option<bool>,

        /// Persist a new default output directory
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine if verbose mode is enabled
    let verbose = match &cli.command {
        Some(Commands::Report { verbose, .. }) => *verbose,
        Some(Commands::Check { verbose, .. }) => *verbose,
        Some(Commands::Config { .. }) | None => false,
    };

    if verbose {
        println!(
            "timetally {} (built {})",
            env!("CARGO_PKG_VERSION"),
            env!("BUILD_DATE")
        );
        println!("Run started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }

    let config = Config::load()?;

    match cli.command {
        Some(Commands::Report {
            input,
            output,
            max_letter,
            strict,
            lenient,
            no_activity_total,
            verbose,
        }) => {
            let mut config = config;
            if let Some(letter) = max_letter {
                config.max_letter = letter;
            }
            if let Some(dir) = output {
                config.output_dir = dir;
            }
            // either flag overrides the persisted default; neither keeps it
            if strict {
                config.strict = true;
            } else if lenient {
                config.strict = false;
            }
            if no_activity_total {
                config.activity_total = false;
            }
            config.validate()?;

            handle_report(&input, &config, verbose)?;
        }
        Some(Commands::Check {
            input,
            max_letter,
            verbose,
        }) => {
            let mut config = config;
            if let Some(letter) = max_letter {
                config.max_letter = letter;
            }
            config.validate()?;

            handle_check(&input, &config, verbose)?;
        }
        Some(Commands::Config {
            max_letter,
            strict,
            activity_total,
            output,
        }) => {
            handle_config(config, max_letter, strict, activity_total, output)?;
        }
        None => {
            println!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

fn handle_report(input: &PathBuf, config: &Config, verbose: bool) -> Result<()> {
    let rows = sheet::read_sheet(input)?;
    if verbose {
        println!("Read {} rows from {}", rows.len(), input.display());
    }

    let year = sheet::check_year(&rows)?;
    println!(
        "Running for year {} over {} rows (letters A-{}, S and P reserved)",
        year,
        rows.len(),
        config.max_letter
    );

    let mode = if config.strict {
        DecodeMode::Strict
    } else {
        DecodeMode::Lenient
    };
    let outcome = aggregate::collect(&rows, config.max_letter, mode)?;

    if !outcome.flagged.is_empty() {
        println!(
            "Warning: {} row(s) had invalid activity codes and were counted as zero hours.",
            outcome.flagged.len()
        );
        println!(
            "Review line(s): {}",
            outcome
                .flagged
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let tables: Vec<table::MonthTable> = (0..12)
        .map(|month| {
            table::build_month_table(
                outcome.data.month(month),
                config.max_letter,
                config.activity_total,
            )
        })
        .collect();
    let summary = table::build_annual_summary(&tables);

    let report_dir = report::write_report(&config.output_dir, year, &tables, &summary)?;
    println!(
        "✅ Wrote 12 month tables and Summary.csv to {}",
        report_dir.display()
    );

    Ok(())
}

fn handle_check(input: &PathBuf, config: &Config, verbose: bool) -> Result<()> {
    let rows = sheet::read_sheet(input)?;
    println!("Checking {} rows from {}", rows.len(), input.display());

    let mut problems = 0usize;

    match sheet::check_year(&rows) {
        Ok(year) => println!("Year: {}", year),
        Err(e) => {
            problems += 1;
            println!("❌ {}", e);
        }
    }

    for (i, row) in rows.iter().enumerate() {
        let line = sheet::line_number(i);

        if sheet::month_index(&row.month).is_none() {
            problems += 1;
            println!("❌ Line {}: unknown month name '{}'", line, row.month);
        }

        let sanitized = activity::sanitize(&row.activities);
        if activity::is_invalid(&sanitized, config.max_letter) {
            problems += 1;
            println!(
                "❌ Line {}: invalid activity code '{}' (sanitized: '{}')",
                line, row.activities, sanitized
            );
        } else if verbose {
            println!("   Line {}: '{}' ok", line, sanitized);
        }
    }

    if problems == 0 {
        println!("✅ No problems found");
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} problem(s) found in time sheet", problems))
    }
}

fn handle_config(
    mut config: Config,
    max_letter: Option<char>,
    strict: Option<bool>,
    activity_total: Option<bool>,
    output: Option<PathBuf>,
) -> Result<()> {
    let changed =
        max_letter.is_some() || strict.is_some() || activity_total.is_some() || output.is_some();

    if let Some(letter) = max_letter {
        config.max_letter = letter;
    }
    if let Some(strict) = strict {
        config.strict = strict;
    }
    if let Some(activity_total) = activity_total {
        config.activity_total = activity_total;
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }

    if changed {
        config.save()?;
        println!("Saved configuration.");
    }

    println!("max_letter: {}", config.max_letter);
    println!("strict: {}", config.strict);
    println!("activity_total: {}", config.activity_total);
    println!("output_dir: {}", config.output_dir.display());
    if let Some(path) = Config::get_config_path() {
        println!("config file: {}", path.display());
    }

    Ok(())
}
