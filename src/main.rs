//! Courtside CLI
//!
//! Derives per-team game context from a pick history sheet.

use clap::{Parser, Subcommand};
use courtside::analysis::{Condition, GameFilter, Perspective, Role, StreakRange};
use courtside::data::OutputFormat;
use courtside::{Config, Result, TeamCode};

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Rest, travel, streak and previous-result context for picked games", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Derive the context table
    Derive {
        /// Input CSV (defaults to data.input_path)
        input: Option<String>,
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Aggregate results over a filtered selection
    Summary {
        /// Input CSV (defaults to data.input_path)
        input: Option<String>,
        /// Score from the model's pick or a target team
        #[arg(long, default_value = "model")]
        perspective: Perspective,
        /// Pick (model) or target team (team)
        #[arg(long)]
        team: Option<String>,
        /// Target team venue (team perspective)
        #[arg(long, default_value = "any")]
        role: Role,
        /// Market classification, e.g. "Favorito Pesado"
        #[arg(long)]
        class: Option<String>,
        /// Home team incoming streak, e.g. 3w or 4l
        #[arg(long)]
        home_streak: Option<StreakRange>,
        /// Away team incoming streak, e.g. 3w or 4l
        #[arg(long)]
        away_streak: Option<StreakRange>,
        /// Column equality, e.g. Calc_Pick_Travel=Leaves (repeatable)
        #[arg(long = "where")]
        conditions: Vec<Condition>,
    },
    /// List every team with its final streak and last game
    Teams {
        /// Input CSV (defaults to data.input_path)
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Derive {
            input,
            output,
            format,
        } => commands::derive(&config, input, output, format),
        Commands::Summary {
            input,
            perspective,
            team,
            role,
            class,
            home_streak,
            away_streak,
            conditions,
        } => {
            let filter = GameFilter {
                perspective,
                team: team.map(TeamCode::new),
                role,
                class,
                home_streak,
                away_streak,
                conditions,
            };
            commands::summary(&config, input, &filter)
        }
        Commands::Teams { input } => commands::teams(&config, input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use courtside::data::{export, CsvSource, GameSource};
    use courtside::features::{Derivation, FeatureEngine};
    use courtside::SkippedRow;
    use std::fs::File;
    use std::io::{self, BufWriter, Write};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to match your sheet's column names", config_path);
        println!("  2. Run 'courtside derive <games.csv>' to build the context table");
        println!("  3. Run 'courtside summary <games.csv> --team BOS' to slice results");

        Ok(())
    }

    /// Load the sheet and run the fold; loader and engine rejects are merged
    fn load_and_derive(config: &Config, input: Option<String>) -> Result<Derivation> {
        let path = input.unwrap_or_else(|| config.data.input_path.clone());
        let source = CsvSource::new(&path, config.columns.clone());
        let loaded = source.load()?;

        let mut derivation = FeatureEngine::new().run(loaded.games);
        derivation.skipped.extend(loaded.skipped);
        derivation.skipped.sort_by_key(|s| s.line);
        Ok(derivation)
    }

    fn report_skipped(skipped: &[SkippedRow]) {
        if skipped.is_empty() {
            return;
        }
        eprintln!("Skipped {} rows:", skipped.len());
        for row in skipped {
            eprintln!("  {}", row);
        }
    }

    pub fn derive(
        config: &Config,
        input: Option<String>,
        output: Option<String>,
        format: OutputFormat,
    ) -> Result<()> {
        let derivation = load_and_derive(config, input)?;
        let rows = &derivation.rows;

        let writer: Box<dyn Write> = match &output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout().lock()),
        };
        export::write_rows(rows, &config.columns, format, writer)?;

        if let Some(path) = output {
            println!("Wrote {} derived games to {}", rows.len(), path);
        }
        report_skipped(&derivation.skipped);

        Ok(())
    }

    pub fn summary(config: &Config, input: Option<String>, filter: &GameFilter) -> Result<()> {
        let derivation = load_and_derive(config, input)?;
        let selected = filter.apply(&derivation.rows, &config.columns);

        let summary = courtside::analysis::Summary::from_outcomes(
            selected.iter().map(|r| filter.outcome(r)),
            &config.summary,
        );

        println!("Results ({} of {} games)", selected.len(), derivation.rows.len());
        println!("───────────────────────────────");
        println!("{}", summary);
        report_skipped(&derivation.skipped);

        Ok(())
    }

    pub fn teams(config: &Config, input: Option<String>) -> Result<()> {
        let derivation = load_and_derive(config, input)?;

        println!("{:<6} {:>6}  {:<10} {:<5} {:<4} {:<4} {:<5}", "Team", "Streak", "Last", "Venue", "ATS", "ML", "OU");
        println!("───────────────────────────────────────────────");
        for state in derivation.team_states() {
            let last = &state.last;
            println!(
                "{:<6} {:>+6}  {:<10} {:<5} {:<4} {:<4} {:<5}",
                state.team,
                state.streak,
                last.date.format("%Y-%m-%d"),
                if last.was_home { "Home" } else { "Away" },
                if last.covered { "SI" } else { "NO" },
                if last.won { "SI" } else { "NO" },
                last.ou,
            );
        }
        report_skipped(&derivation.skipped);

        Ok(())
    }
}
