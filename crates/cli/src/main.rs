//! Mission CLI - learner progress, rank and mission board.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use mission_core::{Dashboard, RankInfo, SaveOutcome};
use mission_progress::{ProgressStore, RecoveryPolicy, StoreConfig, DEFAULT_STORAGE_KEY};
use mission_storage::JsonStorage;

#[derive(Parser)]
#[command(name = "mission")]
#[command(about = "Mission progress tracker", long_about = None)]
struct Cli {
    /// Directory holding the progress data
    #[arg(long, env = "MISSION_DATA_DIR", default_value = ".mission")]
    data_dir: PathBuf,

    /// Storage key of the progress record
    #[arg(long, env = "MISSION_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    key: String,

    /// Fail on a corrupt record instead of resetting it
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rank, XP and statistics
    Status,
    /// Show the mission board
    Missions,
    /// Record progress on a mission
    Save {
        /// Mission ID (lesson1, lesson2, lesson3, design)
        mission: String,
        /// XP earned
        xp: u32,
        /// Mark the mission as completed
        #[arg(long)]
        completed: bool,
    },
    /// Record a quiz score
    Score {
        /// Quiz mission ID
        mission: String,
        /// Score achieved
        score: u32,
    },
    /// Show rank information for an XP value
    Rank {
        /// XP value
        xp: u32,
    },
    /// Show elapsed mission time
    Clock {
        /// Keep updating once per second
        #[arg(long)]
        watch: bool,
    },
    /// Erase all progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let storage = JsonStorage::new(&cli.data_dir).await?;
    let config = StoreConfig {
        storage_key: cli.key.clone(),
        recovery: if cli.strict { RecoveryPolicy::Surface } else { RecoveryPolicy::Reset },
        ..StoreConfig::default()
    };
    let mut store = ProgressStore::new(storage).with_config(config);

    match cli.command {
        Commands::Status => {
            let dashboard = store.dashboard().await?;
            print_dashboard(&dashboard);
        }
        Commands::Missions => {
            println!("Missions");
            for (mission, status) in store.mission_statuses().await? {
                println!("  {}. {:<18} [{}]", mission.number(), mission.title, status.as_str());
            }
        }
        Commands::Save { mission, xp, completed } => {
            let outcome = store.save(&mission, xp, completed).await?;
            let total = store.get().await?.total_xp;
            println!("{} (total {} XP)", format_outcome(outcome, &mission, xp), total);
        }
        Commands::Score { mission, score } => {
            store.save_score(&mission, score).await?;
            println!("Recorded score {}/{} for {}", score, store.config().max_quiz_score, mission);
        }
        Commands::Rank { xp } => {
            let info = RankInfo::for_xp(xp);
            println!("{} {} - {}", info.icon, info.title, info.subtitle);
            println!("  {}", format_next(&info));
            println!("  Progress: {:.0}%", info.progress);
        }
        Commands::Clock { watch } => {
            if !watch {
                println!("{}", store.mission_clock().await?);
                return Ok(());
            }
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            let mut stdout = std::io::stdout();
            loop {
                interval.tick().await;
                write!(stdout, "\r{}", store.mission_clock().await?)?;
                stdout.flush()?;
            }
        }
        Commands::Reset { yes } => {
            let question = "Are you sure you want to reset all progress? This cannot be undone.";
            if !yes && !confirm(question)? {
                println!("Reset cancelled");
                return Ok(());
            }
            store.reset().await?;
            info!("progress reset from CLI");
            println!("Progress reset. A fresh record will be created on the next command.");
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    let rank = &dashboard.rank;
    println!("{} {} - {}", rank.icon, rank.title, rank.subtitle);
    println!("  XP: {} XP", dashboard.total_xp);
    println!("  Progress: {:.0}%", rank.progress);
    println!("  {}", format_next(rank));
    println!("  Missions completed: {}", dashboard.missions_completed);
    println!("  Quizzes completed: {}", dashboard.quizzes_completed);
    println!("  Accuracy: {}%", dashboard.accuracy);
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn format_next(info: &RankInfo) -> String {
    match info.next_rank {
        Some(next) => format!("{} XP to {}", info.xp_to_next, next),
        None => "Maximum Rank Achieved!".to_string(),
    }
}

fn format_outcome(outcome: SaveOutcome, mission: &str, xp: u32) -> String {
    match outcome {
        SaveOutcome::FirstCompletion => format!("Mission {} completed: +{} XP", mission, xp),
        SaveOutcome::AlreadyCompleted => {
            format!("Mission {} already completed. No additional XP awarded", mission)
        }
        SaveOutcome::Practice => format!("Practice on {}: +{} XP", mission, xp),
    }
}
