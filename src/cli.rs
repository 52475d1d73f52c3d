// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "A CLI tool to log workout sessions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightUnitCli {
    Kg,
    Lbs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an exercise to the current workout session
    AddExercise {
        /// Name of the exercise (e.g., "Bench Press")
        name: String,
    },
    /// Remove an exercise (and its sets) from the current session
    RemoveExercise {
        name: String,
    },
    /// Log a set for an exercise in the current session
    AddSet {
        /// Exercise the set belongs to
        #[arg(short, long)]
        exercise: String,
        /// Number of repetitions (must be > 0)
        #[arg(short, long)]
        reps: u32,
        /// Weight used (must be >= 0)
        #[arg(short, long)]
        weight: f64,
        /// Weight unit; defaults to the configured unit
        #[arg(short, long, value_enum)]
        unit: Option<WeightUnitCli>,
    },
    /// Replace a logged set (0-based index)
    EditSet {
        #[arg(short, long)]
        exercise: String,
        /// Position of the set within the exercise
        #[arg(short, long)]
        index: usize,
        #[arg(short, long)]
        reps: u32,
        #[arg(short, long)]
        weight: f64,
        #[arg(short, long, value_enum)]
        unit: Option<WeightUnitCli>,
    },
    /// Remove a logged set (0-based index)
    RemoveSet {
        #[arg(short, long)]
        exercise: String,
        #[arg(short, long)]
        index: usize,
    },
    /// Show the current session
    Status,
    /// Save the current session to history and clear it
    Finish {
        /// Optional workout name (defaults to "Workout - <date>")
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Discard the current session
    Clear,
    /// List completed workouts, most recent first
    History {
        /// Show only the last N workouts
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Show recent sets of one exercise across past workouts
    ExerciseHistory {
        name: String,
    },
    /// Show stats for the last seven days
    Stats,
    /// Export a workout (or the whole history) as CSV
    Export {
        /// Id of the workout to export
        #[arg(long, conflicts_with = "all")]
        workout: Option<String>,
        /// Export the entire history instead of a single workout
        #[arg(long)]
        all: bool,
        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the exercise library
    ListLibrary {
        /// Filter by name or category substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a custom exercise to the library
    CreateExercise {
        /// Name of the exercise
        name: String,
        /// Category (Chest, Back, Legs, Shoulders, Arms, Core, Cardio)
        #[arg(short, long)]
        category: String,
    },
    /// Remove a custom exercise from the library
    DeleteExercise {
        name: String,
    },
    /// Run the rest countdown in the terminal
    Rest {
        /// Duration in seconds; defaults to the configured duration
        seconds: Option<u32>,
    },
    /// Show the current settings
    ShowSettings,
    SetUnits {
        #[arg(value_enum)]
        unit: WeightUnitCli,
    },
    SetRestTimer {
        /// Default rest between sets, in seconds (> 0)
        seconds: u32,
    },
    SetSound {
        enabled: bool,
    },
    SetHaptics {
        enabled: bool,
    },
    SetTheme {
        /// light, dark, or system
        theme: String,
    },
    /// Show the path to the data directory
    DataPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Command structure for completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
