//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use std::io::{stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workout_log_lib::{
    DirectoryExportSink, Exercise, Feedback, FeedbackKind, FileStore, Tick, WeeklyStats,
    WeightUnit, WorkoutService,
};

/// Prints toasts to the terminal; stands in for the sound/haptic/toast
/// side effects of the mobile front end.
struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn notify(&self, kind: FeedbackKind, message: &str) {
        let tag = match kind {
            FeedbackKind::Success => "ok",
            FeedbackKind::Error => "error",
            FeedbackKind::Info => "info",
        };
        println!("[{tag}] {message}");
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_log=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args();

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Initialize the service over the default file-backed store
    let store = FileStore::open_default().context("Failed to open storage data directory")?;
    let mut service = WorkoutService::new(Box::new(store), Box::new(ConsoleFeedback));

    // --- Execute Commands using WorkoutService ---
    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }

        // --- Session Commands ---
        cli::Commands::AddExercise { name } => {
            match service.add_exercise(&name) {
                Ok(()) => println!("Added '{}' to the current workout.", name.trim()),
                Err(e) => bail!("Error adding exercise: {e}"),
            }
        }
        cli::Commands::RemoveExercise { name } => {
            match service.remove_exercise(&name) {
                Ok(()) => println!("Removed '{name}' from the current workout."),
                Err(e) => bail!("Error removing exercise: {e}"),
            }
        }
        cli::Commands::AddSet {
            exercise,
            reps,
            weight,
            unit,
        } => {
            let unit = resolve_unit(&service, unit);
            match service.add_set(&exercise, reps, weight, unit) {
                Ok(_handle) => println!(
                    "Logged {reps} x {weight} {unit} for '{exercise}'. Rest timer started ({}s).",
                    service.rest_time_remaining()
                ),
                Err(e) => bail!("Error logging set: {e}"),
            }
        }
        cli::Commands::EditSet {
            exercise,
            index,
            reps,
            weight,
            unit,
        } => {
            let unit = resolve_unit(&service, unit);
            match service.edit_set(&exercise, index, reps, weight, unit) {
                Ok(()) => println!("Updated set {index} of '{exercise}'."),
                Err(e) => bail!("Error editing set: {e}"),
            }
        }
        cli::Commands::RemoveSet { exercise, index } => {
            match service.remove_set(&exercise, index) {
                Ok(()) => println!("Removed set {index} of '{exercise}'."),
                Err(e) => bail!("Error removing set: {e}"),
            }
        }
        cli::Commands::Status => print_status(&service),
        cli::Commands::Finish { name } => {
            match service.finish_workout(name.as_deref()) {
                Ok(workout) => {
                    let duration = workout.duration_minutes.unwrap_or(0);
                    println!(
                        "Saved '{}' ({} set(s), {} minute(s)).",
                        workout.name,
                        workout.total_sets(),
                        duration
                    );
                }
                Err(e) => bail!("Error finishing workout: {e}"),
            }
        }
        cli::Commands::Clear => {
            service.clear_workout();
            println!("Cleared the current workout.");
        }

        // --- History Commands ---
        cli::Commands::History { limit } => print_history(&service, limit),
        cli::Commands::ExerciseHistory { name } => {
            let entries = service.exercise_history(&name);
            if entries.is_empty() {
                println!("No logged sets found for '{name}'.");
            } else {
                print_exercise_history(&name, &entries, service.settings().weight_unit);
            }
        }
        cli::Commands::Stats => print_weekly_stats(&service.weekly_stats()),
        cli::Commands::Export { workout, all, out } => {
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let sink = DirectoryExportSink::new(dir).context("Failed to open export directory")?;
            let path = if let Some(id) = workout {
                service.export_workout(&id, &sink)?
            } else if all {
                service.export_history(&sink)?
            } else {
                bail!("Specify --workout <id> or --all.");
            };
            println!("Exported CSV to {}", path.display());
        }

        // --- Library Commands ---
        cli::Commands::ListLibrary { search } => {
            let exercises = match search {
                Some(query) => service.library().search(&query),
                None => service.library().exercises(),
            };
            print_library(&exercises);
        }
        cli::Commands::CreateExercise { name, category } => {
            match service.add_custom_exercise(&name, &category) {
                Ok(added) => println!(
                    "Created custom exercise '{}' (Category: {}).",
                    added.name, added.category
                ),
                Err(e) => bail!("Error creating exercise: {e}"),
            }
        }
        cli::Commands::DeleteExercise { name } => {
            match service.remove_custom_exercise(&name) {
                Ok(()) => println!("Deleted custom exercise '{name}'."),
                Err(e) => bail!("Error deleting exercise: {e}"),
            }
        }

        // --- Rest Timer ---
        cli::Commands::Rest { seconds } => run_rest_countdown(&mut service, seconds)?,

        // --- Settings Commands ---
        cli::Commands::ShowSettings => print_settings(&service),
        cli::Commands::SetUnits { unit } => {
            let unit = cli_unit_to_unit(unit);
            service.set_weight_unit(unit);
            println!("Default weight unit set to {unit}.");
        }
        cli::Commands::SetRestTimer { seconds } => {
            match service.set_rest_timer_duration(seconds) {
                Ok(()) => println!("Default rest timer set to {seconds}s."),
                Err(e) => bail!("Error updating rest timer: {e}"),
            }
        }
        cli::Commands::SetSound { enabled } => {
            service.set_sound_enabled(enabled);
            println!("Sound effects {}.", if enabled { "enabled" } else { "disabled" });
        }
        cli::Commands::SetHaptics { enabled } => {
            service.set_haptics_enabled(enabled);
            println!("Haptic feedback {}.", if enabled { "enabled" } else { "disabled" });
        }
        cli::Commands::SetTheme { theme } => {
            match workout_log_lib::parse_theme(&theme) {
                Ok(theme) => {
                    service.set_theme(theme);
                    println!("Theme set to {theme}.");
                }
                Err(e) => bail!("Error setting theme: {e}"),
            }
        }
        cli::Commands::DataPath => {
            let path = WorkoutService::default_data_dir()
                .context("Failed to determine data directory")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

const fn cli_unit_to_unit(unit: cli::WeightUnitCli) -> WeightUnit {
    match unit {
        cli::WeightUnitCli::Kg => WeightUnit::Kg,
        cli::WeightUnitCli::Lbs => WeightUnit::Lbs,
    }
}

fn resolve_unit(service: &WorkoutService, unit: Option<cli::WeightUnitCli>) -> WeightUnit {
    unit.map_or(service.settings().weight_unit, cli_unit_to_unit)
}

/// Drives the one scheduled countdown: sleep a second, apply the tick,
/// repeat until the countdown finishes or is superseded.
fn run_rest_countdown(service: &mut WorkoutService, seconds: Option<u32>) -> Result<()> {
    let handle = service.start_rest_timer(seconds);
    let total = service.rest_time_remaining();
    println!("Resting for {total}s. Press Ctrl-C to stop.");
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        match service.tick_rest_timer(handle) {
            Tick::Running(remaining) => {
                print!("\r{remaining:>4}s remaining");
                stdout().flush()?;
            }
            Tick::Finished => {
                println!("\rRest complete!      ");
                break;
            }
            Tick::Stale => break,
        }
    }
    Ok(())
}

fn print_status(service: &WorkoutService) {
    let session = service.session();
    if session.is_empty() {
        println!("No workout in progress. Add an exercise to get started.");
        return;
    }
    if let Some(start) = session.start_time {
        println!("Workout started at {}", start.format("%Y-%m-%d %H:%M"));
    }
    let unit = service.settings().weight_unit;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Exercise").add_attribute(Attribute::Bold),
            Cell::new("Set").add_attribute(Attribute::Bold),
            Cell::new("Reps").add_attribute(Attribute::Bold),
            Cell::new("Weight").add_attribute(Attribute::Bold),
            Cell::new(format!("Volume ({unit})")).add_attribute(Attribute::Bold),
        ]);
    for exercise in &session.exercises {
        if exercise.sets.is_empty() {
            table.add_row(vec![
                exercise.name.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
        for (i, set) in exercise.sets.iter().enumerate() {
            let volume = workout_log_lib::set_volume(set.reps, set.weight, set.unit, unit);
            table.add_row(vec![
                exercise.name.clone(),
                (i + 1).to_string(),
                set.reps.to_string(),
                format!("{} {}", set.weight, set.unit),
                format!("{volume:.1}"),
            ]);
        }
    }
    println!("{table}");

    if service.rest_timer_active() {
        println!("Rest timer running: {}s remaining.", service.rest_time_remaining());
    }
}

fn print_history(service: &WorkoutService, limit: usize) {
    let history = service.history();
    if history.is_empty() {
        println!("No completed workouts yet.");
        return;
    }
    let unit = service.settings().weight_unit;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Sets").add_attribute(Attribute::Bold),
            Cell::new(format!("Volume ({unit})")).add_attribute(Attribute::Bold),
            Cell::new("Duration (min)").add_attribute(Attribute::Bold),
        ]);
    for workout in history.iter().take(limit) {
        table.add_row(vec![
            workout.id.clone(),
            workout.date.format("%Y-%m-%d").to_string(),
            workout.name.clone(),
            workout.total_sets().to_string(),
            format!("{:.1}", workout.total_volume(unit)),
            workout
                .duration_minutes
                .map_or_else(|| "N/A".to_string(), |m| m.to_string()),
        ]);
    }
    println!("{table}");
}

fn print_exercise_history(name: &str, entries: &[Exercise], unit: WeightUnit) {
    println!("Recent '{name}' sessions (most recent first):");
    for (i, exercise) in entries.iter().enumerate() {
        let volume = workout_log_lib::total_volume_for_sets(&exercise.sets, unit);
        println!("  Session {} ({} set(s), volume {volume:.1} {unit}):", i + 1, exercise.sets.len());
        for set in &exercise.sets {
            println!(
                "    {} x {} {} ({})",
                set.reps,
                set.weight,
                set.unit,
                set.timestamp.format("%Y-%m-%d %H:%M")
            );
        }
    }
}

fn print_weekly_stats(stats: &WeeklyStats) {
    println!("This week:");
    println!("  Workouts:     {}", stats.workouts);
    println!("  Total sets:   {}", stats.total_sets);
    println!(
        "  Total volume: {:.0} {}",
        stats.total_volume, stats.volume_unit
    );
}

fn print_library(exercises: &[workout_log_lib::ExerciseDefinition]) {
    if exercises.is_empty() {
        println!("No matching exercises.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Custom").add_attribute(Attribute::Bold),
        ]);
    for exercise in exercises {
        table.add_row(vec![
            exercise.name.clone(),
            exercise.category.clone(),
            if exercise.is_custom { "yes" } else { "" }.to_string(),
        ]);
    }
    println!("{table}");
}

fn print_settings(service: &WorkoutService) {
    let settings = service.settings();
    println!("Weight unit:      {}", settings.weight_unit);
    println!("Rest timer:       {}s", settings.rest_timer_duration);
    println!("Sound effects:    {}", settings.sound_enabled);
    println!("Haptic feedback:  {}", settings.haptics_enabled);
    println!("Theme:            {}", settings.theme);
    let presets: Vec<String> = workout_log_lib::REST_TIMER_OPTIONS
        .iter()
        .map(|s| format!("{s}s"))
        .collect();
    println!("Rest presets:     {}", presets.join(", "));
}
