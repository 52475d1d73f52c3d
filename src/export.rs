//src/export.rs
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::history::Workout;
use crate::units::WeightUnit;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error writing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to format CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Exported CSV was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Accepts a formatted export and writes it to a shareable location.
/// Failures surface as a single [`ExportError`].
pub trait ExportSink {
    /// # Errors
    /// Returns [`ExportError`] if the content cannot be written.
    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ExportError>;
}

/// Writes exports as plain files under a directory.
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    /// # Errors
    /// Returns [`ExportError`] if the directory cannot be created.
    pub fn new(dir: PathBuf) -> Result<Self, ExportError> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExportSink {
    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        fs::write(&path, content)?;
        Ok(path)
    }
}

fn format_duration(minutes: Option<i64>) -> String {
    minutes.map_or_else(|| "N/A".to_string(), |m| m.to_string())
}

/// Formats one workout as CSV: one row per set, then a summary block.
///
/// Per-row volume is the raw reps x weight of the set (1 decimal, no unit
/// conversion); the summary total is converted to `target_unit`.
/// # Errors
/// Returns [`ExportError`] if CSV formatting fails.
pub fn workout_csv(workout: &Workout, target_unit: WeightUnit) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record([
        "Exercise",
        "Set",
        "Reps",
        "Weight",
        "Unit",
        "Volume",
        "Timestamp",
    ])?;
    for exercise in &workout.exercises {
        for (index, set) in exercise.sets.iter().enumerate() {
            wtr.write_record([
                exercise.name.as_str(),
                &(index + 1).to_string(),
                &set.reps.to_string(),
                &set.weight.to_string(),
                &set.unit.to_string(),
                &format!("{:.1}", f64::from(set.reps) * set.weight),
                &set.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            ])?;
        }
    }

    wtr.write_record([""])?;
    wtr.write_record(["--- Workout Summary ---"])?;
    wtr.write_record(["Workout Name", &workout.name])?;
    wtr.write_record(["Date", &workout.date.format("%Y-%m-%d %H:%M").to_string()])?;
    wtr.write_record(["Duration (minutes)", &format_duration(workout.duration_minutes)])?;
    wtr.write_record(["Total Sets", &workout.total_sets().to_string()])?;
    wtr.write_record([
        format!("Total Volume ({target_unit})").as_str(),
        &format!("{:.1}", workout.total_volume(target_unit)),
    ])?;

    let buf = wtr.into_inner().map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(buf)?)
}

/// Formats the entire history as CSV, one row per set across all workouts.
/// # Errors
/// Returns [`ExportError`] if CSV formatting fails.
pub fn history_csv(history: &[Workout], target_unit: WeightUnit) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record([
        "Date",
        "Workout",
        "Exercise",
        "Set",
        "Reps",
        "Weight",
        "Unit",
        &format!("Volume ({target_unit})"),
        "Duration (min)",
    ])?;
    for workout in history {
        let date = workout.date.format("%Y-%m-%d").to_string();
        let duration = format_duration(workout.duration_minutes);
        for exercise in &workout.exercises {
            for (index, set) in exercise.sets.iter().enumerate() {
                let volume =
                    crate::units::set_volume(set.reps, set.weight, set.unit, target_unit);
                wtr.write_record([
                    date.as_str(),
                    &workout.name,
                    &exercise.name,
                    &(index + 1).to_string(),
                    &set.reps.to_string(),
                    &set.weight.to_string(),
                    &set.unit.to_string(),
                    &format!("{volume:.1}"),
                    &duration,
                ])?;
            }
        }
    }

    let buf = wtr.into_inner().map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Exercise, Set};
    use chrono::{TimeZone, Utc};

    fn sample_workout() -> Workout {
        let date = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
        Workout {
            id: "test-id".to_string(),
            date,
            name: "Push Day".to_string(),
            exercises: vec![Exercise {
                name: "Bench Press".to_string(),
                sets: vec![
                    Set {
                        reps: 10,
                        weight: 60.0,
                        unit: WeightUnit::Kg,
                        timestamp: date,
                    },
                    Set {
                        reps: 8,
                        weight: 65.0,
                        unit: WeightUnit::Kg,
                        timestamp: date,
                    },
                ],
            }],
            duration_minutes: Some(42),
        }
    }

    #[test]
    fn test_workout_csv_rows_and_summary() {
        let csv = workout_csv(&sample_workout(), WeightUnit::Kg).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Exercise,Set,Reps,Weight,Unit,Volume,Timestamp");
        assert_eq!(lines[1], "Bench Press,1,10,60,kg,600.0,2024-03-15 18:30");
        assert_eq!(lines[2], "Bench Press,2,8,65,kg,520.0,2024-03-15 18:30");
        assert!(csv.contains("--- Workout Summary ---"));
        assert!(csv.contains("Workout Name,Push Day"));
        assert!(csv.contains("Duration (minutes),42"));
        assert!(csv.contains("Total Sets,2"));
        assert!(csv.contains("Total Volume (kg),1120.0"));
    }

    #[test]
    fn test_history_csv_converts_volume() {
        let csv = history_csv(&[sample_workout()], WeightUnit::Lbs).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with("Volume (lbs),Duration (min)"));
        // 10 x 60 kg = 600 kg -> 1322.8 lbs
        assert!(lines[1].contains("1322.8"));
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = std::env::temp_dir().join("workout-log-export-test");
        let sink = DirectoryExportSink::new(dir.clone()).unwrap();
        let path = sink.write("out.csv", "a,b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
        let _ = fs::remove_file(path);
    }
}
