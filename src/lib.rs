// src/lib.rs
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

// --- Declare modules ---
pub mod export;
pub mod feedback;
pub mod history;
pub mod library;
pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod units;

// --- Expose public types ---
pub use export::{
    history_csv, workout_csv, DirectoryExportSink, ExportError, ExportSink,
};
pub use feedback::{Feedback, FeedbackKind, NoFeedback};
pub use history::{WeeklyStats, Workout, EXERCISE_HISTORY_LIMIT};
pub use library::{ExerciseDefinition, ExerciseLibrary, LibraryError, CATEGORIES};
pub use session::{Exercise, Session, SessionError, Set};
pub use settings::{
    parse_theme, Settings, SettingsError, Theme, DEFAULT_REST_TIMER_DURATION, REST_TIMER_OPTIONS,
};
pub use storage::{
    Error as StorageError, // Renamed from Error
    FileStore,
    KeyValueStore,
    MemoryStore,
};
pub use timer::{RestTimer, Tick, TimerHandle, TimerState};
pub use units::{
    convert_weight, quick_increments, set_volume, total_volume_for_sets, weight_increment,
    WeightUnit, KG_TO_LBS, LBS_TO_KG,
};

/// The process-wide workout state container.
///
/// Owns the in-progress session, the persisted history, the settings, the
/// exercise library, and the single rest timer. Every mutation applies
/// synchronously, then persists its slot best-effort: a failed write is
/// logged and swallowed, and the in-memory state stays the source of truth
/// until the next successful write.
pub struct WorkoutService {
    settings: Settings,
    session: Session,
    history: Vec<Workout>,
    library: ExerciseLibrary,
    timer: RestTimer,
    store: Box<dyn KeyValueStore>,
    feedback: Box<dyn Feedback>,
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match storage::load_slot(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to load '{key}', falling back to defaults: {e}");
            T::default()
        }
    }
}

impl WorkoutService {
    /// Initializes the service over the default file-backed store.
    /// # Errors
    /// Returns `anyhow::Error` if the data directory cannot be determined
    /// or created.
    pub fn initialize() -> Result<Self> {
        let store = FileStore::open_default()
            .context("Failed to open storage data directory")?;
        Ok(Self::new(Box::new(store), Box::new(NoFeedback)))
    }

    /// Builds the service over an explicit store and feedback sink,
    /// loading all slots. Missing or corrupt slots fall back to defaults
    /// (corrupt ones are logged).
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>, feedback: Box<dyn Feedback>) -> Self {
        let settings: Settings = load_or_default(store.as_ref(), storage::SETTINGS_KEY);
        let session: Session = load_or_default(store.as_ref(), storage::SESSION_KEY);
        let history: Vec<Workout> = load_or_default(store.as_ref(), storage::HISTORY_KEY);
        let custom: Vec<ExerciseDefinition> =
            load_or_default(store.as_ref(), storage::LIBRARY_KEY);

        Self {
            settings,
            session,
            history,
            library: ExerciseLibrary::new(custom),
            timer: RestTimer::new(),
            store,
            feedback,
        }
    }

    /// Path of the default data directory (for display).
    /// # Errors
    /// Returns `StorageError` if the directory cannot be determined.
    pub fn default_data_dir() -> Result<PathBuf, StorageError> {
        storage::get_data_dir()
    }

    // --- Persistence (best-effort, failures logged and swallowed) ---

    fn persist_session(&mut self) {
        if let Err(e) =
            storage::save_slot(self.store.as_mut(), storage::SESSION_KEY, &self.session)
        {
            tracing::warn!("Failed to save current workout: {e}");
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) =
            storage::save_slot(self.store.as_mut(), storage::HISTORY_KEY, &self.history)
        {
            tracing::warn!("Failed to save workout history: {e}");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) =
            storage::save_slot(self.store.as_mut(), storage::SETTINGS_KEY, &self.settings)
        {
            tracing::warn!("Failed to save settings: {e}");
        }
    }

    fn persist_library(&mut self) {
        let custom = self.library.custom_exercises().to_vec();
        if let Err(e) = storage::save_slot(self.store.as_mut(), storage::LIBRARY_KEY, &custom) {
            tracing::warn!("Failed to save custom exercises: {e}");
        }
    }

    // --- Session operations ---

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Adds an exercise to the current session.
    /// # Errors
    /// See [`Session::add_exercise`].
    pub fn add_exercise(&mut self, name: &str) -> Result<(), SessionError> {
        self.session.add_exercise(name)?;
        self.persist_session();
        Ok(())
    }

    /// Removes an exercise (and all its sets) from the current session.
    /// # Errors
    /// See [`Session::remove_exercise`].
    pub fn remove_exercise(&mut self, name: &str) -> Result<(), SessionError> {
        self.session.remove_exercise(name)?;
        self.persist_session();
        Ok(())
    }

    /// Logs a set and (re)starts the rest timer with the configured
    /// duration. Returns the handle driving the new countdown.
    /// # Errors
    /// See [`Session::add_set`].
    pub fn add_set(
        &mut self,
        exercise: &str,
        reps: u32,
        weight: f64,
        unit: WeightUnit,
    ) -> Result<TimerHandle, SessionError> {
        self.session.add_set(exercise, reps, weight, unit)?;
        self.persist_session();
        Ok(self.timer.start(self.settings.rest_timer_duration))
    }

    /// Removes the set at `index` from the named exercise.
    /// # Errors
    /// See [`Session::remove_set`].
    pub fn remove_set(&mut self, exercise: &str, index: usize) -> Result<(), SessionError> {
        self.session.remove_set(exercise, index)?;
        self.persist_session();
        Ok(())
    }

    /// Replaces the set at `index` and refreshes its timestamp.
    /// # Errors
    /// See [`Session::edit_set`].
    pub fn edit_set(
        &mut self,
        exercise: &str,
        index: usize,
        reps: u32,
        weight: f64,
        unit: WeightUnit,
    ) -> Result<(), SessionError> {
        self.session.edit_set(exercise, index, reps, weight, unit)?;
        self.persist_session();
        Ok(())
    }

    /// Snapshots the session into history and clears it.
    ///
    /// The new workout lands at the front of the history (most recent
    /// first). Returns the stored snapshot.
    /// # Errors
    /// `SessionError::EmptySession` if no exercises were added.
    pub fn finish_workout(&mut self, name: Option<&str>) -> Result<Workout, SessionError> {
        if self.session.is_empty() {
            return Err(SessionError::EmptySession);
        }
        let workout = Workout::from_session(&self.session, name, Utc::now());
        self.history.insert(0, workout.clone());
        self.persist_history();
        self.clear_workout();
        self.feedback.notify(
            FeedbackKind::Success,
            &format!("Workout '{}' saved.", workout.name),
        );
        Ok(workout)
    }

    /// Empties the session, stops the rest timer, and erases the persisted
    /// in-progress slot.
    pub fn clear_workout(&mut self) {
        self.session.clear();
        self.timer.stop();
        if let Err(e) = self.store.remove(storage::SESSION_KEY) {
            tracing::warn!("Failed to erase in-progress workout: {e}");
        }
    }

    // --- Rest timer ---

    /// Starts (or restarts) the rest countdown. `seconds` falls back to
    /// the configured duration.
    pub fn start_rest_timer(&mut self, seconds: Option<u32>) -> TimerHandle {
        self.timer
            .start(seconds.unwrap_or(self.settings.rest_timer_duration))
    }

    /// Stops the countdown; no completion side effect fires.
    pub fn stop_rest_timer(&mut self) {
        self.timer.stop();
    }

    /// Applies one scheduled one-second tick. On the final tick, fires the
    /// completion notification once (when sound or haptics are enabled).
    pub fn tick_rest_timer(&mut self, handle: TimerHandle) -> Tick {
        let outcome = self.timer.tick(handle);
        if outcome == Tick::Finished
            && (self.settings.sound_enabled || self.settings.haptics_enabled)
        {
            self.feedback
                .notify(FeedbackKind::Success, "Rest complete. Back to work!");
        }
        outcome
    }

    #[must_use]
    pub fn rest_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    #[must_use]
    pub fn rest_time_remaining(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    // --- History ---

    #[must_use]
    pub fn history(&self) -> &[Workout] {
        &self.history
    }

    #[must_use]
    pub fn find_workout(&self, id: &str) -> Option<&Workout> {
        self.history.iter().find(|w| w.id == id)
    }

    /// Recent snapshots of one exercise across past workouts, capped at
    /// [`EXERCISE_HISTORY_LIMIT`].
    #[must_use]
    pub fn exercise_history(&self, name: &str) -> Vec<Exercise> {
        history::exercise_history(&self.history, name)
    }

    /// Rolling seven-day stats in the configured weight unit.
    #[must_use]
    pub fn weekly_stats(&self) -> WeeklyStats {
        history::weekly_stats(&self.history, self.settings.weight_unit)
    }

    // --- Export ---

    /// Formats one workout as CSV and hands it to the sink.
    /// # Errors
    /// Returns `anyhow::Error` if the id is unknown or the sink fails.
    pub fn export_workout(&self, id: &str, sink: &dyn ExportSink) -> Result<PathBuf> {
        let workout = self
            .find_workout(id)
            .with_context(|| format!("No workout with id '{id}' in history"))?;
        let content = workout_csv(workout, self.settings.weight_unit)
            .context("Failed to format workout CSV")?;
        let filename = format!("workout-{}.csv", workout.id);
        sink.write(&filename, &content)
            .with_context(|| format!("Failed to export '{filename}'"))
    }

    /// Formats the full history as CSV and hands it to the sink.
    /// # Errors
    /// Returns `anyhow::Error` if formatting or the sink fails.
    pub fn export_history(&self, sink: &dyn ExportSink) -> Result<PathBuf> {
        let content = history_csv(&self.history, self.settings.weight_unit)
            .context("Failed to format history CSV")?;
        sink.write("workout-history.csv", &content)
            .context("Failed to export workout history")
    }

    // --- Settings ---

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) {
        self.settings.weight_unit = unit;
        self.persist_settings();
    }

    /// Sets the default rest duration.
    /// # Errors
    /// `SettingsError::InvalidTimerDuration` if `seconds` is zero.
    pub fn set_rest_timer_duration(&mut self, seconds: u32) -> Result<(), SettingsError> {
        self.settings.set_rest_timer_duration(seconds)?;
        self.persist_settings();
        Ok(())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.persist_settings();
    }

    pub fn set_haptics_enabled(&mut self, enabled: bool) {
        self.settings.haptics_enabled = enabled;
        self.persist_settings();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist_settings();
    }

    // --- Exercise library ---

    #[must_use]
    pub fn library(&self) -> &ExerciseLibrary {
        &self.library
    }

    /// Adds a custom exercise to the library and persists the custom list.
    /// # Errors
    /// See [`ExerciseLibrary::add_custom`].
    pub fn add_custom_exercise(
        &mut self,
        name: &str,
        category: &str,
    ) -> Result<ExerciseDefinition, LibraryError> {
        let added = self.library.add_custom(name, category)?;
        self.persist_library();
        self.feedback.notify(
            FeedbackKind::Success,
            &format!("{} has been added to your library!", added.name),
        );
        Ok(added)
    }

    /// Removes a custom exercise from the library.
    /// # Errors
    /// See [`ExerciseLibrary::remove_custom`].
    pub fn remove_custom_exercise(&mut self, name: &str) -> Result<(), LibraryError> {
        self.library.remove_custom(name)?;
        self.persist_library();
        self.feedback.notify(FeedbackKind::Info, "Exercise deleted");
        Ok(())
    }
}
