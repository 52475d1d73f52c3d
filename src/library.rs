//src/library.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Muscle-group categories exercises are filed under.
pub const CATEGORIES: [&str; 7] = [
    "Chest",
    "Back",
    "Legs",
    "Shoulders",
    "Arms",
    "Core",
    "Cardio",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Exercise name cannot be empty.")]
    EmptyName,
    #[error("An exercise named '{0}' already exists in the library.")]
    DuplicateName(String),
    #[error("Unknown category '{0}'. Expected one of: Chest, Back, Legs, Shoulders, Arms, Core, Cardio.")]
    UnknownCategory(String),
    #[error("Exercise '{0}' not found in the library.")]
    NotFound(String),
    #[error("'{0}' is a built-in exercise and cannot be removed.")]
    NotCustom(String),
}

/// A library entry selectable when building a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDefinition {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl ExerciseDefinition {
    fn builtin(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            is_custom: false,
        }
    }
}

fn builtin_exercises() -> Vec<ExerciseDefinition> {
    [
        ("Bench Press", "Chest"),
        ("Squat", "Legs"),
        ("Deadlift", "Back"),
        ("Overhead Press", "Shoulders"),
        ("Barbell Row", "Back"),
        ("Pull-ups", "Back"),
        ("Dips", "Chest"),
        ("Bicep Curls", "Arms"),
        ("Tricep Extensions", "Arms"),
        ("Lateral Raises", "Shoulders"),
        ("Leg Press", "Legs"),
        ("Incline Bench Press", "Chest"),
        ("Romanian Deadlift", "Legs"),
        ("Face Pulls", "Shoulders"),
        ("Leg Curls", "Legs"),
    ]
    .iter()
    .map(|(name, category)| ExerciseDefinition::builtin(name, category))
    .collect()
}

/// The exercise catalogue: a fixed built-in list plus user-defined custom
/// exercises. Only the custom entries are persisted.
#[derive(Debug, Default, Clone)]
pub struct ExerciseLibrary {
    custom: Vec<ExerciseDefinition>,
}

impl ExerciseLibrary {
    #[must_use]
    pub fn new(custom: Vec<ExerciseDefinition>) -> Self {
        Self { custom }
    }

    /// All entries, built-ins first, custom exercises after.
    #[must_use]
    pub fn exercises(&self) -> Vec<ExerciseDefinition> {
        let mut all = builtin_exercises();
        all.extend(self.custom.iter().cloned());
        all
    }

    /// The persisted portion of the library.
    #[must_use]
    pub fn custom_exercises(&self) -> &[ExerciseDefinition] {
        &self.custom
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.exercises()
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Adds a custom exercise.
    /// # Errors
    /// `EmptyName` for a blank name, `UnknownCategory` for a category not in
    /// [`CATEGORIES`], `DuplicateName` if any entry (built-in or custom)
    /// already uses the name, case-insensitively.
    pub fn add_custom(
        &mut self,
        name: &str,
        category: &str,
    ) -> Result<ExerciseDefinition, LibraryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        let category = CATEGORIES
            .iter()
            .find(|c| c.eq_ignore_ascii_case(category))
            .ok_or_else(|| LibraryError::UnknownCategory(category.to_string()))?;
        if self.contains(trimmed) {
            return Err(LibraryError::DuplicateName(trimmed.to_string()));
        }
        let added = ExerciseDefinition {
            name: trimmed.to_string(),
            category: (*category).to_string(),
            is_custom: true,
        };
        self.custom.push(added.clone());
        Ok(added)
    }

    /// Removes a custom exercise by name.
    /// # Errors
    /// `NotCustom` when the name matches a built-in entry, `NotFound` when
    /// it matches nothing.
    pub fn remove_custom(&mut self, name: &str) -> Result<(), LibraryError> {
        if builtin_exercises()
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name))
        {
            return Err(LibraryError::NotCustom(name.to_string()));
        }
        let before = self.custom.len();
        self.custom.retain(|e| !e.name.eq_ignore_ascii_case(name));
        if self.custom.len() == before {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Case-insensitive substring search over names and categories.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<ExerciseDefinition> {
        let query = query.to_lowercase();
        self.exercises()
            .into_iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&query)
                    || e.category.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let library = ExerciseLibrary::default();
        assert_eq!(library.exercises().len(), 15);
        assert!(library.contains("Bench Press"));
    }

    #[test]
    fn test_add_custom_rejects_case_insensitive_duplicate() {
        let mut library = ExerciseLibrary::default();
        assert_eq!(
            library.add_custom("bench press", "Chest"),
            Err(LibraryError::DuplicateName("bench press".into()))
        );
        library.add_custom("Cable Fly", "Chest").unwrap();
        assert_eq!(
            library.add_custom("CABLE FLY", "Chest"),
            Err(LibraryError::DuplicateName("CABLE FLY".into()))
        );
    }

    #[test]
    fn test_add_custom_validates_input() {
        let mut library = ExerciseLibrary::default();
        assert_eq!(library.add_custom("   ", "Chest"), Err(LibraryError::EmptyName));
        assert_eq!(
            library.add_custom("Sled Push", "Forearms"),
            Err(LibraryError::UnknownCategory("Forearms".into()))
        );
        // Category match is case-insensitive but stored canonically.
        let added = library.add_custom("Sled Push", "legs").unwrap();
        assert_eq!(added.category, "Legs");
        assert!(added.is_custom);
    }

    #[test]
    fn test_remove_custom_only() {
        let mut library = ExerciseLibrary::default();
        library.add_custom("Cable Fly", "Chest").unwrap();
        assert_eq!(
            library.remove_custom("Squat"),
            Err(LibraryError::NotCustom("Squat".into()))
        );
        assert_eq!(
            library.remove_custom("Ghost Lift"),
            Err(LibraryError::NotFound("Ghost Lift".into()))
        );
        library.remove_custom("cable fly").unwrap();
        assert!(!library.contains("Cable Fly"));
    }

    #[test]
    fn test_search_matches_name_and_category() {
        let library = ExerciseLibrary::default();
        let by_name = library.search("press");
        assert!(by_name.iter().any(|e| e.name == "Bench Press"));
        assert!(by_name.iter().any(|e| e.name == "Leg Press"));
        let by_category = library.search("shoulders");
        assert!(by_category.iter().all(|e| e.category == "Shoulders"));
        assert_eq!(by_category.len(), 3);
    }
}
