//! Correction table
//!
//! Maps a category (`country`, `city`, `name`, ...) to a set of known
//! misspellings and their canonical form. Keys are case-folded on
//! construction so lookups are case-insensitive.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Error loading a correction table file
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read correction table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse correction table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Immutable category -> alias -> canonical mapping
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    categories: HashMap<String, HashMap<String, String>>,
}

impl CorrectionTable {
    /// Build a table, case-folding category names and aliases.
    ///
    /// When two aliases fold to the same key the later one in iteration
    /// order wins.
    pub fn new(raw: HashMap<String, HashMap<String, String>>) -> Self {
        let categories = raw
            .into_iter()
            .map(|(category, aliases)| {
                let folded = aliases
                    .into_iter()
                    .map(|(alias, canonical)| (alias.to_lowercase(), canonical))
                    .collect();
                (category.to_lowercase(), folded)
            })
            .collect();
        Self { categories }
    }

    /// The table the service ships with
    pub fn builtin() -> Self {
        let entries: [(&str, &[(&str, &str)]); 3] = [
            (
                "country",
                &[("imndfia", "India"), ("untied states", "United States")],
            ),
            ("city", &[("punee", "Pune"), ("nyork", "New York")]),
            ("name", &[("johhn", "John"), ("kali", "Kylie")]),
        ];

        let raw = entries
            .iter()
            .map(|(category, aliases)| {
                let aliases = aliases
                    .iter()
                    .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                    .collect();
                ((*category).to_string(), aliases)
            })
            .collect();
        Self::new(raw)
    }

    /// Parse a TOML document of the form
    ///
    /// ```toml
    /// [country]
    /// imndfia = "India"
    /// "untied states" = "United States"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let raw: HashMap<String, HashMap<String, String>> = toml::from_str(content)?;
        Ok(Self::new(raw))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| TableError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Canonical form of `name` within `category`, if the table knows it.
    ///
    /// A missing or unknown category behaves as an empty mapping.
    pub fn lookup(&self, category: Option<&str>, name: &str) -> Option<&str> {
        let aliases = self.categories.get(&category?.to_lowercase())?;
        aliases.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}
