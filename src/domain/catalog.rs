// Signal catalog - immutable registry of categories and their signals
use super::signal::{Category, SignalDefinition};
use super::telemetry::TIMESTAMP_FIELDS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate category `{0}`")]
    DuplicateCategory(String),
    #[error("signal `{signal}` in `{category}` is already defined in `{first}`")]
    DuplicateSignal {
        signal: String,
        category: String,
        first: String,
    },
    #[error("signal `{signal}` in `{category}` has an invalid range [{min}, {max}]")]
    InvalidRange {
        signal: String,
        category: String,
        min: f64,
        max: f64,
    },
    #[error("signal name `{0}` is reserved for snapshot timestamps")]
    ReservedName(String),
    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// Ordered, validated set of categories. Built once and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut category_names = HashSet::new();
        let mut signal_owners: Vec<(&str, &str)> = Vec::new();

        for category in &categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }

            for signal in &category.signals {
                if TIMESTAMP_FIELDS.contains(&signal.name.as_str()) {
                    return Err(CatalogError::ReservedName(signal.name.clone()));
                }

                let range = signal.range;
                if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                    return Err(CatalogError::InvalidRange {
                        signal: signal.name.clone(),
                        category: category.name.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }

                if let Some((_, first)) = signal_owners.iter().find(|(name, _)| *name == signal.name) {
                    return Err(CatalogError::DuplicateSignal {
                        signal: signal.name.clone(),
                        category: category.name.clone(),
                        first: first.to_string(),
                    });
                }
                signal_owners.push((signal.name.as_str(), category.name.as_str()));
            }
        }

        Ok(Self { categories })
    }

    /// Parse a catalog from TOML (`[[categories]]` tables with nested `[[categories.signals]]`).
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn signals(&self, category: &str) -> Option<&[SignalDefinition]> {
        self.category(category).map(|c| c.signals.as_slice())
    }

    pub fn signal_definition(&self, category: &str, signal: &str) -> Option<&SignalDefinition> {
        self.category(category).and_then(|c| c.signal(signal))
    }

    /// All signals flattened in display order, paired with their category.
    pub fn iter_signals(&self) -> impl Iterator<Item = (&Category, &SignalDefinition)> {
        self.categories
            .iter()
            .flat_map(|c| c.signals.iter().map(move |s| (c, s)))
    }

    pub fn signal_count(&self) -> usize {
        self.categories.iter().map(|c| c.signals.len()).sum()
    }

    /// Signals of `category` matching `query`, in display order.
    /// The query is used as typed; surrounding whitespace is part of the match.
    pub fn search(&self, category: &str, query: &str) -> Option<Vec<&SignalDefinition>> {
        self.signals(category)
            .map(|signals| signals.iter().filter(|s| s.matches_query(query)).collect())
    }
}
