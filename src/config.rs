//! Tracker configuration.

use std::path::PathBuf;

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "owid-covid-data.csv";

/// Entities included when no other list is given.
pub const DEFAULT_ENTITIES: [&str; 3] = ["Kenya", "United States", "India"];

/// Number of bars in the top-N chart.
pub const DEFAULT_TOP_N: usize = 10;

/// Where the forward/backward fill scan looks for neighbouring values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillScope {
    /// Scan each entity's rows separately
    Entity,
    /// Scan the whole filtered frame as one sequence
    Frame,
}

impl Default for FillScope {
    fn default() -> Self {
        FillScope::Frame
    }
}

/// Settings for one tracker run.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub data_file: PathBuf,
    pub entities: Vec<String>,
    pub top_n: usize,
    pub fill_scope: FillScope,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            entities: DEFAULT_ENTITIES.iter().map(|e| e.to_string()).collect(),
            top_n: DEFAULT_TOP_N,
            fill_scope: FillScope::default(),
        }
    }
}

#[cfg(test)]
impl TrackerConfig {
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fill_scope(mut self, scope: FillScope) -> Self {
        self.fill_scope = scope;
        self
    }
}
