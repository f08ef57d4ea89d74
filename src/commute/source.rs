use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::types::CommuteRecord;

use super::dataset::parse_dataset;

/// Where commute datasets come from.
///
/// Implementations report a missing or malformed dataset as
/// [`EngineError::DatasetUnavailable`]; [`super::CommuteLoader`] turns that into an empty result.
pub trait CommuteSource {
    /// Fetch the commute records for one city slug.
    fn fetch(&self, city: &str) -> impl Future<Output = EngineResult<Vec<CommuteRecord>>> + Send;
}

/// Reads `<root>/<city>.json` dataset files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the dataset file for `city`, or `None` if the slug cannot name a file in `root`.
    pub fn dataset_path(&self, city: &str) -> Option<PathBuf> {
        if city.is_empty() || city.starts_with('.') || city.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(format!("{city}.json")))
    }

    /// City slugs with a dataset file in the root directory, sorted.
    pub fn available_cities(&self) -> EngineResult<Vec<String>> {
        let pattern = format!(
            "{}/*.json",
            glob::Pattern::escape(&self.root.to_string_lossy())
        );
        let paths = glob::glob(&pattern)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let mut cities = Vec::new();
        for entry in paths {
            let path = entry.map_err(std::io::Error::from)?;
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                cities.push(stem.to_string());
            }
        }
        cities.sort();
        Ok(cities)
    }
}

impl CommuteSource for DirectorySource {
    fn fetch(&self, city: &str) -> impl Future<Output = EngineResult<Vec<CommuteRecord>>> + Send {
        let city = city.to_string();
        let path = self.dataset_path(&city);
        async move {
            let unavailable = |message: String| EngineError::DatasetUnavailable {
                city: city.clone(),
                message,
            };
            let path = path.ok_or_else(|| unavailable("invalid city identifier".to_string()))?;
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
            parse_dataset(&bytes).map_err(|e| unavailable(format!("malformed dataset: {e}")))
        }
    }
}

/// Datasets held in memory, keyed by city slug.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    datasets: HashMap<String, Vec<CommuteRecord>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the dataset for `city`.
    pub fn insert(&mut self, city: impl Into<String>, records: Vec<CommuteRecord>) {
        self.datasets.insert(city.into(), records);
    }

    pub fn with_dataset(mut self, city: impl Into<String>, records: Vec<CommuteRecord>) -> Self {
        self.insert(city, records);
        self
    }
}

impl CommuteSource for StaticSource {
    fn fetch(&self, city: &str) -> impl Future<Output = EngineResult<Vec<CommuteRecord>>> + Send {
        let result = self
            .datasets
            .get(city)
            .cloned()
            .ok_or_else(|| EngineError::DatasetUnavailable {
                city: city.to_string(),
                message: "unknown city".to_string(),
            });
        async move { result }
    }
}
