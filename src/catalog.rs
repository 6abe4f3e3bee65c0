use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::error::{IntelligenceError, Result};
use crate::models::VideoCandidate;

/// Source of the candidate pool for feed requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn candidates(&self) -> Result<Vec<VideoCandidate>>;
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    videos: Vec<VideoCandidate>,
}

/// Fixed in-memory catalog, loaded once from a seed file
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    videos: Vec<VideoCandidate>,
}

impl SeedCatalog {
    pub fn new(videos: Vec<VideoCandidate>) -> Result<Self> {
        let mut ids = std::collections::HashSet::new();
        for video in &videos {
            if video.id.trim().is_empty() {
                return Err(IntelligenceError::Catalog(format!(
                    "video '{}' has an empty id",
                    video.title
                )));
            }
            if !ids.insert(video.id.as_str()) {
                return Err(IntelligenceError::Catalog(format!(
                    "duplicate video id '{}'",
                    video.id
                )));
            }
        }
        Ok(Self { videos })
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let seed: SeedFile = serde_yaml::from_str(contents)?;
        Self::new(seed.videos)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_yaml(&contents)?;
        tracing::info!(
            "Loaded {} seed videos from {}",
            catalog.videos.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// The two demo videos the platform ships with
    pub fn demo() -> Self {
        Self {
            videos: vec![
                VideoCandidate::new(
                    "intro-neural-networks",
                    "Intro to Neural Networks",
                    &["ai", "ml", "neural-networks"],
                    10,
                    5,
                ),
                VideoCandidate::new(
                    "what-is-big-o",
                    "What is Big O?",
                    &["algorithms", "complexity"],
                    10,
                    5,
                ),
            ],
        }
    }

    /// Seed file when one is configured and readable, demo videos otherwise
    pub fn load(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self::from_path(path).unwrap_or_else(|e| {
                tracing::error!("Failed to load seed catalog {}: {} - using demo videos", path, e);
                Self::demo()
            }),
            None => {
                tracing::warn!("No catalog seed path configured - using demo videos");
                Self::demo()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

#[async_trait]
impl VideoCatalog for SeedCatalog {
    async fn candidates(&self) -> Result<Vec<VideoCandidate>> {
        Ok(self.videos.clone())
    }
}
