// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::report::{PipelineEvent, SharedReporter};

use super::model::Podcast;

/// Configuration file read from the working directory
pub const CONFIG_FILENAME: &str = "listOfSounds.json";

/// Read and decode a podcast configuration file
pub fn load_podcast(path: &Path) -> Result<Podcast, ConfigError> {
    let content = std::fs::read(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_slice(&content).map_err(|e| ConfigError::JsonParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the configuration, falling back to an empty podcast on any failure.
///
/// Failures are reported, never returned. On success the episode names are
/// checked and suspicious ones reported; no episode is dropped.
pub fn load_podcast_or_default(path: &Path, reporter: &SharedReporter) -> Podcast {
    match load_podcast(path) {
        Ok(podcast) => {
            reporter.report(PipelineEvent::ConfigLoaded {
                path: path.to_path_buf(),
                podcast_title: podcast.title.clone(),
                episode_count: podcast.episodes.len(),
            });
            check_episode_names(&podcast, reporter);
            podcast
        }
        Err(e) => {
            reporter.report(PipelineEvent::ConfigFailed {
                error: e.to_string(),
            });
            Podcast::default()
        }
    }
}

/// Report names that are unsafe as file names or used more than once
fn check_episode_names(podcast: &Podcast, reporter: &SharedReporter) {
    let mut seen = HashSet::new();

    for episode in &podcast.episodes {
        if episode.name.is_empty() || !sanitize_filename::is_sanitized(&episode.name) {
            reporter.report(PipelineEvent::UnsafeEpisodeName {
                name: episode.name.clone(),
            });
        }
        if !seen.insert(episode.name.as_str()) {
            reporter.report(PipelineEvent::DuplicateEpisodeName {
                name: episode.name.clone(),
            });
        }
    }
}
