// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use crate::error::MetadataError;
use crate::report::{PipelineEvent, SharedReporter};

use super::model::Metadata;

const SIDECAR_SUFFIX: &str = ".info.json";

/// Location of the sidecar the download tool writes next to an episode
pub fn sidecar_path(download_dir: &Path, episode_name: &str) -> PathBuf {
    download_dir.join(format!("{episode_name}{SIDECAR_SUFFIX}"))
}

/// Read episode metadata from a sidecar JSON file
pub fn read_metadata(path: &Path) -> Result<Metadata, MetadataError> {
    let content = std::fs::read(path).map_err(|e| MetadataError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_slice(&content).map_err(|e| MetadataError::JsonParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a sidecar, falling back to empty metadata on any failure
pub fn read_metadata_or_default(
    path: &Path,
    episode_name: &str,
    reporter: &SharedReporter,
) -> Metadata {
    read_metadata(path).unwrap_or_else(|e| {
        reporter.report(PipelineEvent::MetadataFailed {
            episode_name: episode_name.to_string(),
            error: e.to_string(),
        });
        Metadata::default()
    })
}
