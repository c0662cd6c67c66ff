// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::DownloadError;

/// Where the download tool is expected when it is not on PATH
pub const FALLBACK_EXECUTABLE: &str = "/usr/local/bin/yt-dlp";

const EXECUTABLE_NAME: &str = "yt-dlp";

/// Everything the external tool printed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Audio extraction abstraction for testability
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetch the audio at `url` into files named after `destination`.
    ///
    /// Blocks until the tool exits. Only a failure to launch is an error;
    /// the exit status is not inspected.
    async fn fetch_audio(&self, destination: &Path, url: &str)
    -> Result<ToolOutput, DownloadError>;
}

/// Downloader backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    executable: PathBuf,
}

impl YtDlp {
    /// Use an explicit executable path
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Find `yt-dlp` in PATH, or assume the fallback location
    pub fn from_path() -> Self {
        which::which(EXECUTABLE_NAME)
            .map(Self::new)
            .unwrap_or_else(|_| Self::new(FALLBACK_EXECUTABLE))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments for an MP3-only download that also writes the `.info.json` sidecar
    pub fn arguments(destination: &Path, url: &str) -> Vec<OsString> {
        vec![
            "--output".into(),
            destination.as_os_str().to_owned(),
            "--extract-audio".into(),
            "--audio-format".into(),
            "mp3".into(),
            "--write-info-json".into(),
            url.into(),
        ]
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::from_path()
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn fetch_audio(
        &self,
        destination: &Path,
        url: &str,
    ) -> Result<ToolOutput, DownloadError> {
        let output = Command::new(&self.executable)
            .args(Self::arguments(destination, url))
            .output()
            .await
            .map_err(|e| DownloadError::LaunchFailed {
                executable: self.executable.clone(),
                url: url.to_string(),
                source: e,
            })?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
