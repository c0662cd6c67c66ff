// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::DownloadError;
use crate::podcast::Episode;
use crate::report::{OutputStream, PipelineEvent, SharedReporter};

use super::tool::{Downloader, ToolOutput};

/// Position of a download within the run
#[derive(Debug, Clone, Copy)]
pub struct DownloadContext {
    /// Index of this episode in the configuration
    pub episode_index: usize,
    pub total_episodes: usize,
}

/// Create the download folder if needed. Failure is reported, not returned.
pub fn ensure_download_dir(download_dir: &Path, reporter: &SharedReporter) -> bool {
    if download_dir.is_dir() {
        return true;
    }

    match std::fs::create_dir_all(download_dir) {
        Ok(()) => true,
        Err(e) => {
            let error = DownloadError::CreateFolderFailed {
                path: download_dir.to_path_buf(),
                source: e,
            };
            reporter.report(PipelineEvent::DownloadFolderFailed {
                path: download_dir.to_path_buf(),
                error: error.to_string(),
            });
            false
        }
    }
}

/// Run the download tool for one episode and report what it printed.
///
/// The destination stem is `<download_dir>/<episode.name>`; the tool picks
/// the extension. Returns the captured output, which is empty when the tool
/// could not be launched.
pub async fn download_episode<D: Downloader + ?Sized>(
    downloader: &D,
    episode: &Episode,
    download_dir: &Path,
    context: DownloadContext,
    reporter: &SharedReporter,
) -> ToolOutput {
    reporter.report(PipelineEvent::DownloadStarting {
        episode_name: episode.name.clone(),
        url: episode.url.clone(),
        episode_index: context.episode_index,
        total_episodes: context.total_episodes,
    });

    let destination = download_dir.join(&episode.name);

    let output = match downloader.fetch_audio(&destination, &episode.url).await {
        Ok(output) => output,
        Err(e) => {
            reporter.report(PipelineEvent::DownloadFailed {
                episode_name: episode.name.clone(),
                error: e.to_string(),
            });
            return ToolOutput::default();
        }
    };

    for (stream, text) in [
        (OutputStream::Stdout, &output.stdout),
        (OutputStream::Stderr, &output.stderr),
    ] {
        let text = text.trim_end();
        if !text.is_empty() {
            reporter.report(PipelineEvent::DownloadOutput {
                episode_name: episode.name.clone(),
                stream,
                text: text.to_string(),
            });
        }
    }

    reporter.report(PipelineEvent::DownloadFinished {
        episode_name: episode.name.clone(),
    });

    output
}
