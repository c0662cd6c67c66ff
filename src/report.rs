// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// How loudly an event should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Notice,
    Error,
}

/// Which stream of the external tool a captured chunk of output came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Events emitted while building a feed
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Configuration file was decoded successfully
    ConfigLoaded {
        path: PathBuf,
        podcast_title: String,
        episode_count: usize,
    },

    /// Configuration could not be read or decoded; an empty podcast is used
    ConfigFailed { error: String },

    /// An episode name is not safe to use as a file name
    UnsafeEpisodeName { name: String },

    /// More than one episode uses the same name
    DuplicateEpisodeName { name: String },

    /// The download folder does not exist and could not be created
    DownloadFolderFailed { path: PathBuf, error: String },

    /// The external tool is about to be invoked for an episode
    DownloadStarting {
        episode_name: String,
        url: String,
        /// Position of this episode in the configuration
        episode_index: usize,
        total_episodes: usize,
    },

    /// Captured output of the external tool
    DownloadOutput {
        episode_name: String,
        stream: OutputStream,
        text: String,
    },

    /// The external tool exited (its exit status is not inspected)
    DownloadFinished { episode_name: String },

    /// The external tool could not be launched
    DownloadFailed { episode_name: String, error: String },

    /// A metadata sidecar could not be read or decoded; empty metadata is used
    MetadataFailed { episode_name: String, error: String },

    /// The feed document was rendered
    FeedRendered {
        item_count: usize,
        skipped_count: usize,
    },

    /// The feed document was written to disk
    FeedWritten { path: PathBuf },

    /// The feed document could not be written
    FeedWriteFailed { error: String },
}

impl PipelineEvent {
    pub fn severity(&self) -> Severity {
        match self {
            PipelineEvent::ConfigLoaded { .. }
            | PipelineEvent::DownloadStarting { .. }
            | PipelineEvent::DownloadFinished { .. }
            | PipelineEvent::FeedRendered { .. } => Severity::Info,

            PipelineEvent::DownloadOutput { stream, .. } => match stream {
                OutputStream::Stdout => Severity::Info,
                OutputStream::Stderr => Severity::Notice,
            },

            PipelineEvent::UnsafeEpisodeName { .. }
            | PipelineEvent::DuplicateEpisodeName { .. }
            | PipelineEvent::FeedWritten { .. } => Severity::Notice,

            PipelineEvent::ConfigFailed { .. }
            | PipelineEvent::DownloadFolderFailed { .. }
            | PipelineEvent::DownloadFailed { .. }
            | PipelineEvent::MetadataFailed { .. }
            | PipelineEvent::FeedWriteFailed { .. } => Severity::Error,
        }
    }
}

/// Sink for pipeline diagnostics.
///
/// Every component that needs to say something receives a reporter
/// explicitly; there is no global logging switch.
pub trait Reporter: Send + Sync {
    /// Report an event
    fn report(&self, event: PipelineEvent);
}

/// A shared reference to a reporter
pub type SharedReporter = Arc<dyn Reporter>;

/// A reporter that silently ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: PipelineEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedReporter {
        Arc::new(Self)
    }
}

/// Forwards events to `tracing`, for whatever subscriber the binary installed.
///
/// Info maps to `INFO`, Notice to `WARN` and Error to `ERROR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn shared() -> SharedReporter {
        Arc::new(Self)
    }
}

impl Reporter for TracingReporter {
    fn report(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::ConfigLoaded {
                path,
                podcast_title,
                episode_count,
            } => {
                tracing::info!(path = %path.display(), %podcast_title, episode_count, "Configuration loaded");
            }
            PipelineEvent::ConfigFailed { error } => {
                tracing::error!(%error, "Configuration unusable, continuing with an empty podcast");
            }
            PipelineEvent::UnsafeEpisodeName { name } => {
                tracing::warn!(episode = %name, "Episode name is not a safe file name");
            }
            PipelineEvent::DuplicateEpisodeName { name } => {
                tracing::warn!(episode = %name, "Episode name is used more than once");
            }
            PipelineEvent::DownloadFolderFailed { path, error } => {
                tracing::error!(path = %path.display(), %error, "Download folder unavailable");
            }
            PipelineEvent::DownloadStarting {
                episode_name,
                url,
                episode_index,
                total_episodes,
            } => {
                tracing::info!(
                    episode = %episode_name,
                    %url,
                    position = episode_index + 1,
                    total = total_episodes,
                    "Downloading episode"
                );
            }
            PipelineEvent::DownloadOutput {
                episode_name,
                stream,
                text,
            } => match stream {
                OutputStream::Stdout => {
                    tracing::info!(episode = %episode_name, stream = "stdout", "{text}");
                }
                OutputStream::Stderr => {
                    tracing::warn!(episode = %episode_name, stream = "stderr", "{text}");
                }
            },
            PipelineEvent::DownloadFinished { episode_name } => {
                tracing::info!(episode = %episode_name, "Download tool exited");
            }
            PipelineEvent::DownloadFailed {
                episode_name,
                error,
            } => {
                tracing::error!(episode = %episode_name, %error, "Download failed");
            }
            PipelineEvent::MetadataFailed {
                episode_name,
                error,
            } => {
                tracing::error!(episode = %episode_name, %error, "Metadata unusable, continuing with empty metadata");
            }
            PipelineEvent::FeedRendered {
                item_count,
                skipped_count,
            } => {
                tracing::info!(item_count, skipped_count, "Feed rendered");
            }
            PipelineEvent::FeedWritten { path } => {
                tracing::warn!(path = %path.display(), "Feed written");
            }
            PipelineEvent::FeedWriteFailed { error } => {
                tracing::error!(%error, "Failed to write feed");
            }
        }
    }
}

/// Reporter that keeps every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CollectingReporter {
    events: std::sync::Mutex<Vec<PipelineEvent>>,
}

#[cfg(test)]
impl CollectingReporter {
    pub(crate) fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, severity: Severity) -> usize {
        self.events()
            .iter()
            .filter(|e| e.severity() == severity)
            .count()
    }
}

#[cfg(test)]
impl Reporter for CollectingReporter {
    fn report(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
