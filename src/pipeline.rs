// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use crate::download::{DownloadContext, Downloader, download_episode, ensure_download_dir};
use crate::feed::{FEED_FILENAME, feed_items, render_feed, write_feed_or_report};
use crate::podcast::{CONFIG_FILENAME, assemble_podcast, load_podcast_or_default};
use crate::report::{PipelineEvent, SharedReporter};

/// Options for a feed build
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Configuration file listing the episodes
    pub config_path: PathBuf,
    /// Where audio, sidecars and the feed end up
    pub download_dir: PathBuf,
}

impl RunOptions {
    /// Read the configuration from the working directory
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_FILENAME),
            download_dir: download_dir.into(),
        }
    }

    pub fn feed_path(&self) -> PathBuf {
        self.download_dir.join(FEED_FILENAME)
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunResult {
    pub feed_path: PathBuf,
    /// Whether the feed reached the disk
    pub feed_written: bool,
    /// Number of `<item>` elements in the feed
    pub item_count: usize,
}

/// Build the feed: load the configuration, download every episode in
/// order, attach sidecar metadata, render and write `podcast.xml`.
///
/// Never fails. Every problem along the way is reported and the run
/// continues with the degraded value.
pub async fn run_pipeline<D: Downloader + ?Sized>(
    downloader: &D,
    options: &RunOptions,
    reporter: &SharedReporter,
) -> RunResult {
    let podcast = load_podcast_or_default(&options.config_path, reporter);

    ensure_download_dir(&options.download_dir, reporter);

    let total_episodes = podcast.episodes.len();
    for (episode_index, episode) in podcast.episodes.iter().enumerate() {
        let context = DownloadContext {
            episode_index,
            total_episodes,
        };
        download_episode(downloader, episode, &options.download_dir, context, reporter).await;
    }

    let podcast = assemble_podcast(podcast, &options.download_dir, reporter);

    let xml = render_feed(&podcast);
    let item_count = feed_items(&podcast).count();
    reporter.report(PipelineEvent::FeedRendered {
        item_count,
        skipped_count: podcast.episodes.len() - item_count,
    });

    let feed_path = options.feed_path();
    let feed_written = write_feed_or_report(&feed_path, &xml, reporter);

    RunResult {
        feed_path,
        feed_written,
        item_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::download::ToolOutput;
    use crate::error::DownloadError;
    use crate::podcast::{Episode, Podcast, sidecar_path};
    use crate::report::{CollectingReporter, NoopReporter, Severity};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Behaves like the download tool: writes an audio file and a sidecar
    /// next to the destination stem.
    struct FakeDownloader {
        sidecars: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDownloader {
        fn new(sidecars: &[(&str, &str)]) -> Self {
            Self {
                sidecars: sidecars
                    .iter()
                    .map(|(url, json)| (url.to_string(), json.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Downloader for FakeDownloader {
        async fn fetch_audio(
            &self,
            destination: &Path,
            url: &str,
        ) -> Result<ToolOutput, DownloadError> {
            self.calls.lock().unwrap().push(url.to_string());

            if let Some(json) = self.sidecars.get(url) {
                let mut audio = destination.as_os_str().to_owned();
                audio.push(".mp3");
                std::fs::write(audio, b"fake audio").unwrap();

                let mut sidecar = destination.as_os_str().to_owned();
                sidecar.push(".info.json");
                std::fs::write(sidecar, json).unwrap();
            }

            Ok(ToolOutput {
                stdout: format!("[download] {url}\n"),
                stderr: String::new(),
            })
        }
    }

    struct UnlaunchableDownloader;

    #[async_trait]
    impl Downloader for UnlaunchableDownloader {
        async fn fetch_audio(
            &self,
            _destination: &Path,
            url: &str,
        ) -> Result<ToolOutput, DownloadError> {
            Err(DownloadError::LaunchFailed {
                executable: PathBuf::from("/usr/local/bin/yt-dlp"),
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }
    }

    fn write_config(dir: &Path, episodes: &[(&str, &str)]) -> PathBuf {
        let podcast = Podcast {
            title: "T".to_string(),
            link: "https://example.com".to_string(),
            language: "en".to_string(),
            author: "Someone".to_string(),
            summary: "Short".to_string(),
            description: "About http://example.com/?utm_source=feed".to_string(),
            image: "https://example.com/art.jpg".to_string(),
            category: "Music".to_string(),
            explicit: false,
            base_url: "https://cdn.example.com/audio".to_string(),
            episodes: episodes
                .iter()
                .map(|(name, url)| Episode {
                    name: name.to_string(),
                    url: url.to_string(),
                    info: None,
                })
                .collect(),
        };
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, serde_json::to_string_pretty(&podcast).unwrap()).unwrap();
        path
    }

    fn options(config_path: PathBuf, download_dir: PathBuf) -> RunOptions {
        RunOptions {
            config_path,
            download_dir,
        }
    }

    #[tokio::test]
    async fn builds_feed_end_to_end() {
        let dir = tempdir().unwrap();
        let download_dir = dir.path().join("downloads");
        let config = write_config(dir.path(), &[("ep1", "http://src/1")]);
        let downloader = FakeDownloader::new(&[(
            "http://src/1",
            r#"{"id":"g1","title":"Episode One","description":"desc"}"#,
        )]);

        let result = run_pipeline(
            &downloader,
            &options(config, download_dir.clone()),
            &NoopReporter::shared(),
        )
        .await;

        assert!(result.feed_written);
        assert_eq!(result.item_count, 1);
        assert_eq!(result.feed_path, download_dir.join("podcast.xml"));
        assert!(download_dir.join("ep1.mp3").exists());

        let xml = std::fs::read_to_string(&result.feed_path).unwrap();
        assert!(xml.contains("<title>T</title>"));
        assert!(xml.contains("<description>About http://example.com/</description>"));
        assert_eq!(xml.matches("<item>").count(), 1);
        assert!(xml.contains("<guid>g1</guid>"));
        assert!(xml.contains(r#"<enclosure url="https://cdn.example.com/audio/ep1" "#));
    }

    #[tokio::test]
    async fn downloads_episodes_in_configuration_order() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            &[("c", "http://src/c"), ("a", "http://src/a"), ("b", "http://src/b")],
        );
        let downloader = FakeDownloader::new(&[
            ("http://src/c", r#"{"id":"gc","title":"C","description":""}"#),
            ("http://src/a", r#"{"id":"ga","title":"A","description":""}"#),
            ("http://src/b", r#"{"id":"gb","title":"B","description":""}"#),
        ]);

        let result = run_pipeline(
            &downloader,
            &options(config, dir.path().to_path_buf()),
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(
            *downloader.calls.lock().unwrap(),
            vec!["http://src/c", "http://src/a", "http://src/b"]
        );

        let xml = std::fs::read_to_string(&result.feed_path).unwrap();
        let positions: Vec<_> = ["gc", "ga", "gb"]
            .iter()
            .map(|id| xml.find(&format!("<guid>{id}</guid>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn missing_sidecar_yields_item_with_empty_metadata() {
        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), &[("ep1", "http://src/1"), ("ep2", "http://src/2")]);
        let downloader = FakeDownloader::new(&[(
            "http://src/1",
            r#"{"id":"g1","title":"Episode One","description":"desc"}"#,
        )]);
        let reporter = Arc::new(CollectingReporter::default());
        let shared: SharedReporter = reporter.clone();

        let result = run_pipeline(
            &downloader,
            &options(config, dir.path().to_path_buf()),
            &shared,
        )
        .await;

        assert!(!sidecar_path(dir.path(), "ep2").exists());
        assert_eq!(result.item_count, 2);
        let xml = std::fs::read_to_string(&result.feed_path).unwrap();
        assert!(xml.contains("<guid></guid>"));
        assert!(xml.contains(r#"url="https://cdn.example.com/audio/ep2""#));
        assert!(reporter.events().iter().any(
            |e| matches!(e, PipelineEvent::MetadataFailed { episode_name, .. } if episode_name == "ep2")
        ));
    }

    #[tokio::test]
    async fn unlaunchable_tool_still_writes_feed() {
        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), &[("ep1", "http://src/1")]);
        let reporter = Arc::new(CollectingReporter::default());
        let shared: SharedReporter = reporter.clone();

        let result = run_pipeline(
            &UnlaunchableDownloader,
            &options(config, dir.path().to_path_buf()),
            &shared,
        )
        .await;

        assert!(result.feed_written);
        // One for the launch, one for the missing sidecar
        assert_eq!(reporter.count(Severity::Error), 2);
    }

    #[tokio::test]
    async fn missing_configuration_writes_empty_feed() {
        let dir = tempdir().unwrap();
        let downloader = FakeDownloader::new(&[]);
        let reporter = Arc::new(CollectingReporter::default());
        let shared: SharedReporter = reporter.clone();

        let result = run_pipeline(
            &downloader,
            &options(dir.path().join(CONFIG_FILENAME), dir.path().to_path_buf()),
            &shared,
        )
        .await;

        assert!(result.feed_written);
        assert_eq!(result.item_count, 0);
        assert!(downloader.calls.lock().unwrap().is_empty());

        let xml = std::fs::read_to_string(&result.feed_path).unwrap();
        assert!(xml.contains("<title></title>"));
        assert!(xml.contains("<itunes:explicit>False</itunes:explicit>"));
        assert!(reporter.events().iter().any(|e| matches!(e, PipelineEvent::ConfigFailed { .. })));
    }

    #[tokio::test]
    async fn reports_rendered_and_written_feed() {
        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), &[("ep1", "http://src/1")]);
        let downloader = FakeDownloader::new(&[(
            "http://src/1",
            r#"{"id":"g1","title":"Episode One","description":"desc"}"#,
        )]);
        let reporter = Arc::new(CollectingReporter::default());
        let shared: SharedReporter = reporter.clone();

        run_pipeline(
            &downloader,
            &options(config, dir.path().to_path_buf()),
            &shared,
        )
        .await;

        let events = reporter.events();
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::FeedRendered {
                item_count: 1,
                skipped_count: 0
            }
        )));
        assert!(matches!(events.last(), Some(PipelineEvent::FeedWritten { .. })));
        assert_eq!(reporter.count(Severity::Error), 0);
    }

    #[test]
    fn default_options_use_working_directory() {
        let options = RunOptions::default();
        assert_eq!(options.config_path, PathBuf::from("listOfSounds.json"));
        assert_eq!(options.download_dir, PathBuf::from("."));
        assert_eq!(options.feed_path(), PathBuf::from("./podcast.xml"));
    }
}
