// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use soundcast::{
    OutputStream, PipelineEvent, Reporter, RunOptions, SharedReporter, TracingReporter, YtDlp,
    run_pipeline,
};

// Emoji with fallback for terminals without Unicode support
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[?] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");

/// Mirror audio sources listed in listOfSounds.json into a podcast feed
#[derive(Parser, Debug)]
#[command(name = "soundcast")]
#[command(about = "Mirror audio sources into a self-hosted podcast feed")]
#[command(version)]
struct Args {
    /// Folder for downloaded audio, metadata sidecars and podcast.xml
    #[arg(short, long, default_value = ".")]
    download_folder: PathBuf,

    /// Print diagnostics to the terminal instead of the log
    #[arg(short, long)]
    terminal: bool,
}

/// Human-readable diagnostics with a spinner while the download tool runs
struct TerminalReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let style = ProgressStyle::with_template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));

        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = spinner.replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn stop_spinner(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }

    /// Print a line without tearing an active spinner
    fn line(&self, text: String) {
        let spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match spinner.as_ref() {
            Some(bar) => bar.println(text),
            None => println!("{text}"),
        }
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::ConfigLoaded {
                podcast_title,
                episode_count,
                ..
            } => {
                self.line(format!(
                    "{HEADPHONES}{} • {} episodes",
                    podcast_title.bold().green(),
                    episode_count.to_string().cyan()
                ));
            }

            PipelineEvent::ConfigFailed { error } => {
                self.line(format!("{FAILURE}{}", error.red()));
            }

            PipelineEvent::UnsafeEpisodeName { name } => {
                self.line(format!(
                    "{WARNING}Episode name {} is not a safe file name",
                    name.yellow()
                ));
            }

            PipelineEvent::DuplicateEpisodeName { name } => {
                self.line(format!(
                    "{WARNING}Episode name {} is used more than once",
                    name.yellow()
                ));
            }

            PipelineEvent::DownloadFolderFailed { error, .. } => {
                self.line(format!("{FAILURE}{}", error.red()));
            }

            PipelineEvent::DownloadStarting {
                episode_name,
                url,
                episode_index,
                total_episodes,
            } => {
                self.start_spinner(format!(
                    "{DOWNLOAD}[{}/{}] {} {}",
                    (episode_index + 1).to_string().cyan(),
                    total_episodes.to_string().cyan(),
                    episode_name.bold(),
                    url.dimmed()
                ));
            }

            PipelineEvent::DownloadOutput { stream, text, .. } => {
                for line in text.lines() {
                    match stream {
                        OutputStream::Stdout => self.line(format!("  {}", line.dimmed())),
                        OutputStream::Stderr => self.line(format!("  {}", line.yellow())),
                    }
                }
            }

            PipelineEvent::DownloadFinished { episode_name } => {
                self.stop_spinner();
                self.line(format!("{SUCCESS}{}", episode_name.green()));
            }

            PipelineEvent::DownloadFailed {
                episode_name,
                error,
            } => {
                self.stop_spinner();
                self.line(format!("{FAILURE}{} - {}", episode_name.red(), error.red()));
            }

            PipelineEvent::MetadataFailed {
                episode_name,
                error,
            } => {
                self.line(format!(
                    "{FAILURE}{} - {}",
                    episode_name.red(),
                    error.dimmed()
                ));
            }

            PipelineEvent::FeedRendered {
                item_count,
                skipped_count,
            } => {
                self.line(format!(
                    "{HEADPHONES}Feed has {} items, {} skipped",
                    item_count.to_string().green().bold(),
                    skipped_count.to_string().yellow()
                ));
            }

            PipelineEvent::FeedWritten { path } => {
                self.line(format!(
                    "{SUCCESS}Feed written to {}",
                    path.display().to_string().cyan()
                ));
            }

            PipelineEvent::FeedWriteFailed { error } => {
                self.line(format!("{FAILURE}{}", error.red()));
            }
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let reporter: SharedReporter = if args.terminal {
        Arc::new(TerminalReporter::new())
    } else {
        init_tracing()?;
        TracingReporter::shared()
    };

    let downloader = YtDlp::from_path();
    let options = RunOptions::new(args.download_folder);

    run_pipeline(&downloader, &options, &reporter).await;

    Ok(())
}
