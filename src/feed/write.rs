// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::WriteError;
use crate::report::{PipelineEvent, SharedReporter};

/// Name of the feed document inside the download folder
pub const FEED_FILENAME: &str = "podcast.xml";

const PARTIAL_SUFFIX: &str = ".partial";

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Write `content` to `path` as UTF-8 without ever exposing a half-written file.
///
/// The content goes to `<path>.partial` first and is renamed into place once
/// it has been flushed to disk.
pub fn write_feed(path: &Path, content: &str) -> Result<(), WriteError> {
    let partial = partial_path(path);

    let write = || -> std::io::Result<()> {
        let mut file = File::create(&partial)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    };

    if let Err(e) = write() {
        let _ = std::fs::remove_file(&partial);
        return Err(WriteError::WriteFailed {
            path: partial,
            source: e,
        });
    }

    std::fs::rename(&partial, path).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        WriteError::RenameFailed {
            from: partial.clone(),
            to: path.to_path_buf(),
            source: e,
        }
    })
}

/// Write the feed, reporting the outcome instead of returning it
pub fn write_feed_or_report(path: &Path, content: &str, reporter: &SharedReporter) -> bool {
    match write_feed(path, content) {
        Ok(()) => {
            reporter.report(PipelineEvent::FeedWritten {
                path: path.to_path_buf(),
            });
            true
        }
        Err(e) => {
            reporter.report(PipelineEvent::FeedWriteFailed {
                error: e.to_string(),
            });
            false
        }
    }
}
