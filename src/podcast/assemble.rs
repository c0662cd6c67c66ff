// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::report::SharedReporter;

use super::model::Podcast;
use super::sidecar::{read_metadata_or_default, sidecar_path};

/// Attach sidecar metadata to every episode.
///
/// The result has the same episodes in the same order, each carrying
/// metadata. A missing or broken sidecar yields empty metadata rather than
/// dropping the episode.
pub fn assemble_podcast(
    podcast: Podcast,
    download_dir: &Path,
    reporter: &SharedReporter,
) -> Podcast {
    let episodes = podcast
        .episodes
        .iter()
        .cloned()
        .map(|episode| {
            let path = sidecar_path(download_dir, &episode.name);
            let info = read_metadata_or_default(&path, &episode.name, reporter);
            episode.with_info(info)
        })
        .collect();

    podcast.with_episodes(episodes)
}
