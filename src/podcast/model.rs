// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Feed definition and the episodes it mirrors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub title: String,
    pub link: String,
    pub language: String,
    pub author: String,
    pub summary: String,
    pub description: String,
    /// Artwork URL
    pub image: String,
    pub category: String,
    pub explicit: bool,
    /// Prefix for public enclosure URLs
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Feed item order
    pub episodes: Vec<Episode>,
}

/// One audio source to mirror
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Download file stem and enclosure path segment
    pub name: String,
    /// Source location handed to the download tool
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Metadata>,
}

/// Sidecar metadata written by the download tool.
///
/// The sidecar carries many more keys; only these three are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Used as the feed item's GUID
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Podcast {
    /// Functional update: same scalar fields, new episode list
    pub fn with_episodes(self, episodes: Vec<Episode>) -> Self {
        Self { episodes, ..self }
    }
}

impl Episode {
    pub fn with_info(self, info: Metadata) -> Self {
        Self {
            info: Some(info),
            ..self
        }
    }
}
