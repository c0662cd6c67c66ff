// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::podcast::{Episode, Metadata, Podcast};

use super::clean::strip_query_strings;

const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

/// Render a podcast as an RSS 2.0 document with iTunes extensions.
///
/// Episodes without metadata are left out of the feed. Copyright, subtitle,
/// owner and most per-item fields are emitted empty.
pub fn render_feed(podcast: &Podcast) -> String {
    let explicit = if podcast.explicit { "True" } else { "False" };

    let mut items = String::new();
    for (episode, info) in feed_items(podcast) {
        render_item(&mut items, &podcast.base_url, episode, info);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:itunes="{ITUNES_NAMESPACE}" version="2.0">
<channel>
  <title>{title}</title>
  <description>{description}</description>
  <link>{link}</link>
  <language>{language}</language>
  <copyright></copyright>
  <itunes:subtitle></itunes:subtitle>
  <itunes:author>{author}</itunes:author>
  <itunes:summary>{summary}</itunes:summary>
  <itunes:explicit>{explicit}</itunes:explicit>
  <itunes:owner>
    <itunes:name></itunes:name>
    <itunes:email></itunes:email>
  </itunes:owner>
  <itunes:image href="{image}" />
  <itunes:category text="{category}"/>
{items}</channel>
</rss>
"#,
        title = text(&podcast.title),
        description = text(&strip_query_strings(&podcast.description)),
        link = text(&podcast.link),
        language = text(&podcast.language),
        author = text(&podcast.author),
        summary = text(&podcast.summary),
        image = attr(&podcast.image),
        category = attr(&podcast.category),
    )
}

/// Episodes that make it into the feed, in order, with their metadata
pub fn feed_items(podcast: &Podcast) -> impl Iterator<Item = (&Episode, &Metadata)> {
    podcast
        .episodes
        .iter()
        .filter_map(|episode| episode.info.as_ref().map(|info| (episode, info)))
}

/// Public URL of an episode's audio
pub fn enclosure_url(base_url: &str, episode_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), episode_name)
}

fn render_item(out: &mut String, base_url: &str, episode: &Episode, info: &Metadata) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        r#"  <item>
    <title>{title}</title>
    <itunes:author></itunes:author>
    <itunes:subtitle></itunes:subtitle>
    <description>{description}</description>
    <itunes:image href="" />
    <enclosure url="{url}" length="" type="audio/mpeg"/>
    <guid>{guid}</guid>
    <pubDate></pubDate>
    <itunes:duration></itunes:duration>
  </item>
"#,
        title = text(&info.title),
        description = text(&strip_query_strings(&info.description)),
        url = attr(&enclosure_url(base_url, &episode.name)),
        guid = text(&info.id),
    );
}
