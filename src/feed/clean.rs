// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// A `?` followed by a run of word characters, `=`, `&` or `#`
static QUERY_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?[\w=&#]+").expect("valid query string pattern"));

/// Remove query strings (tracking parameters and the like) from free text
pub fn strip_query_strings(text: &str) -> Cow<'_, str> {
    QUERY_STRING.replace_all(text, "")
}
