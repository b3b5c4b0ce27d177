/* Copyright (c) 2021 Niels Sonnich Poulsen (http://nielssp.dk)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Trending tag tally

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Tallies comma-separated tag fields and returns the `limit` most frequent tags.
///
/// Entries are trimmed and lower-cased before counting. Tags with equal counts keep
/// the order in which they were first seen, so the result only depends on the order
/// of `fields`.
pub fn trending_tags<I, S>(fields: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tally: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for field in fields {
        for tag in field.as_ref().split(',') {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            match positions.get(&tag) {
                Some(&i) => tally[i].count += 1,
                None => {
                    positions.insert(tag.clone(), tally.len());
                    tally.push(TagCount { name: tag, count: 1 });
                }
            }
        }
    }
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}
