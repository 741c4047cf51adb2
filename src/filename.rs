//! Filename sanitizing, and the per-run map of which file each background got.

use std::collections::BTreeMap;

use crate::constants::{FALLBACK_FILENAME_STEM, MAX_FILENAME_STEM};

/// Turns a title into a safe filename stem: lowercase ASCII alphanumerics
/// separated by single underscores, at most [MAX_FILENAME_STEM] long.
pub fn safe_filename(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch);
        } else if matches!(ch, ' ' | '-' | '_') && !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }

    // everything we keep is ASCII, byte truncation is safe
    stem.truncate(MAX_FILENAME_STEM);
    let stem = stem.trim_end_matches('_');

    if stem.is_empty() {
        FALLBACK_FILENAME_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// The image filename for a title, `<stem>.png`.
pub fn image_filename(title: &str) -> String {
    format!("{}.png", safe_filename(title))
}

/// The sentinel filename recorded when a background couldn't be generated.
pub fn placeholder_filename(id: &str) -> String {
    format!("{id}_placeholder.png")
}

/// Where a background ended up after its request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedFilename {
    /// The image was generated and written under this filename
    Saved(String),
    /// Generation failed, the sentinel filename stands in
    Placeholder(String),
}

impl ResolvedFilename {
    /// The filename, whichever way it was resolved.
    pub fn filename(&self) -> &str {
        match self {
            Self::Saved(name) | Self::Placeholder(name) => name,
        }
    }

    /// True if a real image was saved.
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Spec id to resolved filename, one entry per processed spec.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilenameMap {
    entries: BTreeMap<String, ResolvedFilename>,
}

impl FilenameMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `id`, replacing any earlier one.
    pub fn record(&mut self, id: &str, resolved: ResolvedFilename) {
        self.entries.insert(id.to_string(), resolved);
    }

    /// The outcome recorded for `id`.
    pub fn get(&self, id: &str) -> Option<&ResolvedFilename> {
        self.entries.get(id)
    }

    /// Number of specs recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many specs got a real image.
    pub fn saved_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.is_saved())
            .count()
    }

    /// How many specs fell back to a placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.len() - self.saved_count()
    }
}
