//! # Transcript Corpus
//!
//! Loads every transcript file under an input directory's `transcripts/`
//! folder and builds one chain model per speaking character.
//!
//! Transcript lines look like `Label: content`. Anything after the comment
//! marker is ignored; lines without a speaker are narration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{ComicError, Result};
use crate::markov::{ChainModel, ModelBuilder};

/// Strip a comment and surrounding whitespace from a raw line.
///
/// Returns `None` when nothing is left.
pub fn strip_comment<'a>(line: &'a str, comment_marker: &str) -> Option<&'a str> {
    let content = if comment_marker.is_empty() {
        line
    } else {
        line.split(comment_marker).next().unwrap_or("")
    };
    let content = content.trim();
    (!content.is_empty()).then_some(content)
}

/// Normalize a speaker label: surrounding whitespace and trailing colons go.
pub fn normalize_label(label: &str) -> &str {
    label.trim().trim_end_matches(':').trim()
}

/// Dialogue content of a `Label: content` line if it belongs to `label`.
pub fn attributed_content<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (speaker, content) = line.split_once(':')?;
    if normalize_label(speaker) == normalize_label(label) {
        Some(content.trim())
    } else {
        None
    }
}

/// Raw lines of all transcript files, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    lines: Vec<String>,
    files: Vec<PathBuf>,
}

impl Corpus {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            files: Vec::new(),
        }
    }

    /// Read every regular file in `dir`, sorted by name.
    pub fn load(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            ComicError::Input(format!("cannot read transcripts in {}: {}", dir.display(), e))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut lines = Vec::new();
        for file in &files {
            let bytes = fs::read(file)?;
            let text = String::from_utf8_lossy(&bytes);
            lines.extend(text.lines().map(str::to_string));
            debug!("read transcript {}", file.display());
        }

        info!("loaded {} transcript lines from {} files", lines.len(), files.len());
        Ok(Self { lines, files })
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Build a model for every speaker, in parallel.
    ///
    /// Fails with the first `ComicError::Corpus` encountered: a speaker in
    /// use with no dialogue makes the comic impossible.
    pub fn build_models(
        &self,
        speakers: &[String],
        comment_marker: &str,
    ) -> Result<HashMap<String, ChainModel>> {
        speakers
            .par_iter()
            .map(|speaker| {
                let model = ModelBuilder::build(self.lines(), speaker, comment_marker)?;
                Ok((speaker.clone(), model))
            })
            .collect()
    }
}
