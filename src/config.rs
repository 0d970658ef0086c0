//! # Generator Configuration
//!
//! Everything a comic generation run needs that isn't an input file.
//!
//! ## Input Directory Layout
//!
//! ```text
//! <indir>/
//! ├── images/          page templates, <comic id>.png
//! ├── transcripts/     "Label: dialogue" text files
//! ├── word-bubbles/    bubble scripts, <comic id>.tsv (any extension)
//! └── fonts/           optional font files, tried in name order
//! ```
//!
//! ## Usage
//!
//! ```
//! use comicgen::config::GeneratorConfig;
//!
//! let config = GeneratorConfig::new("./comics");
//! assert_eq!(config.comment_marker, "//");
//! assert!(config.word_bubbles_dir().ends_with("word-bubbles"));
//! ```

use std::path::{Path, PathBuf};

/// Font families tried, in order, before settling for any system font.
pub const PREFERRED_FAMILIES: &[&str] = &[
    "Nina",
    "Humor Sans",
    "Tomson Talks",
    "Comic Sans MS",
    "Ubuntu Titling",
];

/// # Generator Configuration
///
/// ## Text Fitting
///
/// - **initial_size_divisor**: the first font size tried is
///   `page_height / initial_size_divisor`, i.e. one line filling half the page
/// - **min_font_size**: the fit solver stops shrinking here and accepts an
///   overflowing layout
///
/// ## Generation
///
/// - **randomize_capitals**: flip first-letter case of generated words
/// - **center**: center each wrapped line inside its bubble
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Root input directory
    pub input_dir: PathBuf,

    /// Everything from this marker to end of line is ignored in transcripts
    /// and bubble scripts
    pub comment_marker: String,

    /// Smallest font size (pixels) the fit solver will try
    pub min_font_size: u32,

    /// Page height divisor giving the starting font size
    pub initial_size_divisor: u32,

    /// Flip first-letter case of generated words at random
    pub randomize_capitals: bool,

    /// Center wrapped lines horizontally
    pub center: bool,

    /// Font file given explicitly on the command line
    pub font: Option<PathBuf>,

    /// Bold font file given explicitly on the command line
    pub bold_font: Option<PathBuf>,
}

impl GeneratorConfig {
    pub const DEFAULT_COMMENT_MARKER: &'static str = "//";
    pub const DEFAULT_MIN_FONT_SIZE: u32 = 1;
    pub const DEFAULT_INITIAL_SIZE_DIVISOR: u32 = 2;

    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            comment_marker: Self::DEFAULT_COMMENT_MARKER.to_string(),
            min_font_size: Self::DEFAULT_MIN_FONT_SIZE,
            initial_size_divisor: Self::DEFAULT_INITIAL_SIZE_DIVISOR,
            randomize_capitals: false,
            center: true,
            font: None,
            bold_font: None,
        }
    }

    #[inline]
    pub fn images_dir(&self) -> PathBuf {
        self.input_dir.join("images")
    }

    #[inline]
    pub fn transcripts_dir(&self) -> PathBuf {
        self.input_dir.join("transcripts")
    }

    #[inline]
    pub fn word_bubbles_dir(&self) -> PathBuf {
        self.input_dir.join("word-bubbles")
    }

    #[inline]
    pub fn fonts_dir(&self) -> PathBuf {
        self.input_dir.join("fonts")
    }

    /// Page template for a comic id.
    pub fn image_path(&self, comic_id: &str) -> PathBuf {
        self.images_dir().join(format!("{}.png", comic_id))
    }

    /// First font size to try for a page of the given height.
    pub fn initial_font_size(&self, page_height: u32) -> u32 {
        (page_height / self.initial_size_divisor.max(1)).max(self.min_font_size)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(Path::new("./"))
    }
}

/// Insert `index` before the extension when more than one comic is made:
/// `out.png` → `out3.png`.
pub fn numbered_path(path: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}{}", stem, index),
    };
    path.with_file_name(name)
}
