//! Font file discovery.
//!
//! Search order for the regular face:
//!
//! 1. the `--font` path
//! 2. files in `<indir>/fonts/`, by name
//! 3. preferred comic families in the system font directories
//! 4. any system font
//!
//! If nothing parses, every load falls back to the Spleen bitmap face.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use log::{debug, info, warn};

use super::{BitmapFace, Face, FontLoader, FontStyle, OutlineFace};
use crate::config::{GeneratorConfig, PREFERRED_FAMILIES};
use crate::error::{ComicError, Result};

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// A parsed font file.
#[derive(Debug, Clone)]
pub struct FontSource {
    pub path: PathBuf,
    pub font: FontArc,
}

impl FontSource {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            ComicError::FontUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            ComicError::FontUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            font,
        })
    }
}

/// The fonts available to a run. Implements [`FontLoader`].
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    pub regular: Option<FontSource>,
    pub bold: Option<FontSource>,
}

impl FontLibrary {
    /// Library with no font files; every load fails over to Spleen.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Find regular and bold faces for a run.
    pub fn discover(config: &GeneratorConfig) -> Self {
        let mut candidates = Vec::new();
        if let Some(font) = &config.font {
            candidates.push(font.clone());
        }
        candidates.extend(font_files_in(&config.fonts_dir(), false));
        let regular = first_loadable(&candidates).or_else(|| {
            let system = system_font_files();
            let preferred: Vec<PathBuf> = PREFERRED_FAMILIES
                .iter()
                .flat_map(|family| {
                    let family = squash(family);
                    system
                        .iter()
                        .filter(move |p| file_key(p).contains(&family))
                        .cloned()
                })
                .collect();
            first_loadable(&preferred).or_else(|| first_loadable(&system))
        });

        let bold = match (&config.bold_font, &regular) {
            (Some(path), _) => FontSource::open(path)
                .map_err(|e| warn!("{}; bold will be synthesized", e))
                .ok(),
            (None, Some(regular)) => bold_sibling(&regular.path),
            (None, None) => None,
        };

        match &regular {
            Some(source) => info!("using font {}", source.path.display()),
            None => warn!("no usable font file found, using the built-in bitmap font"),
        }
        if let Some(source) = &bold {
            info!("using bold font {}", source.path.display());
        }

        Self { regular, bold }
    }
}

impl FontLoader for FontLibrary {
    type Face = Face;

    fn load(&self, style: FontStyle, size: u32) -> Result<Face> {
        if size == 0 {
            return Err(ComicError::FontUnavailable("font size 0".into()));
        }
        let regular = self
            .regular
            .as_ref()
            .ok_or_else(|| ComicError::FontUnavailable("no font file loaded".into()))?;

        let face = match (style, &self.bold) {
            (FontStyle::Regular, _) => OutlineFace::new(regular.font.clone(), size, false),
            (FontStyle::Bold, Some(bold)) => OutlineFace::new(bold.font.clone(), size, false),
            (FontStyle::Bold, None) => OutlineFace::new(regular.font.clone(), size, true),
        };
        Ok(Face::Outline(face))
    }

    fn fallback(&self, style: FontStyle, size: u32) -> Face {
        Face::Bitmap(BitmapFace::for_size(size, style == FontStyle::Bold))
    }
}

fn first_loadable(paths: &[PathBuf]) -> Option<FontSource> {
    paths.iter().find_map(|path| match FontSource::open(path) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!("{} could not be loaded as a font: {}", path.display(), e);
            None
        }
    })
}

/// Font files directly in (or, when `recursive`, below) `dir`, sorted.
fn font_files_in(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    for path in entries.filter_map(|e| e.ok().map(|e| e.path())) {
        if path.is_dir() {
            if recursive {
                found.extend(font_files_in(&path, true));
            }
        } else if is_font_file(&path) {
            found.push(path);
        }
    }
    found.sort();
    found
}

fn system_font_files() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect();
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }
    let files: Vec<PathBuf> = dirs.iter().flat_map(|d| font_files_in(d, true)).collect();
    debug!("found {} system font files", files.len());
    files
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lowercase with separators removed: "Humor-Sans_Bold" → "humorsansbold".
fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn file_key(path: &Path) -> String {
    path.file_stem()
        .map(|s| squash(&s.to_string_lossy()))
        .unwrap_or_default()
}

/// `Foo.ttf` → `Foo-Bold.ttf`, `FooBold.otf`, `Foo-Regular` → `Foo-Bold`.
fn bold_sibling(regular: &Path) -> Option<FontSource> {
    let key = file_key(regular);
    let base = key.strip_suffix("regular").unwrap_or(&key);
    let wanted = format!("{}bold", base);
    let dir = regular.parent()?;
    font_files_in(dir, false)
        .into_iter()
        .filter(|p| p != regular && file_key(p) == wanted)
        .find_map(|p| FontSource::open(&p).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::TextMetrics;

    #[test]
    fn test_squash() {
        assert_eq!(squash("Humor Sans"), "humorsans");
        assert_eq!(squash("Comic_Sans-MS"), "comicsansms");
    }

    #[test]
    fn test_font_files_in_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.TTF"), b"x").unwrap();
        fs::write(dir.path().join("a.otf"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let files = font_files_in(dir.path(), false);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.otf", "b.TTF"]);
    }

    #[test]
    fn test_garbage_font_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        assert!(matches!(
            FontSource::open(&path),
            Err(ComicError::FontUnavailable(_))
        ));
    }

    #[test]
    fn test_builtin_library_falls_back() {
        let library = FontLibrary::builtin();
        assert!(library.load(FontStyle::Regular, 20).is_err());
        let face = library.fallback(FontStyle::Bold, 24);
        assert!(face.is_fallback());
        assert_eq!(face.line_height(), 24);
    }
}
