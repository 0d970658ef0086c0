//! # Comic Generation
//!
//! One run of the generator turns an input directory into finished pages:
//!
//! ```text
//! word-bubbles/ ──► pick script ──► roster + bubbles
//! images/<id>.png ─────────────────► page
//! transcripts/ ──► Corpus ──► ChainModel per speaker (rayon)
//!
//! for each bubble:
//!     Sampler ──► words ──► fit_to_box ──► pick_text_color ──► draw_fitted
//!
//! ──► PNG, transcript (+ JSON manifest)
//! ```
//!
//! All randomness flows from the caller's RNG, so a seeded `StdRng` gives
//! the same script choice and the same dialogue every time.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use image::RgbaImage;
use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::bubbles::{BubbleScript, Rect};
use crate::color::{PixelRegion, pick_text_color};
use crate::config::{GeneratorConfig, numbered_path};
use crate::corpus::Corpus;
use crate::error::{ComicError, Result};
use crate::font::FontLibrary;
use crate::layout::{FitOptions, fit_to_box};
use crate::markov::{ChainModel, Sampler};
use crate::markup;
use crate::render::{draw_fitted, save_png};
use crate::token::Word;

/// Generates comics from one input directory.
///
/// Each speaker's chain is built the first time a page needs it and reused
/// for every later comic of the run.
pub struct Generator {
    config: GeneratorConfig,
    corpus: Corpus,
    fonts: FontLibrary,
    sampler: Sampler,
    models: Mutex<HashMap<String, Arc<ChainModel>>>,
}

impl Generator {
    /// Load the transcripts under `config.input_dir`.
    pub fn new(config: GeneratorConfig, fonts: FontLibrary) -> Result<Self> {
        let corpus = Corpus::load(&config.transcripts_dir())?;
        Ok(Self::with_corpus(config, corpus, fonts))
    }

    pub fn with_corpus(config: GeneratorConfig, corpus: Corpus, fonts: FontLibrary) -> Self {
        let sampler = Sampler::new().randomize_capitals(config.randomize_capitals);
        Self {
            config,
            corpus,
            fonts,
            sampler,
            models: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Cached chain for `speaker`, if one has been built.
    pub fn model(&self, speaker: &str) -> Option<Arc<ChainModel>> {
        let cache = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(speaker).cloned()
    }

    /// Chains for `speakers`, building the ones not seen before.
    fn models_for(&self, speakers: &[String]) -> Result<HashMap<String, Arc<ChainModel>>> {
        let mut cache = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        let missing: Vec<String> = speakers
            .iter()
            .filter(|s| !cache.contains_key(s.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            let built = self
                .corpus
                .build_models(&missing, &self.config.comment_marker)?;
            for (speaker, model) in built {
                cache.insert(speaker, Arc::new(model));
            }
        }
        Ok(speakers
            .iter()
            .filter_map(|s| cache.get(s).map(|m| (s.clone(), Arc::clone(m))))
            .collect())
    }

    /// Pick one bubble script at random.
    pub fn choose_script<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathBuf> {
        let dir = self.config.word_bubbles_dir();
        let entries = fs::read_dir(&dir).map_err(|e| {
            ComicError::Input(format!("cannot read bubble scripts in {}: {}", dir.display(), e))
        })?;
        let mut scripts: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        scripts.sort();

        if scripts.is_empty() {
            return Err(ComicError::Input(format!(
                "no bubble scripts in {}",
                dir.display()
            )));
        }
        Ok(scripts.swap_remove(rng.random_range(0..scripts.len())))
    }

    /// Generate one comic from a randomly chosen bubble script.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Comic> {
        let script_path = self.choose_script(rng)?;
        self.generate_from(&script_path, rng)
    }

    /// Generate one comic from the given bubble script.
    pub fn generate_from<R: Rng + ?Sized>(&self, script_path: &Path, rng: &mut R) -> Result<Comic> {
        let id = comic_id(script_path)?;
        info!("using bubble script {} (comic {})", script_path.display(), id);
        let script = BubbleScript::load(script_path, &self.config.comment_marker)?;

        let image_path = self.config.image_path(&id);
        let page = image::open(&image_path).map_err(|e| {
            ComicError::Input(format!("cannot open page {}: {}", image_path.display(), e))
        })?;

        // Only speakers that actually talk on this page need a model.
        let speakers: Vec<String> = script
            .bubbles
            .iter()
            .map(|b| b.speaker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        info!("speakers: {}", speakers.join(", "));
        let models = self.models_for(&speakers)?;

        let options = FitOptions::new(
            self.config.initial_font_size(page.height()),
            self.config.min_font_size,
        )
        .center(self.config.center);

        let mut canvas = page.to_rgba8();
        let mut bubbles = Vec::with_capacity(script.bubbles.len());
        for bubble in &script.bubbles {
            let model = models.get(&bubble.speaker).ok_or_else(|| {
                ComicError::corpus(&bubble.speaker, "no model was built for this speaker")
            })?;
            let words = self.sampler.sentence(model, rng)?;

            let rect = bubble.rect;
            let fitted = fit_to_box(&words, rect.width(), rect.height(), &options, &self.fonts);
            let color = pick_text_color(&PixelRegion::from_image(&page, rect)).to_rgba8();
            draw_fitted(&mut canvas, rect, &fitted, color);

            bubbles.push(FilledBubble {
                speaker: bubble.speaker.clone(),
                rect,
                font_size: fitted.font_size,
                overflow: fitted.overflow,
                color: color.0,
                text: markup::render(&words),
                lines: fitted.lines.iter().map(|l| l.text()).collect(),
                words,
            });
        }

        Ok(Comic {
            id,
            page: canvas,
            bubbles,
        })
    }
}

/// Comic id of a bubble script: its file name without extension.
fn comic_id(script_path: &Path) -> Result<String> {
    script_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ComicError::Input(format!("{} has no usable file name", script_path.display()))
        })
}

/// A bubble after generation and layout.
#[derive(Debug, Clone, Serialize)]
pub struct FilledBubble {
    pub speaker: String,
    pub rect: Rect,
    pub font_size: u32,
    pub overflow: bool,
    /// RGBA text color.
    pub color: [u8; 4],
    /// Dialogue with markup.
    pub text: String,
    /// Wrapped lines as drawn (centering spacers become spaces).
    pub lines: Vec<String>,
    pub words: Vec<Word>,
}

/// A finished page.
#[derive(Debug, Clone)]
pub struct Comic {
    pub id: String,
    pub page: RgbaImage,
    pub bubbles: Vec<FilledBubble>,
}

impl Comic {
    /// Comic id, then one `Speaker: text` line per bubble.
    pub fn transcript(&self) -> String {
        let mut out = format!("{}\n", self.id);
        for bubble in &self.bubbles {
            out.push_str(&format!("{}: {}\n", bubble.speaker, bubble.text));
        }
        out
    }

    /// Write the transcript, falling back to stdout if the file can't be
    /// created.
    pub fn write_transcript(&self, path: &Path) -> Result<()> {
        let transcript = self.transcript();
        match File::create(path) {
            Ok(mut file) => {
                file.write_all(transcript.as_bytes())?;
                info!("wrote transcript {}", path.display());
            }
            Err(e) => {
                warn!("{}: {}; using standard output instead", path.display(), e);
                print!("{}", transcript);
            }
        }
        Ok(())
    }

    /// Write the JSON manifest.
    pub fn write_manifest(&self, path: &Path, image: &Path, seed: u64) -> Result<()> {
        let manifest = Manifest {
            comic_id: &self.id,
            seed,
            generated_at: chrono::Local::now().to_rfc3339(),
            image: image.display().to_string(),
            bubbles: &self.bubbles,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &manifest).map_err(std::io::Error::from)?;
        info!("wrote manifest {}", path.display());
        Ok(())
    }

    /// Write every output of this comic.
    pub fn save(&self, outputs: &Outputs, seed: u64) -> Result<()> {
        self.write_transcript(&outputs.transcript)?;
        save_png(&self.page, &outputs.image, outputs.for_web)?;
        info!("wrote image {}", outputs.image.display());
        if let Some(manifest) = &outputs.manifest {
            self.write_manifest(manifest, &outputs.image, seed)?;
        }
        Ok(())
    }

    pub fn overflowed(&self) -> usize {
        self.bubbles.iter().filter(|b| b.overflow).count()
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    comic_id: &'a str,
    seed: u64,
    generated_at: String,
    image: String,
    bubbles: &'a [FilledBubble],
}

/// Where a run writes its results.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub transcript: PathBuf,
    pub image: PathBuf,
    pub manifest: Option<PathBuf>,
    /// Quantize to the web palette and compress hardest.
    pub for_web: bool,
}

impl Outputs {
    /// Fail if any output path exists but isn't a regular file.
    pub fn check_writable(&self) -> Result<()> {
        let paths = [Some(&self.transcript), Some(&self.image), self.manifest.as_ref()];
        for path in paths.into_iter().flatten() {
            if path.exists() && !path.is_file() {
                return Err(ComicError::Output(format!(
                    "{} exists and is not a regular file",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Paths for comic `index` (0-based) of `total`; unchanged when only
    /// one comic is made.
    pub fn numbered(&self, index: usize, total: usize) -> Self {
        Self {
            transcript: numbered_path(&self.transcript, index, total),
            image: numbered_path(&self.image, index, total),
            manifest: self
                .manifest
                .as_ref()
                .map(|p| numbered_path(p, index, total)),
            for_web: self.for_web,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(script: &str, transcript: &str) -> (tempfile::TempDir, Generator) {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["images", "transcripts", "word-bubbles"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("word-bubbles/page.tsv"), script).unwrap();
        fs::write(dir.path().join("transcripts/t.txt"), transcript).unwrap();
        RgbaImage::from_pixel(120, 60, Rgba([255, 255, 255, 255]))
            .save(dir.path().join("images/page.png"))
            .unwrap();

        let config = GeneratorConfig::new(dir.path());
        let generator = Generator::new(config, FontLibrary::builtin()).unwrap();
        (dir, generator)
    }

    #[test]
    fn test_comic_id() {
        assert_eq!(comic_id(Path::new("word-bubbles/1234.tsv")).unwrap(), "1234");
        assert_eq!(comic_id(Path::new("plain")).unwrap(), "plain");
    }

    #[test]
    fn test_generate_fills_every_bubble() {
        let (_dir, generator) = setup(
            "A\tB\nA\t0\t0\t60\t30\nB:\t60\t0\t120\t30\n",
            "A: hello there\nB: *well* hi\n",
        );
        let mut rng = StdRng::seed_from_u64(5);
        let comic = generator.generate(&mut rng).unwrap();

        assert_eq!(comic.id, "page");
        assert_eq!(comic.bubbles.len(), 2);
        assert_eq!(comic.bubbles[0].text, "hello there");
        assert_eq!(comic.bubbles[1].text, "*well* hi");
        // Black text on a white page.
        assert_eq!(comic.bubbles[0].color, [0, 0, 0, 255]);
        assert_eq!(comic.transcript(), "page\nA: hello there\nB: *well* hi\n");
    }

    #[test]
    fn test_page_outside_bubbles_untouched() {
        let (_dir, generator) = setup("A\nA\t0\t0\t60\t30\n", "A: hello\n");
        let comic = generator.generate(&mut StdRng::seed_from_u64(1)).unwrap();
        for (x, y, p) in comic.page.enumerate_pixels() {
            if x >= 60 || y >= 30 {
                assert_eq!(p, &Rgba([255, 255, 255, 255]), "pixel {},{}", x, y);
            }
        }
    }

    #[test]
    fn test_silent_speaker_is_corpus_error() {
        let (_dir, generator) = setup("A\tB\nB\t0\t0\t60\t30\n", "A: only A talks\n");
        let err = generator.generate(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, ComicError::Corpus { .. }));
    }

    #[test]
    fn test_missing_page_is_input_error() {
        let (dir, generator) = setup("A\nA\t0\t0\t60\t30\n", "A: hi\n");
        fs::remove_file(dir.path().join("images/page.png")).unwrap();
        let err = generator.generate(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, ComicError::Input(_)));
    }

    #[test]
    fn test_no_scripts_is_input_error() {
        let (dir, generator) = setup("A\n", "A: hi\n");
        fs::remove_file(dir.path().join("word-bubbles/page.tsv")).unwrap();
        let err = generator.choose_script(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, ComicError::Input(_)));
    }

    #[test]
    fn test_numbered_outputs() {
        let outputs = Outputs {
            transcript: PathBuf::from("out.txt"),
            image: PathBuf::from("out.png"),
            manifest: Some(PathBuf::from("out.json")),
            for_web: false,
        };
        let first = outputs.numbered(0, 3);
        assert_eq!(first.transcript, PathBuf::from("out0.txt"));
        assert_eq!(first.image, PathBuf::from("out0.png"));
        assert_eq!(first.manifest, Some(PathBuf::from("out0.json")));
        assert_eq!(outputs.numbered(2, 3).image, PathBuf::from("out2.png"));
        assert_eq!(outputs.numbered(0, 1).image, PathBuf::from("out.png"));
    }

    #[test]
    fn test_directory_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = Outputs {
            transcript: dir.path().to_path_buf(),
            image: dir.path().join("out.png"),
            manifest: None,
            for_web: false,
        };
        let err = outputs.check_writable().unwrap_err();
        assert!(matches!(err, ComicError::Output(_)));
        assert_eq!(err.exit_code(), 73);

        let fine = Outputs {
            transcript: dir.path().join("out.txt"),
            ..outputs
        };
        assert!(fine.check_writable().is_ok());
    }

    #[test]
    fn test_models_built_once_per_run() {
        let (_dir, generator) = setup(
            "A\tB\nA\t0\t0\t60\t30\n",
            "A: hello there\nB: hi\n",
        );
        assert!(generator.model("A").is_none());
        let mut rng = StdRng::seed_from_u64(5);
        generator.generate(&mut rng).unwrap();
        let first = generator.model("A").unwrap();
        generator.generate(&mut rng).unwrap();
        let second = generator.model("A").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // B has no bubble on the page, so no chain is built for it.
        assert!(generator.model("B").is_none());
    }

    #[test]
    fn test_save_writes_all_outputs() {
        let (dir, generator) = setup("A\nA\t0\t0\t60\t30\n", "A: hi there\n");
        let comic = generator.generate(&mut StdRng::seed_from_u64(3)).unwrap();
        let outputs = Outputs {
            transcript: dir.path().join("out.txt"),
            image: dir.path().join("out.png"),
            manifest: Some(dir.path().join("out.json")),
            for_web: true,
        };
        comic.save(&outputs, 3).unwrap();

        assert_eq!(
            fs::read_to_string(&outputs.transcript).unwrap(),
            "page\nA: hi there\n"
        );
        assert_eq!(image::open(&outputs.image).unwrap().width(), 120);
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["comic_id"], "page");
        assert_eq!(manifest["seed"], 3);
        assert_eq!(manifest["bubbles"][0]["speaker"], "A");
        assert_eq!(manifest["bubbles"][0]["rect"]["right"], 60);
    }
}
