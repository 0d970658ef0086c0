//! # Comicgen - Procedural Comic Dialogue
//!
//! Comicgen fills the speech bubbles of template comic pages with dialogue
//! generated from each character's past lines. It provides:
//!
//! - **Dialogue generation**: per-character Markov chains over styled words
//! - **Adaptive layout**: style-aware wrapping, word splitting, centering and
//!   font-size fitting into arbitrary bubbles
//! - **Legible color**: text color chosen against the bubble background
//! - **Rendering**: TrueType/OpenType faces via ab_glyph, Spleen fallback
//!
//! ## Quick Start
//!
//! ```no_run
//! use comicgen::{
//!     comic::{Generator, Outputs},
//!     config::GeneratorConfig,
//!     font::FontLibrary,
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let config = GeneratorConfig::new("./comics");
//! let fonts = FontLibrary::discover(&config);
//! let generator = Generator::new(config, fonts)?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let comic = generator.generate(&mut rng)?;
//! print!("{}", comic.transcript());
//!
//! let outputs = Outputs {
//!     transcript: "out.txt".into(),
//!     image: "out.png".into(),
//!     manifest: None,
//!     for_web: false,
//! };
//! comic.save(&outputs, 42)?;
//!
//! # Ok::<(), comicgen::ComicError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`token`] | Styled tokens and rendering-time words |
//! | [`markup`] | `*bold*`, `/italic/`, `_underline_` parsing |
//! | [`corpus`] | Transcript loading and speaker attribution |
//! | [`markov`] | Chain model, builder and sampler |
//! | [`bubbles`] | Bubble script parsing |
//! | [`font`] | Font metrics, loading and discovery |
//! | [`layout`] | Line wrapping and font-size fitting |
//! | [`color`] | Text color selection |
//! | [`render`] | Drawing text and writing PNGs |
//! | [`comic`] | The whole pipeline |
//! | [`config`] | Run configuration |
//! | [`error`] | Error types |

pub mod bubbles;
pub mod color;
pub mod comic;
pub mod config;
pub mod corpus;
pub mod error;
pub mod font;
pub mod layout;
pub mod markov;
pub mod markup;
pub mod render;
pub mod token;

// Re-exports for convenience
pub use error::ComicError;
pub use config::GeneratorConfig;
