//! # Character Chain Models
//!
//! Per-character first-order Markov chains over styled tokens.
//!
//! ## Pipeline
//!
//! ```text
//! transcript lines ──► ModelBuilder ──► ChainModel ──► Sampler ──► Vec<Word>
//!   "A: HELLO WORLD"      (parse,         (arena +       (weighted
//!   "A: HELLO THERE"       weigh)          weighted       walk)
//!                                          edges)
//! ```
//!
//! For the two lines above the model is:
//!
//! ```text
//!   START ──2──► HELLO ──1──► WORLD (end)
//!                      └─1──► THERE (end)
//! ```
//!
//! A model is immutable once built and shares freely across threads.

mod builder;
mod model;
mod sampler;

pub use builder::ModelBuilder;
pub use model::{ChainModel, WeightedSet};
pub use sampler::Sampler;
