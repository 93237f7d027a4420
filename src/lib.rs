//! # vocab-audio-map
//!
//! A Rust library for reconciling speech-synthesis audio exports against a
//! vocabulary dataset.
//!
//! ## Features
//!
//! - **Lesson loading**: Reads `lessons/index.json` and every lesson it references
//! - **Token matching**: Matches the spoken token in a VoiceVox-style filename
//!   (`001_speaker_たべる.wav`) to an item's kana or kanji field
//! - **Pluggable tie-break**: Candidate resolution goes through a [`MatchPolicy`]
//! - **Non-destructive**: Resolved files are copied to `<id>.<ext>`, existing
//!   destinations are never overwritten
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! vocab-audio-map = "2026.10"
//! ```
//!
//! ```ignore
//! use vocab_audio_map::mapper::{AudioMapper, MapperConfigBuilder};
//!
//! let config = MapperConfigBuilder::default().root("my-app").build()?;
//! let report = AudioMapper::new(config).run()?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod mapper;

use serde::{Deserialize, Serialize};

/// Which text field of a vocabulary item produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Phonetic form (`jp_kana`)
    #[serde(rename = "jp_kana")]
    Kana,
    /// Written form (`jp_kanji`)
    #[serde(rename = "jp_kanji")]
    Kanji,
}

impl FieldKind {
    /// Field name as it appears in lesson files and in the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Kana => "jp_kana",
            FieldKind::Kanji => "jp_kanji",
        }
    }
}

/// An item identifier registered under a normalized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Audio identifier of the vocabulary item
    pub item_id: String,
    /// Field whose normalized value equals the token
    pub field: FieldKind,
}

impl Candidate {
    pub fn new(item_id: impl Into<String>, field: FieldKind) -> Self {
        Self {
            item_id: item_id.into(),
            field,
        }
    }
}

/// Outcome of applying a [`MatchPolicy`] to the candidates for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No item carries the token.
    Unmatched,
    /// Exactly one item was chosen.
    Resolved(Candidate),
    /// Several items remain after the policy ran; holds their identifiers.
    Ambiguous(Vec<String>),
}

/// Common interface for candidate tie-break rules.
///
/// The matching loop hands every policy the full candidate list for a token,
/// in index order, and records whatever [`Resolution`] comes back.
pub trait MatchPolicy {
    /// Pick at most one candidate.
    fn resolve(&self, candidates: &[Candidate]) -> Resolution;
}

impl<P: MatchPolicy + ?Sized> MatchPolicy for &P {
    fn resolve(&self, candidates: &[Candidate]) -> Resolution {
        (**self).resolve(candidates)
    }
}
