//! VoiceVox export to vocabulary item mapping.
//!
//! This module turns a flat directory of synthesized clips into files named
//! after vocabulary item identifiers, the layout the trainer app loads audio
//! from.
//!
//! # Project Layout
//!
//! ```text
//! my-app/
//! ├── lessons/
//! │   ├── index.json            # {"lessons": [{"file": "lessons/l01.json"}, ...]}
//! │   └── l01.json              # [{"id": "l01_001", "jp_kana": "たべる", "jp_kanji": "食べる"}, ...]
//! └── audio/
//!     ├── l01_001.wav           # already mapped, left alone
//!     ├── raw/                  # exports that are not <id>.<ext> end up here
//!     └── audio_map_report.json # written on every run
//! ```
//!
//! # Pipeline
//!
//! 1. [`vocab`] loads items and builds the normalized [`TokenIndex`]
//! 2. [`classify`] moves every file that is not `<id>.<ext>` into `audio/raw/`
//! 3. [`pipeline`] takes the last `_` segment of each raw filename, looks it up
//!    and asks the [`MatchPolicy`](crate::MatchPolicy) for a single item
//! 4. Resolved clips are copied (never overwriting) and a [`Report`] is written
//!
//! # Match Preference
//!
//! The default [`FieldPreference`] trusts `jp_kana` over `jp_kanji`:
//!
//! | Kana candidates | Kanji candidates | Outcome |
//! |---|---|---|
//! | 1 | any | resolved by `jp_kana` |
//! | 2+ | any | ambiguous (kana ids) |
//! | 0 | 1 | resolved by `jp_kanji` |
//! | 0 | 2+ | ambiguous (all ids) |
//! | 0 | 0 | unmatched |
//!
//! # Examples
//!
//! ```rust,no_run
//! use vocab_audio_map::mapper::{AudioMapper, FieldPreference, MapperConfigBuilder};
//! use vocab_audio_map::FieldKind;
//!
//! let config = MapperConfigBuilder::default()
//!     .root("my-app")
//!     .extensions(vec!["wav".to_string()])
//!     .build()?;
//!
//! // Only ever trust the kana reading.
//! let mapper = AudioMapper::with_policy(config, FieldPreference::new(vec![FieldKind::Kana]));
//! let report = mapper.run()?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod classify;
pub mod config;
pub mod normalize;
pub mod pipeline;
pub mod policy;
pub mod report;
pub mod vocab;

pub use config::{discover_root, MapperConfig, MapperConfigBuilder, MapperConfigBuilderError};
pub use pipeline::{AudioMapper, MapperError};
pub use policy::FieldPreference;
pub use report::Report;
pub use vocab::{TokenIndex, Vocabulary, VocabularyItem};
