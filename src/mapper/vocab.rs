use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::config::MapperConfig;
use super::normalize::normalize;
use super::pipeline::MapperError;
use crate::{Candidate, FieldKind};

/// Top-level `lessons/index.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonIndex {
    #[serde(default)]
    pub lessons: Vec<LessonRef>,
}

/// One lesson entry of the index.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonRef {
    /// Lesson file path, relative to the project root.
    pub file: PathBuf,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A vocabulary entry as stored in a lesson file.
///
/// Only the fields used for audio mapping are read; anything else in the
/// record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VocabularyItem {
    #[serde(default)]
    pub id: Option<String>,
    /// Overrides `id` as the audio filename stem when set.
    #[serde(default, alias = "audioId")]
    pub audio_id: Option<String>,
    #[serde(default)]
    pub jp_kana: Option<String>,
    #[serde(default)]
    pub jp_kanji: Option<String>,
}

impl VocabularyItem {
    /// Identifier used as the destination audio filename stem.
    pub fn identifier(&self) -> Option<&str> {
        non_empty(self.audio_id.as_deref()).or_else(|| non_empty(self.id.as_deref()))
    }

    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Kana => self.jp_kana.as_deref(),
            FieldKind::Kanji => self.jp_kanji.as_deref(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lookup from normalized token to the items carrying it.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    entries: HashMap<String, Vec<Candidate>>,
}

impl TokenIndex {
    /// Register the normalized kana and kanji of every item under their own keys.
    ///
    /// Empty fields are skipped. Candidate order follows item order, kana first.
    pub fn build(items: &[VocabularyItem]) -> Self {
        let mut entries: HashMap<String, Vec<Candidate>> = HashMap::new();
        for item in items {
            let Some(id) = item.identifier() else {
                continue;
            };
            for kind in [FieldKind::Kana, FieldKind::Kanji] {
                let key = normalize(item.field(kind).unwrap_or_default());
                if key.is_empty() {
                    continue;
                }
                entries
                    .entry(key)
                    .or_default()
                    .push(Candidate::new(id, kind));
            }
        }
        Self { entries }
    }

    /// Candidates for an already normalized token.
    pub fn lookup(&self, normalized: &str) -> &[Candidate] {
        self.entries
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct normalized keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the matcher needs from the lesson data.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    items: Vec<VocabularyItem>,
    identifiers: BTreeSet<String>,
    index: TokenIndex,
}

impl Vocabulary {
    /// Load the lesson index and every lesson it lists.
    ///
    /// A missing index is fatal. Lesson files that cannot be read are skipped
    /// with a warning.
    pub fn load(config: &MapperConfig) -> Result<Self, MapperError> {
        let index_path = config.lessons_index_path();
        let index = load_lesson_index(&index_path)?;
        let vocab = Self::from_items(load_items(config.root(), &index));
        log::info!(
            "Loaded {} vocabulary items from {} lessons",
            vocab.items().len(),
            index.lessons.len()
        );
        Ok(vocab)
    }

    pub fn from_items(items: Vec<VocabularyItem>) -> Self {
        let mut identifiers = BTreeSet::new();
        for item in &items {
            match item.identifier() {
                Some(id) => {
                    if !identifiers.insert(id.to_string()) {
                        log::warn!("Duplicate item identifier {id:?}");
                    }
                }
                None => log::warn!("Skipping vocabulary item without an id: {item:?}"),
            }
        }
        let index = TokenIndex::build(&items);
        if index.is_empty() {
            log::warn!("No item has a jp_kana or jp_kanji value, nothing can be matched");
        } else {
            log::debug!("Token index holds {} keys", index.len());
        }
        Self {
            items,
            identifiers,
            index,
        }
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    /// Known identifiers in sorted order.
    pub fn identifiers(&self) -> &BTreeSet<String> {
        &self.identifiers
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }
}

/// Read `lessons/index.json`.
pub fn load_lesson_index(path: &Path) -> Result<LessonIndex, MapperError> {
    if !path.is_file() {
        return Err(MapperError::IndexNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        MapperError::Config(format!("Failed to parse {}: {e}", path.display()))
    })
}

/// Read every lesson listed in `index`, concatenating their items in order.
pub fn load_items(root: &Path, index: &LessonIndex) -> Vec<VocabularyItem> {
    let mut items = Vec::new();
    for lesson in &index.lessons {
        let path = root.join(&lesson.file);
        match load_lesson(&path) {
            Ok(lesson_items) => {
                log::debug!(
                    "Lesson {} ({}): {} items",
                    lesson.code.as_deref().unwrap_or("-"),
                    path.display(),
                    lesson_items.len()
                );
                items.extend(lesson_items);
            }
            Err(e) => log::warn!("Skipping lesson {}: {e}", path.display()),
        }
    }
    items
}

fn load_lesson(path: &Path) -> Result<Vec<VocabularyItem>, MapperError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, kana: &str, kanji: &str) -> VocabularyItem {
        VocabularyItem {
            id: Some(id.to_string()),
            jp_kana: Some(kana.to_string()),
            jp_kanji: Some(kanji.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn every_non_empty_field_is_indexed() {
        let items = vec![
            item("a1", "あ", "亜"),
            item("t1", "たべる", "食べる"),
            item("k1", "", "漢字"),
        ];
        let index = TokenIndex::build(&items);

        for it in &items {
            for kind in [FieldKind::Kana, FieldKind::Kanji] {
                let key = normalize(it.field(kind).unwrap_or_default());
                if key.is_empty() {
                    continue;
                }
                assert!(
                    index
                        .lookup(&key)
                        .iter()
                        .any(|c| Some(c.item_id.as_str()) == it.identifier() && c.field == kind),
                    "{key:?} should map to {:?}",
                    it.identifier()
                );
            }
        }
        assert!(index.lookup("").is_empty());
        assert!(!index.is_empty());
        assert!(TokenIndex::build(&[item("e1", "", "")]).is_empty());
    }

    #[test]
    fn keeps_shared_keys_in_item_order() {
        let index = TokenIndex::build(&[item("s1", "す", "酢"), item("s2", "す", "巣")]);
        assert_eq!(
            index.lookup("す"),
            &[
                Candidate::new("s1", FieldKind::Kana),
                Candidate::new("s2", FieldKind::Kana),
            ]
        );
    }

    #[test]
    fn registers_normalized_keys() {
        let index = TokenIndex::build(&[item("c1", "ｺｰﾋｰ", "珈琲。")]);
        assert_eq!(index.lookup("コーヒー").len(), 1);
        assert_eq!(index.lookup("珈琲")[0].field, FieldKind::Kanji);
    }

    #[test]
    fn audio_id_overrides_id() {
        let parsed: VocabularyItem =
            serde_json::from_str(r#"{"id":"x1","audioId":"x1_alt","jp_kana":"え","en":"picture"}"#)
                .unwrap();
        assert_eq!(parsed.identifier(), Some("x1_alt"));

        let plain = item("x2", "え", "");
        assert_eq!(plain.identifier(), Some("x2"));
    }

    #[test]
    fn items_without_id_are_not_indexed() {
        let nameless = VocabularyItem {
            jp_kana: Some("な".to_string()),
            ..Default::default()
        };
        let vocab = Vocabulary::from_items(vec![nameless, item("n1", "に", "")]);
        assert!(vocab.index().lookup("な").is_empty());
        assert_eq!(vocab.items().len(), 2);
        assert_eq!(vocab.identifiers().len(), 1);
        assert!(vocab.contains("n1"));
    }

    #[test]
    fn missing_index_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_lesson_index(&dir.path().join("lessons/index.json")).unwrap_err();
        assert!(matches!(err, MapperError::IndexNotFound(_)));
    }

    #[test]
    fn skips_unreadable_lessons() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("l1.json"),
            r#"[{"id":"a1","jp_kana":"あ","jp_kanji":"亜"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let index: LessonIndex = serde_json::from_str(
            r#"{"lessons":[{"file":"l1.json"},{"file":"missing.json"},{"file":"broken.json"}]}"#,
        )
        .unwrap();

        let items = load_items(dir.path(), &index);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier(), Some("a1"));
    }
}
