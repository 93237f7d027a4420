use crate::{Candidate, FieldKind, MatchPolicy, Resolution};

/// Ordered field preference.
///
/// Fields are tried in order; the first field with any candidate decides.
/// One candidate resolves, several are ambiguous and never fall through to a
/// later field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPreference {
    order: Vec<FieldKind>,
}

impl FieldPreference {
    pub fn new(order: Vec<FieldKind>) -> Self {
        Self { order }
    }
}

impl Default for FieldPreference {
    /// Kana before kanji: a reading identifies the spoken word more reliably.
    fn default() -> Self {
        Self::new(vec![FieldKind::Kana, FieldKind::Kanji])
    }
}

impl MatchPolicy for FieldPreference {
    fn resolve(&self, candidates: &[Candidate]) -> Resolution {
        if candidates.is_empty() {
            return Resolution::Unmatched;
        }

        for &kind in &self.order {
            let matches: Vec<&Candidate> = candidates.iter().filter(|c| c.field == kind).collect();
            match matches.as_slice() {
                [] => continue,
                [single] => return Resolution::Resolved((*single).clone()),
                several => {
                    return Resolution::Ambiguous(
                        several.iter().map(|c| c.item_id.clone()).collect(),
                    )
                }
            }
        }

        Resolution::Ambiguous(candidates.iter().map(|c| c.item_id.clone()).collect())
    }
}
