use std::path::Path;

use unicode_normalization::UnicodeNormalization;

/// Canonicalize text so kana/kanji comparisons ignore formatting noise.
///
/// Applies NFKC (folding full-width and half-width variants), then drops all
/// whitespace, the punctuation accepted by [`is_ignored_punctuation`] and the
/// wave dashes used for long vowels in VoiceVox file names.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfkc()
        .filter(|&ch| !ch.is_whitespace() && !is_ignored_punctuation(ch))
        .collect();
    // Removing a character can leave a base letter next to a combining mark.
    stripped.nfkc().collect()
}

/// Punctuation that never carries meaning in a vocabulary token.
pub fn is_ignored_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '。' | '．'
            | '.'
            | '、'
            | ','
            | '，'
            | '\''
            | '\u{2019}'
            | '"'
            | '\u{201c}'
            | '\u{201d}'
            | '！'
            | '？'
            | '!'
            | '?'
            | '：'
            | ':'
            | ';'
            | '；'
            | '・'
            | '（'
            | '）'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '「'
            | '」'
            | '『'
            | '』'
            | '＜'
            | '＞'
            | '<'
            | '>'
            | '【'
            | '】'
            | '～'
            | '〜'
    )
}

/// Extract the spoken token from an export filename.
///
/// VoiceVox exports look like `001_ずんだもん（ノーマル）_たべる.wav`; the token is
/// the last `_` separated segment of the stem, or the whole stem when there is
/// no separator.
pub fn token_from_filename(file_name: &str) -> &str {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.rsplit('_').next().unwrap_or(stem)
}
