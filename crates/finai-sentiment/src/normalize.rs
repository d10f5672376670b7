//! Text cleaning and sentence-aware chunking for length-limited classifiers.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("valid regex"));

/// `$1.2B`, `€ 300`, `£5`: the symbol is dropped and the amount kept.
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$€£¥]\s*(\d)").expect("valid regex"));

/// A fragment of normalized text handed to a model adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// The chunk is a single sentence longer than the requested maximum.
    /// Adapters with a hard input limit may truncate it.
    pub oversized: bool,
}

/// Clean raw text for model consumption.
///
/// Strips URLs and control characters, drops currency symbols in front of
/// amounts, and collapses all whitespace runs to a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, " ");
    let without_currency = CURRENCY_RE.replace_all(&without_urls, "$1");
    let printable: String = without_currency
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences. A boundary is `.`, `!` or `?` followed by
/// whitespace; the terminator stays with its sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    let sentence = text[start..=idx].trim();
                    if !sentence.is_empty() {
                        out.push(sentence);
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Greedily pack sentences into chunks of at most `max_len` characters.
///
/// A sentence longer than `max_len` becomes its own chunk with `oversized`
/// set. Returns an empty vector only when `text` has no visible content.
#[must_use]
pub fn chunk(text: &str, max_len: usize) -> Vec<Chunk> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0_usize;

    for sentence in sentences(text) {
        let len = sentence.chars().count();

        if len > max_len {
            if !current.is_empty() {
                chunks.push(Chunk {
                    text: std::mem::take(&mut current),
                    oversized: false,
                });
                current_len = 0;
            }
            chunks.push(Chunk {
                text: sentence.to_string(),
                oversized: true,
            });
            continue;
        }

        let joined_len = if current.is_empty() {
            len
        } else {
            current_len + 1 + len
        };

        if joined_len > max_len {
            chunks.push(Chunk {
                text: std::mem::take(&mut current),
                oversized: false,
            });
            current.push_str(sentence);
            current_len = len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            current_len = joined_len;
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            text: current,
            oversized: false,
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  stocks \n\t rallied   today "), "stocks rallied today");
    }

    #[test]
    fn normalize_strips_urls() {
        assert_eq!(
            normalize("Read more at https://example.com/a?b=1 now"),
            "Read more at now"
        );
        assert_eq!(normalize("see www.example.com"), "see");
    }

    #[test]
    fn normalize_drops_currency_symbols_before_amounts() {
        assert_eq!(
            normalize("Revenue hit $1.2B, up from € 900M"),
            "Revenue hit 1.2B, up from 900M"
        );
    }

    #[test]
    fn normalize_replaces_control_characters() {
        assert_eq!(normalize("profit\u{0007}growth"), "profit growth");
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn sentences_split_on_terminator_followed_by_space() {
        assert_eq!(
            sentences("Shares rose 1.5% today. Analysts cheered! Will it last? Maybe"),
            vec![
                "Shares rose 1.5% today.",
                "Analysts cheered!",
                "Will it last?",
                "Maybe"
            ]
        );
    }

    #[test]
    fn chunk_empty_input_yields_no_chunks() {
        assert!(chunk("", 512).is_empty());
        assert!(chunk("   ", 512).is_empty());
    }

    #[test]
    fn chunk_short_text_is_single_chunk() {
        let chunks = chunk("Stocks rallied.", 512);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Stocks rallied.");
        assert!(!chunks[0].oversized);
    }

    #[test]
    fn chunk_packs_sentences_greedily() {
        // "aaaa." (5) + " bbbb." (6) = 11 fits in 12; "cccc." would make 17.
        let chunks = chunk("aaaa. bbbb. cccc.", 12);
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["aaaa. bbbb.", "cccc."]);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 12));
    }

    #[test]
    fn chunk_flags_oversized_sentence_without_truncating() {
        let long = "x".repeat(20);
        let text = format!("ok. {long}. fine.");
        let chunks = chunk(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "ok.");
        assert_eq!(chunks[1].text, format!("{long}."));
        assert!(chunks[1].oversized);
        assert_eq!(chunks[2].text, "fine.");
        assert!(!chunks[2].oversized);
    }

    #[test]
    fn chunk_counts_characters_not_bytes() {
        let text = "ééééé. ááááá.";
        let chunks = chunk(text, 13);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn chunk_is_deterministic() {
        let text = "One. Two three. Four five six. Seven.";
        assert_eq!(chunk(text, 10), chunk(text, 10));
    }
}
