use crate::stopwords_es::SPANISH_STOP_WORDS;
use domain::{NormalizationError, NormalizedContext};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Compresses free text into space-separated Spanish stems.
///
/// Steps, in order: split on Unicode word boundaries, keep purely
/// alphabetic tokens, lowercase, drop stop words, stem, join with one space.
/// Words glued by hyphens ("auto-servicio") form one token and are dropped.
/// The output depends only on the input text.
pub struct TextNormalizer {
    stemmer: Stemmer,
    stop_words: HashSet<&'static str>,
}

impl TextNormalizer {
    pub fn spanish() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::Spanish),
            stop_words: SPANISH_STOP_WORDS.into_iter().collect(),
        }
    }

    pub fn normalize(&self, text: &str) -> Result<NormalizedContext, NormalizationError> {
        let mut stems: Vec<String> = Vec::new();
        for word in tokens(text) {
            if !word.chars().all(char::is_alphabetic) {
                continue;
            }
            let lower = word.to_lowercase();
            if self.stop_words.contains(lower.as_str()) {
                continue;
            }
            let stem = self.stemmer.stem(&lower);
            if stem.is_empty() {
                return Err(NormalizationError::EmptyStem(lower));
            }
            stems.push(stem.into_owned());
        }
        Ok(NormalizedContext::new(stems.join(" ")))
    }
}

/// Unicode words, with runs like `e-mail` kept whole.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut words = text.unicode_word_indices().peekable();
    while let Some((start, word)) = words.next() {
        let mut end = start + word.len();
        while text[end..].starts_with('-') {
            match words.peek() {
                Some(&(next, w)) if next == end + 1 => {
                    end = next + w.len();
                    words.next();
                }
                _ => break,
            }
        }
        out.push(&text[start..end]);
    }
    out
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::spanish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        TextNormalizer::spanish()
            .normalize(text)
            .unwrap()
            .as_str()
            .to_string()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
    }

    #[test]
    fn menu_line_is_stemmed() {
        assert_eq!(normalize("Hamburguesa doble"), "hamburgues dobl");
    }

    #[test]
    fn punctuation_numbers_and_stop_words_are_dropped() {
        assert_eq!(normalize("¿Tienen 2 hamburguesas?"), "hamburgues");
        assert_eq!(normalize("de la que el en y"), "");
        assert_eq!(normalize("combo123 $15.000 ..."), "");
    }

    #[test]
    fn output_is_lowercase_alphabetic_tokens() {
        let out = normalize("Las MEJORES Papas, Malteadas y Alitas del 2024!");
        assert!(!out.is_empty());
        for token in out.split(' ') {
            assert!(!token.is_empty());
            assert!(token.chars().all(|c| c.is_alphabetic() && !c.is_uppercase()));
        }
    }

    #[test]
    fn deterministic() {
        let text = "Pedidos a domicilio todos los días hasta las once";
        assert_eq!(normalize(text), normalize(text));
    }

    #[test]
    fn renormalizing_stems_is_not_always_stable() {
        // Observed Snowball behavior: the residual "es" of "hamburgues" is
        // stripped on a second pass while "dobl" is already a fixed point.
        assert_eq!(normalize("hamburgues dobl"), "hamburg dobl");
        assert_eq!(normalize("dobl"), "dobl");
    }

    #[test]
    fn stop_word_list_is_accent_sensitive() {
        assert!(SPANISH_STOP_WORDS.contains(&"más"));
        assert!(SPANISH_STOP_WORDS.contains(&"tienen"));
        assert!(!SPANISH_STOP_WORDS.contains(&"hamburguesa"));
        assert_eq!(normalize("más tienen"), "");
    }

    #[test]
    fn hyphenated_compounds_are_dropped_whole() {
        assert_eq!(normalize("auto-servicio"), "");
        assert_eq!(normalize("e-mail"), "");
        assert_eq!(normalize("Hamburguesa auto-servicio doble"), "hamburgues dobl");
    }

    #[test]
    fn detached_hyphens_do_not_join_words() {
        assert_eq!(normalize("Hamburguesa - doble"), "hamburgues dobl");
        assert_eq!(normalize("-doble-"), "dobl");
        assert_eq!(tokens("a-b-c d"), vec!["a-b-c", "d"]);
    }
}
