//! Utilities for turning documents into the token sequences that get diffed

use crate::diff::DiffOptions;
use logging_timer::time;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use unicode_segmentation::UnicodeSegmentation;

/// The unit a document is split into before diffing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
    /// One token per line, without the line terminator
    #[default]
    Line,
    /// One token per word, as defined by the unicode word boundary rules
    ///
    /// Runs of whitespace between words are dropped.
    Word,
    /// One token per extended grapheme cluster
    Grapheme,
}

/// The configuration options for tokenizing documents and comparing tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct TokenProcessor {
    /// How to split documents into tokens
    pub granularity: Granularity,

    /// Whether leading and trailing whitespace should be ignored when comparing tokens.
    ///
    /// The rendered diff still shows the tokens as they appear in the documents.
    pub strip_whitespace: bool,

    /// Whether tokens that only differ in case should be considered equal
    pub ignore_case: bool,
}

impl TokenProcessor {
    /// Split `text` into tokens according to the configured granularity.
    #[time("info", "input_processing::{}")]
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self.granularity {
            Granularity::Line => text.lines().collect(),
            Granularity::Word => text
                .split_word_bounds()
                .filter(|token| !token.trim().is_empty())
                .collect(),
            Granularity::Grapheme => text.graphemes(true).collect(),
        }
    }

    /// Build the diff options matching this configuration.
    ///
    /// Whitespace stripping is applied as a value transform and case folding as a custom
    /// equality, so a case-insensitive diff caches its comparisons unless `cache_equals` says
    /// otherwise.
    pub fn diff_options<'a>(&self, cache_equals: Option<bool>) -> DiffOptions<'a, &'a str> {
        let mut options = DiffOptions::new();
        if self.strip_whitespace {
            options = options.process_value(|token: &&'a str| token.trim());
        }
        if self.ignore_case {
            options = options.equals(|a: &&'a str, b: &&'a str| eq_ignore_case(a, b));
        }
        if let Some(cache) = cache_equals {
            options = options.cache_equals(cache);
        }
        options
    }

    /// Whether two tokens are equal under this configuration.
    pub fn same_token(&self, a: &str, b: &str) -> bool {
        let (a, b) = if self.strip_whitespace {
            (a.trim(), b.trim())
        } else {
            (a, b)
        };
        if self.ignore_case {
            eq_ignore_case(a, b)
        } else {
            a == b
        }
    }
}

/// Compare two strings after unicode lowercasing.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
