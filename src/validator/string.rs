//! String validator (spec §4.C.3).
//!
//! Two length-counting modes share one computed-length contract:
//! `CodeUnits` counts UTF-16 code units (`BoundedLength` in the spec
//! vocabulary); `Graphemes` counts extended grapheme clusters
//! (`BoundedComposedLength`), so that precomposed and decomposed forms of
//! the same visible character count the same.

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{ErrorKind, ValidationError, ValidatorTag};
use crate::value::value_kind;
use crate::value::ValueKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    CodeUnits,
    Graphemes,
}

fn computed_length(mode: LengthMode, s: &str) -> usize {
    match mode {
        LengthMode::CodeUnits => s.encode_utf16().count(),
        LengthMode::Graphemes => s.graphemes(true).count(),
    }
}

/// Wraps a [`Regex`] so [`StringValidator`] can derive `PartialEq`: two
/// patterns are equal iff their source strings are equal.
#[derive(Debug, Clone)]
pub struct PatternConstraint(pub Regex);

impl PartialEq for PatternConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstringKind {
    Prefix,
    Suffix,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstringConstraint {
    pub kind: SubstringKind,
    pub text: String,
    pub case_sensitive: bool,
}

impl SubstringConstraint {
    fn matches(&self, s: &str) -> bool {
        let (s, needle) = if self.case_sensitive {
            (s.to_string(), self.text.clone())
        } else {
            (s.to_lowercase(), self.text.to_lowercase())
        };
        match self.kind {
            SubstringKind::Prefix => s.starts_with(&needle),
            SubstringKind::Suffix => s.ends_with(&needle),
            SubstringKind::Contains => s.contains(&needle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringValidator {
    pub length_mode: LengthMode,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<PatternConstraint>,
    pub substring: Option<SubstringConstraint>,
    /// Wildcard pattern where `?` matches exactly one grapheme and `*`
    /// matches zero or more, greedily with backtracking.
    pub wildcard: Option<String>,
    pub allowed_chars: Option<BTreeSet<char>>,
}

impl StringValidator {
    pub fn new() -> Self {
        Self {
            length_mode: LengthMode::CodeUnits,
            min_length: None,
            max_length: None,
            pattern: None,
            substring: None,
            wildcard: None,
            allowed_chars: None,
        }
    }

    pub fn composed_length(mut self) -> Self {
        self.length_mode = LengthMode::Graphemes;
        self
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(regex: &str) -> Result<Regex, regex::Error> {
        Regex::new(regex)
    }

    pub fn with_pattern(mut self, regex: Regex) -> Self {
        self.pattern = Some(PatternConstraint(regex));
        self
    }

    pub fn with_substring(mut self, constraint: SubstringConstraint) -> Self {
        self.substring = Some(constraint);
        self
    }

    pub fn with_wildcard(mut self, pattern: impl Into<String>) -> Self {
        self.wildcard = Some(pattern.into());
        self
    }

    pub fn with_allowed_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.allowed_chars = Some(chars.into_iter().collect());
        self
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let kind = value_kind(value);
        if kind != ValueKind::String {
            return Err(ValidationError::new(
                ErrorKind::IncorrectType,
                ValidatorTag::String,
                format!("expected string, got {}", kind.type_name()),
            )
            .with_value(value.clone()));
        }
        let s = value.as_str().expect("String ValueKind implies as_str");

        let len = computed_length(self.length_mode, s);
        if let Some(min) = self.min_length {
            if len < min {
                return Err(ValidationError::new(
                    ErrorKind::LengthLessThanMin,
                    ValidatorTag::String,
                    format!("length {} is less than minimum {}", len, min),
                )
                .with_value(value.clone()));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(ValidationError::new(
                    ErrorKind::LengthGreaterThanMax,
                    ValidatorTag::String,
                    format!("length {} is greater than maximum {}", len, max),
                )
                .with_value(value.clone()));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.0.is_match(s) {
                return Err(ValidationError::new(
                    ErrorKind::FormatMismatch,
                    ValidatorTag::String,
                    format!("does not match pattern /{}/", pattern.0.as_str()),
                )
                .with_value(value.clone()));
            }
        }

        if let Some(substring) = &self.substring {
            if !substring.matches(s) {
                return Err(ValidationError::new(
                    ErrorKind::FormatMismatch,
                    ValidatorTag::String,
                    format!("does not satisfy {:?} constraint {:?}", substring.kind, substring.text),
                )
                .with_value(value.clone()));
            }
        }

        if let Some(wildcard) = &self.wildcard {
            if !wildcard_match(wildcard, s) {
                return Err(ValidationError::new(
                    ErrorKind::FormatMismatch,
                    ValidatorTag::String,
                    format!("does not match wildcard pattern {:?}", wildcard),
                )
                .with_value(value.clone()));
            }
        }

        if let Some(allowed) = &self.allowed_chars {
            if let Some(bad) = s.chars().find(|c| !allowed.contains(c)) {
                return Err(ValidationError::new(
                    ErrorKind::FormatMismatch,
                    ValidatorTag::String,
                    format!("character {:?} is not in the allowed character set", bad),
                )
                .with_value(value.clone()));
            }
        }

        Ok(())
    }
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy backtracking wildcard match over grapheme clusters: `?` matches
/// exactly one grapheme, `*` matches zero or more.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern_graphemes: Vec<&str> = pattern.graphemes(true).collect();
    let text_graphemes: Vec<&str> = text.graphemes(true).collect();
    wildcard_match_slices(&pattern_graphemes, &text_graphemes)
}

fn wildcard_match_slices(pattern: &[&str], text: &[&str]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&"*", rest)) => {
            wildcard_match_slices(rest, text)
                || (!text.is_empty() && wildcard_match_slices(pattern, &text[1..]))
        }
        Some((&"?", rest)) => !text.is_empty() && wildcard_match_slices(rest, &text[1..]),
        Some((p, rest)) => match text.split_first() {
            Some((t, trest)) if t == p => wildcard_match_slices(rest, trest),
            _ => false,
        },
    }
}
