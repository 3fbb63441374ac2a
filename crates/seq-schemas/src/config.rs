use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SeqError, SeqResult};

/// How a prefix's counter is expected to be reset. The value is stored and
/// round-tripped through `GetConfig`/`UpdateConfig`; nothing in this
/// repository applies it automatically — no scheduler reads or acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetRule {
    Never,
    Daily,
    Monthly,
    Yearly,
}

/// The three recognized template shapes, parsed once at config-validate
/// time so `format()` never re-parses a template string per issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TemplateShape {
    /// `PFX%06d` — literal prefix text baked into `literal`, one counter slot.
    CounterOnly { literal: String, width: usize },
    /// `%s%0Nd` — prefix substituted, then zero-padded counter.
    PrefixThenCounter { width: usize },
    /// `INV%d-%04d` — literal before the year, year slot, literal, counter slot.
    YearThenCounter {
        before_year: String,
        between: String,
        width: usize,
    },
}

/// Per-prefix identifier configuration. Created/updated only via the
/// administrative configuration interface (`GetConfig`/`UpdateConfig`);
/// never destroyed implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixConfig {
    pub prefix: String,
    pub padding_length: u32,
    pub format_template: String,
    pub reset_rule: ResetRule,
    pub last_reset_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl PrefixConfig {
    /// Parse `format_template` into a closed `TemplateShape`, rejecting
    /// templates with no integer placeholder.
    pub fn parse_template(&self) -> SeqResult<TemplateShape> {
        parse_template_shape(&self.format_template, self.padding_length as usize)
    }
}

/// Parse one of the three recognized shapes, falling back to a synthetic
/// `PrefixThenCounter` shape when the template matches none of them but
/// still contains at least one `%d`-like slot; rejects templates with no
/// integer placeholder at all.
pub fn parse_template_shape(template: &str, padding_length: usize) -> SeqResult<TemplateShape> {
    if !template.contains('d') {
        return Err(SeqError::invalid(format!(
            "format_template {template:?} has no integer placeholder"
        )));
    }

    // Shape 3: integer-then-integer, e.g. "INV%d-%04d".
    if let Some((before_year, rest)) = split_once_token(template, "%d") {
        if let Some(width) = trailing_padded_width(rest) {
            let between = rest[..rest.len() - format!("%0{width}d").len()].to_string();
            return Ok(TemplateShape::YearThenCounter {
                before_year: before_year.to_string(),
                between,
                width,
            });
        }
    }

    // Shape 2: string-then-integer, e.g. "%s%06d".
    if let Some(rest) = template.strip_prefix("%s") {
        if let Some(width) = trailing_padded_width(rest) {
            return Ok(TemplateShape::PrefixThenCounter { width });
        }
    }

    // Shape 1: one integer placeholder with explicit width, e.g. "PFX%06d".
    if let Some(width) = trailing_padded_width(template) {
        let literal_len = template.len() - format!("%0{width}d").len();
        return Ok(TemplateShape::CounterOnly {
            literal: template[..literal_len].to_string(),
            width,
        });
    }

    // Fallback: `<prefix><counter zero-padded to padding_length>`.
    Ok(TemplateShape::PrefixThenCounter {
        width: padding_length,
    })
}

/// Find the first occurrence of `token` and split around it, returning
/// `(before, after)`. Used to separate the year placeholder from the
/// counter placeholder in shape 3.
fn split_once_token<'a>(s: &'a str, token: &str) -> Option<(&'a str, &'a str)> {
    let idx = s.find(token)?;
    Some((&s[..idx], &s[idx + token.len()..]))
}

/// If `s` ends with a `%0Nd` placeholder, return `N`.
fn trailing_padded_width(s: &str) -> Option<usize> {
    let idx = s.rfind("%0")?;
    let rest = &s[idx + 2..];
    let digits = rest.strip_suffix('d')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
