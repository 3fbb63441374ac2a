//! seq-formatter
//!
//! Renders a numeric counter plus prefix into the final identifier per a
//! per-prefix template.
//!
//! Deterministic, pure logic. No IO, no hidden state. The three
//! recognized template shapes are parsed once (`seq_schemas::config`) and
//! rendered here without ever re-parsing the template string.

mod engine;

use chrono::{DateTime, Utc};
use seq_schemas::PrefixConfig;

pub use engine::render;

/// Render the full identifier for `counter` under `config`'s template.
pub fn format(config: &PrefixConfig, counter: i64, now: DateTime<Utc>) -> seq_schemas::SeqResult<String> {
    let shape = config.parse_template()?;
    Ok(render(&config.prefix, &shape, counter, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seq_schemas::ResetRule;

    fn cfg(prefix: &str, padding_length: u32, template: &str) -> PrefixConfig {
        PrefixConfig {
            prefix: prefix.to_string(),
            padding_length,
            format_template: template.to_string(),
            reset_rule: ResetRule::Never,
            last_reset_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: "test".to_string(),
        }
    }

    #[test]
    fn prefix_then_counter_shape_renders() {
        let c = cfg("SG", 6, "%s%06d");
        assert_eq!(format(&c, 1, Utc::now()).unwrap(), "SG000001");
    }

    #[test]
    fn batch_padding_eight_digits() {
        let c = cfg("PO", 8, "%s%08d");
        assert_eq!(format(&c, 1, Utc::now()).unwrap(), "PO00000001");
        assert_eq!(format(&c, 5, Utc::now()).unwrap(), "PO00000005");
    }

    #[test]
    fn yearly_template_shape_renders() {
        let c = cfg("INV", 4, "INV%d-%04d");
        let now = DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format(&c, 43, now).unwrap(), "INV2025-0043");
    }

    #[test]
    fn counter_only_shape() {
        let c = cfg("SG", 6, "SG%06d");
        assert_eq!(format(&c, 7, Utc::now()).unwrap(), "SG000007");
    }

    #[test]
    fn zero_counter_is_padded() {
        let c = cfg("SG", 6, "%s%06d");
        assert_eq!(format(&c, 0, Utc::now()).unwrap(), "SG000000");
    }

    #[test]
    fn large_counter_exceeds_padding_width_but_still_renders() {
        let c = cfg("SG", 3, "%s%03d");
        assert_eq!(format(&c, 123_456, Utc::now()).unwrap(), "SG123456");
    }

    #[test]
    fn near_i64_max_counter_still_renders() {
        let c = cfg("SG", 6, "%s%06d");
        let near_max = i64::MAX - 1;
        let out = format(&c, near_max, Utc::now()).unwrap();
        assert_eq!(out, format!("SG{near_max}"));
    }

    #[test]
    fn negative_counter_is_clamped_to_zero() {
        let c = cfg("SG", 6, "%s%06d");
        assert_eq!(format(&c, -5, Utc::now()).unwrap(), "SG000000");
    }

    #[test]
    fn invalid_template_is_rejected() {
        let c = cfg("SG", 6, "NO_PLACEHOLDER");
        assert!(format(&c, 1, Utc::now()).is_err());
    }

    #[test]
    fn every_shape_starts_with_prefix_and_padded_digit_run() {
        let now = Utc::now();
        let shapes = [cfg("SG", 6, "%s%06d"), cfg("SG", 6, "SG%06d")];
        for c in &shapes {
            let out = format(c, 9, now).unwrap();
            assert!(out.starts_with(&c.prefix));
            let digits = &out[c.prefix.len()..];
            assert_eq!(digits.len(), c.padding_length as usize);
            assert!(digits.chars().all(|ch| ch.is_ascii_digit()));
        }
    }
}
