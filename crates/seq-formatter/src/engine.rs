use chrono::{DateTime, Utc};
use seq_schemas::TemplateShape;

/// Render `counter` into its final identifier under `shape`.
///
/// Deterministic, allocation-light, never fails and never performs IO —
/// invalid templates are rejected earlier, at `PrefixConfig::parse_template`
/// time.
pub fn render(prefix: &str, shape: &TemplateShape, counter: i64, now: DateTime<Utc>) -> String {
    let counter = counter.max(0) as u64;

    match shape {
        TemplateShape::CounterOnly { literal, width } => {
            format!("{literal}{:0width$}", counter, width = width)
        }
        TemplateShape::PrefixThenCounter { width } => {
            format!("{prefix}{:0width$}", counter, width = width)
        }
        TemplateShape::YearThenCounter {
            before_year,
            between,
            width,
        } => {
            let year = now.format("%Y");
            format!("{before_year}{year}{between}{:0width$}", counter, width = width)
        }
    }
}
