//! ISO-8601 duration parsing and formatting.
//!
//! The kernel only needs the subset of ISO-8601 durations described in the
//! spec's grammar `PT?<n>[HMSD]` (§4.3): a single numeric component tagged
//! with one of hours, minutes, seconds, or days. Full calendar durations
//! (months, years, week designators) are out of scope — SLA hints and
//! analytics timings are always machine-computed, never hand-authored.

use std::time::Duration;

/// Parse an ISO-8601-subset duration string (`PT<n>H`, `PT<n>M`, `PT<n>S`,
/// or `P<n>D`) into a [`Duration`].
///
/// Returns `None` on anything that doesn't match the grammar — callers treat
/// an unparseable duration as "no due date" / "no value" rather than an
/// error (§4.3).
#[must_use]
pub fn parse_iso8601(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix("PT") {
        let (n, unit) = split_number_unit(rest)?;
        let secs = match unit {
            'H' => n.checked_mul(3600)?,
            'M' => n.checked_mul(60)?,
            'S' => n,
            _ => return None,
        };
        Some(Duration::from_secs(secs))
    } else if let Some(rest) = s.strip_prefix('P') {
        let (n, unit) = split_number_unit(rest)?;
        if unit != 'D' {
            return None;
        }
        Some(Duration::from_secs(n.checked_mul(86_400)?))
    } else {
        None
    }
}

fn split_number_unit(rest: &str) -> Option<(u64, char)> {
    let unit = rest.chars().last()?;
    let digits = &rest[..rest.len() - unit.len_utf8()];
    if digits.is_empty() {
        return None;
    }
    let n: u64 = digits.parse().ok()?;
    Some((n, unit))
}

/// Format a [`Duration`] as an ISO-8601 `PT<n>S` string (fractional seconds
/// truncated to whole seconds — analytics timings are reported at
/// second granularity).
#[must_use]
pub fn format_iso8601_seconds(d: Duration) -> String {
    format!("PT{}S", d.as_secs())
}
