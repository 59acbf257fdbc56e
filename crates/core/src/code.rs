//! Document code generation.
//!
//! Codes look like `HD202406123456`: a prefix, the four-digit year, the
//! two-digit month and a six-digit suffix. The first candidate takes its
//! suffix from the clock; retries after a collision draw a random suffix,
//! since two requests in the same millisecond share a clock suffix.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

/// Prefix of sales invoice codes.
pub const INVOICE_PREFIX: &str = "HD";
/// Prefix of receivable debt codes.
pub const RECEIVABLE_PREFIX: &str = "PT";
/// Prefix of payable debt codes.
pub const PAYABLE_PREFIX: &str = "PN";

const SUFFIX_MODULUS: i64 = 1_000_000;

/// Builds the candidate code for the given attempt number.
///
/// Attempt 0 uses the last six digits of the millisecond timestamp.
#[must_use]
pub fn candidate_code(prefix: &str, now: DateTime<Utc>, attempt: u32) -> String {
    let suffix = if attempt == 0 {
        clock_suffix(now)
    } else {
        rand::rng().random_range(0..1_000_000u32)
    };
    format!("{prefix}{:04}{:02}{suffix:06}", now.year(), now.month())
}

fn clock_suffix(now: DateTime<Utc>) -> u32 {
    u32::try_from(now.timestamp_millis().rem_euclid(SUFFIX_MODULUS)).unwrap_or_default()
}

/// Derives the receivable debt code for an invoice code.
///
/// `HD202406123456` becomes `PT202406123456`; codes without the invoice
/// prefix are kept whole behind `PT`.
#[must_use]
pub fn debt_code_for_invoice(invoice_code: &str) -> String {
    let body = invoice_code
        .strip_prefix(INVOICE_PREFIX)
        .unwrap_or(invoice_code);
    format!("{RECEIVABLE_PREFIX}{body}")
}

/// Trims a client-supplied code, treating blank input as absent.
#[must_use]
pub fn normalize_code(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_first_candidate_uses_clock_suffix() {
        // 2024-06-01T00:00:00.123Z
        let now = at(1_717_200_000_123);
        let code = candidate_code(INVOICE_PREFIX, now, 0);
        assert_eq!(code, "HD202406000123");
    }

    #[test]
    fn test_retry_candidate_keeps_shape() {
        let now = at(1_717_200_000_123);
        for attempt in 1..20 {
            let code = candidate_code(PAYABLE_PREFIX, now, attempt);
            assert_eq!(code.len(), 14);
            assert!(code.starts_with("PN202406"));
            assert!(code[8..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_debt_code_for_invoice() {
        assert_eq!(debt_code_for_invoice("HD202406123456"), "PT202406123456");
        assert_eq!(debt_code_for_invoice("INV-7"), "PTINV-7");
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(Some("  HD1 ".into())), Some("HD1".into()));
        assert_eq!(normalize_code(Some("   ".into())), None);
        assert_eq!(normalize_code(None), None);
    }
}
