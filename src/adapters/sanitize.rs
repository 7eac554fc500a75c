//! Log sanitization for patient identifiers.
//!
//! Applied to formatted log lines before they reach the sink. Redacts:
//! - Patient UUIDs
//! - Medical record numbers (MRNs)
//! - Bed labels ("Bed 12", "bed-4B")
//! - Dates of birth given with a DOB/born prefix
//! - Names given with a "Patient:" prefix
//! - Email addresses and phone numbers
//!
//! Assessment dates and clinical values are left alone; they are not
//! identifying on their own and are needed to read a round log.
//!
//! # Performance
//!
//! `sanitize()` caps the scanned input (see `NUTRIGUARD_SANITIZE_MAX_BYTES`)
//! so a runaway log line cannot stall the writer.

use regex::{Regex, RegexSet};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PII_PATTERNS: OnceLock<PiiPatterns> = OnceLock::new();

/// Defaults to 16 KiB; override with `NUTRIGUARD_SANITIZE_MAX_BYTES`.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct PiiPattern {
    regex: Regex,
    replacement: &'static str,
}

struct PiiPatterns {
    set: RegexSet,
    patterns: Vec<PiiPattern>,
}

const RULES: [(&str, &str); 7] = [
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (r"(?i)\bMRN\s*[:#=]?\s*[A-Z]{0,3}\d{5,10}\b", "[REDACTED-MRN]"),
    (r"(?i)\bbed\s*[-_#:]?\s*[A-Z]?\d{1,3}[A-Z]?\b", "[REDACTED-BED]"),
    (
        r"(?i)\b(?:dob|d\.o\.b\.|date of birth|born)\s*[:=]?\s*(?:\d{4}-\d{2}-\d{2}|\d{1,2}[/.]\d{1,2}[/.]\d{2,4})\b",
        "[REDACTED-DOB]",
    ),
    (
        r"\b(?i:patient(?:\s+name)?)\s*[:=]\s*[A-Z][a-z]+(?:\s+[A-Z][a-z'-]+){0,2}",
        "[REDACTED-NAME]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        "[REDACTED-PHONE]",
    ),
];

/// Longest prefix of `input` within `max_bytes` that ends on a char boundary,
/// and whether anything was cut.
fn capped_prefix(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| input.is_char_boundary(i))
        .unwrap_or(0);
    (&input[..end], true)
}

fn scan_limit(raw: Option<&str>) -> usize {
    match raw.map(str::trim).map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => n,
        _ => DEFAULT_SANITIZE_MAX_BYTES,
    }
}

fn max_sanitize_bytes() -> usize {
    scan_limit(std::env::var("NUTRIGUARD_SANITIZE_MAX_BYTES").ok().as_deref())
}

fn get_patterns() -> &'static PiiPatterns {
    PII_PATTERNS.get_or_init(|| PiiPatterns {
        set: RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set"),
        patterns: RULES
            .iter()
            .map(|&(pattern, replacement)| PiiPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect(),
    })
}

/// Replace patient identifiers in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = capped_prefix(input, max_bytes);

    let mut result = prefix.to_string();
    // Only run the rules that matched; most lines match none.
    for idx in patterns.set.matches(prefix).into_iter() {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains a patient identifier.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let (prefix, _truncated) = capped_prefix(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// Wraps a `MakeWriter` so every log line is redacted on its way out.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = LineRedactor<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        LineRedactor {
            sink: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}

/// Holds bytes until a full line is available, then writes it redacted.
///
/// A partial line is written on `flush`, or early if it outgrows twice the
/// scan cap.
pub struct LineRedactor<W> {
    sink: W,
    pending: Vec<u8>,
}

impl<W: Write> LineRedactor<W> {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink
            .write_all(sanitize(&String::from_utf8_lossy(bytes)).as_bytes())
    }

    fn emit_complete_lines(&mut self) -> io::Result<()> {
        let Some(last) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let rest = self.pending.split_off(last + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }
}

impl<W: Write> Write for LineRedactor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.emit_complete_lines()?;

        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            let overlong = std::mem::take(&mut self.pending);
            self.emit(&overlong)?;
            self.sink.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_complete_lines()?;
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.emit(&tail)?;
        }
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_uuid() {
        let sanitized = sanitize("Round for 550e8400-e29b-41d4-a716-446655440000 scored 82");
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(!sanitized.contains("550e8400"));
        assert!(sanitized.contains("scored 82"));
    }

    #[test]
    fn test_sanitize_mrn() {
        assert!(sanitize("MRN: 12345678 admitted").contains("[REDACTED-MRN]"));
        assert!(sanitize("mrn#AB123456").contains("[REDACTED-MRN]"));
    }

    #[test]
    fn test_sanitize_bed_label() {
        let sanitized = sanitize("NICU bed 12B: feeds held");
        assert!(sanitized.contains("[REDACTED-BED]"));
        assert!(!sanitized.contains("12B"));
        assert!(sanitize("moved to Bed-4").contains("[REDACTED-BED]"));
    }

    #[test]
    fn test_sanitize_dob_only_with_prefix() {
        let sanitized = sanitize("DOB: 2023-11-02, assessed 2024-03-01");
        assert!(sanitized.contains("[REDACTED-DOB]"));
        assert!(!sanitized.contains("2023-11-02"));
        assert!(sanitized.contains("2024-03-01"));
        assert!(sanitize("born 02/11/2023").contains("[REDACTED-DOB]"));
    }

    #[test]
    fn test_sanitize_patient_name() {
        let sanitized = sanitize("Patient: Maria Lopez tolerating feeds");
        assert!(sanitized.contains("[REDACTED-NAME]"));
        assert!(!sanitized.contains("Lopez"));
    }

    #[test]
    fn test_sanitize_contact_details() {
        assert!(sanitize("Call parent at (555) 123-4567").contains("[REDACTED-PHONE]"));
        assert!(sanitize("Contact: dietitian@hospital.org").contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_clinical_text_untouched() {
        let line = "Round scored overall=74 gi=80 adjustment=maintain energy=1188 kcal";
        assert_eq!(sanitize(line), line);
        assert!(!contains_pii(line));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("prefix MRN 12345678 suffix", 10);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_scan_limit_parsing() {
        assert_eq!(scan_limit(None), DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(scan_limit(Some(" 64 ")), 64);
        assert_eq!(scan_limit(Some("0")), DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(scan_limit(Some("lots")), DEFAULT_SANITIZE_MAX_BYTES);
    }

    #[test]
    fn test_capped_prefix_respects_char_boundary() {
        // "é" is two bytes; a cap of 2 would split it.
        assert_eq!(capped_prefix("aé", 2), ("a", true));
        assert_eq!(capped_prefix("aé", 3), ("aé", false));
    }

    fn redactor() -> LineRedactor<Vec<u8>> {
        LineRedactor {
            sink: Vec::new(),
            pending: Vec::new(),
        }
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let mut writer = redactor();
        writer
            .write_all(b"bed 7 held\nbed 9 ok\nsecond ")
            .expect("Should write");
        assert_eq!(
            String::from_utf8_lossy(&writer.sink),
            "[REDACTED-BED] held\n[REDACTED-BED] ok\n"
        );

        writer.flush().expect("Should flush");
        assert_eq!(
            String::from_utf8_lossy(&writer.sink),
            "[REDACTED-BED] held\n[REDACTED-BED] ok\nsecond "
        );
    }
}
