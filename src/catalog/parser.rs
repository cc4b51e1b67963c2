//! Line-oriented parser for `.po` catalog sources.
//!
//! Recognizes `msgid` / `msgstr` records whose strings may be split into
//! several adjacent quoted fragments. Anything that does not form a complete
//! record is skipped instead of failing the parse.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::{unescape, CatalogEntry, TranslationCatalog};
use crate::error::CatalogError;

/// Why a record was left out of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `msgid` with no following `msgstr`.
    MissingValue,
    /// `msgstr` with no preceding `msgid`.
    OrphanValue,
    /// Unterminated or otherwise broken quoted string.
    MalformedQuoting,
    /// Quoted continuation line outside of any record.
    StrayFragment,
    /// Record uses `msgid_plural` / `msgstr[N]`.
    PluralForm,
}

/// Result of parsing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Matched(CatalogEntry),
    Skipped { line: usize, reason: SkipReason },
}

static KEYWORD_REGEX: OnceLock<Regex> = OnceLock::new();
static FRAGMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn keyword_regex() -> &'static Regex {
    KEYWORD_REGEX.get_or_init(|| {
        Regex::new(r"^(msgctxt|msgid_plural|msgid|msgstr\[\d+\]|msgstr)(?:\s+(.*))?$")
            .expect("keyword regex is valid")
    })
}

fn fragment_regex() -> &'static Regex {
    FRAGMENT_REGEX.get_or_init(|| {
        Regex::new(r#"^"((?:[^"\\]|\\.)*)""#).expect("fragment regex is valid")
    })
}

/// Split `"a" "b"` into its raw (still escaped) contents.
///
/// Returns `None` if the text contains anything besides quoted fragments.
fn split_fragments(text: &str) -> Option<Vec<&str>> {
    let mut fragments = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let caps = fragment_regex().captures(rest)?;
        let whole = caps.get(0)?;
        fragments.push(caps.get(1).map_or("", |m| m.as_str()));
        rest = rest[whole.end()..].trim_start();
    }
    Some(fragments)
}

/// Split `"key" msgstr "value"` at the value keyword following the key's
/// fragments. Returns the key text and, if present, the inline value text.
fn split_inline_value(text: &str) -> (&str, Option<&str>) {
    let mut rest = text.trim_start();
    while let Some(fragment) = fragment_regex().find(rest) {
        rest = rest[fragment.end()..].trim_start();
    }
    match rest.strip_prefix("msgstr") {
        Some(value) if value.is_empty() || value.starts_with(char::is_whitespace) => {
            (&text[..text.len() - rest.len()], Some(value))
        }
        _ => (text, None),
    }
}

/// Where the next continuation line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    None,
    Ignored,
    Key,
    Value,
}

#[derive(Debug, Default)]
struct PendingRecord {
    line: usize,
    key: String,
    key_fragments: usize,
    value: Option<String>,
    value_fragments: usize,
    plural: bool,
    malformed: bool,
}

impl PendingRecord {
    fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    fn append(&mut self, cursor: Cursor, text: &str) {
        let Some(fragments) = split_fragments(text) else {
            self.malformed = true;
            return;
        };
        match cursor {
            Cursor::Key => {
                self.key_fragments += fragments.len();
                self.key.extend(fragments);
            }
            Cursor::Value => {
                self.value_fragments += fragments.len();
                self.value.get_or_insert_with(String::new).extend(fragments);
            }
            Cursor::None | Cursor::Ignored => {}
        }
    }

    fn finish(self) -> RecordOutcome {
        let skipped = |reason| RecordOutcome::Skipped {
            line: self.line,
            reason,
        };
        if self.malformed {
            return skipped(SkipReason::MalformedQuoting);
        }
        if self.plural {
            return skipped(SkipReason::PluralForm);
        }
        let Some(value) = self.value.as_deref() else {
            return skipped(SkipReason::MissingValue);
        };
        if self.key_fragments == 0 || self.value_fragments == 0 {
            return skipped(SkipReason::MalformedQuoting);
        }
        RecordOutcome::Matched(CatalogEntry::new(unescape(&self.key), unescape(value)))
    }
}

/// Parse catalog text into one tagged outcome per record, in source order.
pub fn parse_records(text: &str) -> Vec<RecordOutcome> {
    let mut outcomes = Vec::new();
    let mut pending: Option<PendingRecord> = None;
    let mut cursor = Cursor::None;

    let flush = |pending: &mut Option<PendingRecord>, outcomes: &mut Vec<RecordOutcome>| {
        if let Some(record) = pending.take() {
            outcomes.push(record.finish());
        }
    };

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('"') {
            match (pending.as_mut(), cursor) {
                (_, Cursor::Ignored) => {}
                (Some(record), Cursor::Key | Cursor::Value) => record.append(cursor, line),
                _ => outcomes.push(RecordOutcome::Skipped {
                    line: line_no,
                    reason: SkipReason::StrayFragment,
                }),
            }
            continue;
        }

        let Some(caps) = keyword_regex().captures(line) else {
            // Comments, flags, obsolete entries and other noise end a record.
            flush(&mut pending, &mut outcomes);
            cursor = Cursor::None;
            continue;
        };
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let rest = caps.get(2).map_or("", |m| m.as_str());

        match keyword {
            "msgctxt" => {
                flush(&mut pending, &mut outcomes);
                cursor = Cursor::Ignored;
            }
            "msgid" => {
                flush(&mut pending, &mut outcomes);
                let (key_text, inline_value) = split_inline_value(rest);
                let mut record = PendingRecord::new(line_no);
                record.append(Cursor::Key, key_text);
                cursor = Cursor::Key;
                if let Some(value_text) = inline_value {
                    record.value = Some(String::new());
                    record.append(Cursor::Value, value_text);
                    cursor = Cursor::Value;
                }
                pending = Some(record);
            }
            "msgid_plural" => {
                match pending.as_mut() {
                    Some(record) if record.value.is_none() => record.plural = true,
                    _ => {
                        flush(&mut pending, &mut outcomes);
                        outcomes.push(RecordOutcome::Skipped {
                            line: line_no,
                            reason: SkipReason::PluralForm,
                        });
                    }
                }
                cursor = Cursor::Ignored;
            }
            "msgstr" => match pending.as_mut() {
                Some(record) if record.value.is_none() && !record.plural => {
                    record.value = Some(String::new());
                    record.append(Cursor::Value, rest);
                    cursor = Cursor::Value;
                }
                _ => {
                    flush(&mut pending, &mut outcomes);
                    outcomes.push(RecordOutcome::Skipped {
                        line: line_no,
                        reason: SkipReason::OrphanValue,
                    });
                    cursor = Cursor::None;
                }
            },
            // msgstr[N]
            _ => {
                match pending.as_mut() {
                    Some(record) => {
                        record.plural = true;
                        record.value.get_or_insert_with(String::new);
                    }
                    None => outcomes.push(RecordOutcome::Skipped {
                        line: line_no,
                        reason: SkipReason::OrphanValue,
                    }),
                }
                cursor = Cursor::Ignored;
            }
        }
    }

    flush(&mut pending, &mut outcomes);
    outcomes
}

/// Parse catalog text into a [`TranslationCatalog`].
///
/// Records with an empty key (the metadata header) or an empty value
/// (untranslated) are dropped, and a repeated key takes the later value.
pub fn parse_catalog(text: &str) -> TranslationCatalog {
    let mut catalog = TranslationCatalog::new();
    let mut matched = 0usize;
    let mut skipped = 0usize;
    let mut dropped = 0usize;

    for outcome in parse_records(text) {
        match outcome {
            RecordOutcome::Matched(entry) => {
                matched += 1;
                if !catalog.insert(entry.key, entry.value) {
                    dropped += 1;
                }
            }
            RecordOutcome::Skipped { line, reason } => {
                skipped += 1;
                debug!("Skipping record at line {}: {:?}", line, reason);
            }
        }
    }

    debug!(
        "Parsed {} records ({} empty dropped, {} skipped) into {} entries",
        matched,
        dropped,
        skipped,
        catalog.len()
    );
    catalog
}

/// Read and parse one catalog source file.
pub fn read_catalog(path: &Path) -> Result<TranslationCatalog, CatalogError> {
    let bytes = std::fs::read(path).map_err(|source| CatalogError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| CatalogError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text.as_str());
    Ok(parse_catalog(text))
}
