//! Tolerant structured-field extraction from LLM function-call output.
//!
//! The enrichment backend is contracted to return a JSON-object-shaped
//! string with a fixed key set, but in practice the text may carry
//! unescaped control characters, trailing commas, or nested quotes that
//! break a strict JSON parse. This module recovers the fields with a
//! schema-directed scan instead: it looks for each recognized quoted key
//! and captures the span up to the next recognized key (or the trailing
//! closing brace). It never fails; malformed input yields a partial or
//! empty mapping and callers validate the fields they require.

/// Whether a field carries a scalar string or an array of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Array,
}

/// One recognized field in an extraction schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Full six-field schema produced by the note enrichment function call.
pub const NOTE_FIELD_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "note_title", kind: FieldKind::Scalar },
    FieldSpec { name: "note_type", kind: FieldKind::Scalar },
    FieldSpec { name: "note_rewrite", kind: FieldKind::Scalar },
    FieldSpec { name: "note_ideas", kind: FieldKind::Scalar },
    FieldSpec { name: "note_topics_contained", kind: FieldKind::Array },
    FieldSpec { name: "note_topics_related", kind: FieldKind::Array },
];

/// Reduced four-field schema used by simpler enrichment callers.
pub const NOTE_FIELD_SCHEMA_REDUCED: &[FieldSpec] = &[
    FieldSpec { name: "note_title", kind: FieldKind::Scalar },
    FieldSpec { name: "note_type", kind: FieldKind::Scalar },
    FieldSpec { name: "note_rewrite", kind: FieldKind::Scalar },
    FieldSpec { name: "note_topics", kind: FieldKind::Array },
];

/// A recovered field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Extractor output: field values in insertion order of first match.
///
/// Keys the scan never saw are simply absent; the extractor invents no
/// defaults. Lookup is linear, which is fine for single-digit schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields(Vec<(&'static str, FieldValue)>);

impl ExtractedFields {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    fn insert_first(&mut self, key: &'static str, value: FieldValue) {
        if !self.contains(key) {
            self.0.push((key, value));
        }
    }
}

/// One occurrence of a recognized quoted key in the raw text.
#[derive(Debug, Clone, Copy)]
struct KeyHit {
    /// Byte offset of the opening quote.
    pos: usize,
    /// Byte offset just past the closing quote.
    end: usize,
    spec: FieldSpec,
    /// True when the quoted key is immediately followed by a colon,
    /// i.e. it starts a field rather than merely bounding one.
    is_field: bool,
}

/// Recover schema fields from a raw, possibly malformed, JSON-shaped blob.
///
/// Scan order is strictly left to right; the first occurrence of a key
/// wins, while later duplicates still terminate the preceding value span.
pub fn extract(raw: &str, schema: &[FieldSpec]) -> ExtractedFields {
    let mut hits: Vec<KeyHit> = Vec::new();
    for spec in schema {
        let needle = format!("\"{}\"", spec.name);
        for (pos, m) in raw.match_indices(&needle) {
            let end = pos + m.len();
            hits.push(KeyHit {
                pos,
                end,
                spec: *spec,
                is_field: raw[end..].starts_with(':'),
            });
        }
    }
    hits.sort_by_key(|h| h.pos);

    // A trailing close brace (ignoring whitespace) bounds the last value.
    let tail = raw.trim_end();
    let end_boundary = if tail.ends_with('}') {
        tail.len() - 1
    } else {
        raw.len()
    };

    let mut fields = ExtractedFields::default();
    for (i, hit) in hits.iter().enumerate() {
        if !hit.is_field {
            continue;
        }
        let value_start = hit.end + 1; // past the colon
        let value_end = hits
            .get(i + 1)
            .map(|next| next.pos)
            .unwrap_or(end_boundary)
            .max(value_start);
        let span = &raw[value_start..value_end];
        fields.insert_first(hit.spec.name, process_span(span, hit.spec.kind));
    }
    fields
}

/// Trim and unescape one captured value span.
fn process_span(span: &str, kind: FieldKind) -> FieldValue {
    let trimmed = span.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == ',');
    // Only the two-character `\n` escape is rewritten; this is deliberately
    // narrower than JSON unescaping.
    let text = trimmed.replace("\\n", "\n");

    match kind {
        FieldKind::Scalar => FieldValue::Text(text),
        FieldKind::Array => {
            let mut inner = text.as_str();
            inner = inner.strip_prefix('[').unwrap_or(inner);
            inner = inner.strip_suffix(']').unwrap_or(inner);
            let items = inner
                .split(',')
                .map(|item| item.trim_matches(|c: char| c.is_whitespace() || c == '"').to_string())
                .collect();
            FieldValue::List(items)
        }
    }
}
