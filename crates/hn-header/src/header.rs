use serde::{Deserialize, Serialize};

/// End-of-line convention detected in a header block.
///
/// The boundary search tries the doubled form of each variant in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eol {
    /// `\n`
    Lf,
    /// `\r`
    Cr,
    /// `\n\r`
    LfCr,
}

impl Eol {
    /// Trial order for boundary detection.
    pub const TRIAL_ORDER: [Eol; 3] = [Eol::Lf, Eol::Cr, Eol::LfCr];

    /// The end-of-line sequence itself.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::LfCr => "\n\r",
        }
    }

    /// The doubled sequence marking the header/body boundary.
    pub fn doubled(&self) -> &'static str {
        match self {
            Self::Lf => "\n\n",
            Self::Cr => "\r\r",
            Self::LfCr => "\n\r\n\r",
        }
    }
}

impl Default for Eol {
    fn default() -> Self {
        Self::Lf
    }
}

/// Derived placement of a decoded header within its source blob.
///
/// This is the `_h` pseudo-field: it records where the body starts and which
/// end-of-line convention was detected. It is never serialized back into the
/// textual header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLayout {
    /// Byte offset of the first body byte in the original blob.
    pub body_offset: usize,
    /// Detected end-of-line convention.
    pub eol: Eol,
}

/// A header field value: a scalar, or an ordered list for repeated fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// First (or only) value.
    pub fn first(&self) -> &str {
        match self {
            Self::Scalar(s) => s,
            Self::List(v) => v.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Parsed object header: named fields in insertion order.
///
/// Field names are unique; a recurring field is coerced into an ordered list
/// of values. An optional [`HeaderLayout`] carries the derived body offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHeader {
    fields: Vec<(String, FieldValue)>,
    layout: Option<HeaderLayout>,
}

impl ObjectHeader {
    /// Create an empty header with no layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// The derived layout, if this header was decoded from a blob.
    pub fn layout(&self) -> Option<HeaderLayout> {
        self.layout
    }

    pub fn set_layout(&mut self, layout: HeaderLayout) {
        self.layout = Some(layout);
    }

    /// Scalar view of a field: the first value, or `None` if absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.first())
    }

    /// All values of a field, in order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        match self.fields.iter().find(|(n, _)| n == name) {
            Some((_, FieldValue::Scalar(s))) => vec![s.as_str()],
            Some((_, FieldValue::List(v))) => v.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Set a scalar field, replacing any existing value in place (the field
    /// keeps its position in iteration order) or appending a new field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = FieldValue::Scalar(value.into());
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Append a value to a field, coercing a scalar slot into a list on the
    /// first recurrence.
    pub fn push_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, FieldValue::List(list))) => list.push(value),
            Some((_, slot @ FieldValue::Scalar(_))) => {
                let FieldValue::Scalar(existing) = std::mem::replace(
                    slot,
                    FieldValue::List(Vec::new()),
                ) else {
                    unreachable!()
                };
                *slot = FieldValue::List(vec![existing, value]);
            }
            None => self.fields.push((name, FieldValue::Scalar(value))),
        }
    }

    /// Remove a field. Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|(n, _)| n != name);
        self.fields.len() != before
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
