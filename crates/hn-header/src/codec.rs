use crate::header::{Eol, FieldValue, HeaderLayout, ObjectHeader};

/// Decode the header block at the start of `text`.
///
/// The header region runs up to the first doubled end-of-line sequence
/// (trying `\n\n`, `\r\r`, `\n\r\n\r` in that order); the boundary must occur
/// past offset zero. Each `(name, required)` entry in `requested` is looked
/// up at a line start within the region: a missing required field aborts the
/// decode, a missing optional field is simply absent from the result. With
/// `include_all`, every remaining `name: value` line is captured as well;
/// a line with an empty left side continues the previous field, and recurring
/// names collect into an ordered list.
///
/// Returns `None` for anything that is not a recognized header format. This
/// is a soft failure: the caller treats the blob as "not one of ours".
pub fn decode(text: &str, requested: &[(&str, bool)], include_all: bool) -> Option<ObjectHeader> {
    let (eol, boundary) = find_boundary(text)?;
    let region = &text[..boundary];

    let mut header = ObjectHeader::new();
    header.set_layout(HeaderLayout {
        body_offset: boundary + eol.doubled().len(),
        eol,
    });

    for (name, required) in requested {
        match field_value(region, eol, name) {
            Some(value) => header.set(*name, value),
            None if *required => return None,
            None => {}
        }
    }

    if include_all {
        let mut prev_name: Option<String> = None;
        for line in region.split(eol.as_str()) {
            let Some(divider) = line.find(':') else {
                continue;
            };
            let name = if divider == 0 {
                // continuation line: inherit the previous field name
                match &prev_name {
                    Some(name) => name.clone(),
                    None => continue,
                }
            } else {
                let name = line[..divider].to_string();
                prev_name = Some(name.clone());
                name
            };
            // fields grabbed by the requested rules are not duplicated
            if requested.iter().any(|(n, _)| *n == name) {
                continue;
            }
            let value = line[divider + 1..].trim();
            if header.contains(&name) {
                header.push_value(name, value);
            } else {
                header.set(name, value);
            }
        }
    }

    Some(header)
}

/// Serialize a header to text: one `name: value` line per field (one line per
/// element for list-valued fields), joined and terminated by `eol`.
///
/// `eol` defaults to the convention recorded in the header's layout, or `\n`.
/// The derived layout itself is never emitted.
pub fn encode(header: &ObjectHeader, eol: Option<Eol>) -> String {
    let eol = eol
        .or_else(|| header.layout().map(|l| l.eol))
        .unwrap_or_default();
    let mut out = String::new();
    for (name, value) in header.iter() {
        match value {
            FieldValue::Scalar(v) => {
                push_line(&mut out, name, v, eol);
            }
            FieldValue::List(list) => {
                for v in list {
                    push_line(&mut out, name, v, eol);
                }
            }
        }
    }
    out
}

fn push_line(out: &mut String, name: &str, value: &str, eol: Eol) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str(eol.as_str());
}

/// Locate the header/body boundary. A boundary at offset zero would mean an
/// empty header region and is rejected.
fn find_boundary(text: &str) -> Option<(Eol, usize)> {
    for eol in Eol::TRIAL_ORDER {
        if let Some(pos) = text.find(eol.doubled()) {
            if pos > 0 {
                return Some((eol, pos));
            }
        }
    }
    None
}

/// Find `name:` at a line start within the header region and return its
/// value: everything after the colon (leading spaces skipped) up to the next
/// end-of-line or the end of the region.
fn field_value(region: &str, eol: Eol, name: &str) -> Option<String> {
    let pattern = format!("{name}:");
    let pos = region
        .match_indices(&pattern)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || region[..i].ends_with(eol.as_str()))?;

    let mut start = pos + pattern.len();
    let bytes = region.as_bytes();
    while bytes.get(start) == Some(&b' ') {
        start += 1;
    }
    let end = region[start..]
        .find(eol.as_str())
        .map(|j| start + j)
        .unwrap_or(region.len());
    Some(region[start..end].to_string())
}
