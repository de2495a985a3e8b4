//! SKILL.md header parser.
//!
//! The header is a flat `key: value` block between two `---` lines at the very
//! top of the file. It is deliberately not YAML: malformed lines are skipped,
//! values are plain strings, and a repeated key keeps its last value.

/// Header block delimiter line
const DELIMITER: &str = "---";

/// Parsed header block, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: Vec<(String, String)>,
}

impl Header {
    /// Insert or overwrite a key, keeping its original position
    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key` if present and non-empty
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the header block from the top of a document.
///
/// Returns `None` when the document does not open with a delimited block.
pub fn parse_header(content: &str) -> Option<Header> {
    let mut lines = content.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    if lines.next()? != DELIMITER {
        return None;
    }

    let mut body = Vec::new();
    let mut closed = false;
    for line in lines {
        // A delimiter straight after the opening line is body text, not a close
        if line == DELIMITER && !body.is_empty() {
            closed = true;
            break;
        }
        body.push(line);
    }
    if !closed {
        return None;
    }

    let mut header = Header::default();
    for line in body {
        if let Some((key, value)) = parse_line(line) {
            header.insert(key, value);
        }
    }
    Some(header)
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let colon = line.find(':')?;
    if colon == 0 {
        return None;
    }

    let key = line[..colon].trim();
    let value = strip_quotes(line[colon + 1..].trim());
    Some((key.to_string(), value.to_string()))
}

/// Drop one leading and one trailing char if the value opens with a quote.
/// The closing char is not checked.
fn strip_quotes(value: &str) -> &str {
    if !(value.starts_with('"') || value.starts_with('\'')) {
        return value;
    }
    let inner = &value[1..];
    match inner.char_indices().last() {
        Some((idx, _)) => &inner[..idx],
        None => "",
    }
}
