//! The `---` file header.
//!
//! A script may open (after an optional shebang and blank lines) with a
//! description fenced by `---` lines. The header text is returned separately
//! and blanked out of the source so token spans keep their offsets.

use std::borrow::Cow;

pub(crate) struct Header<'a> {
    pub description: Option<String>,
    /// Source with the header replaced by whitespace.
    pub source: Cow<'a, str>,
}

pub(crate) fn split_header(source: &str) -> Header<'_> {
    let mut offset = 0;
    let mut open = None;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || (offset == 0 && trimmed.starts_with("#!")) {
            offset += line.len();
            continue;
        }
        if trimmed == "---" {
            open = Some((offset, offset + line.len()));
        }
        break;
    }
    let Some((start, body_start)) = open else {
        return unchanged(source);
    };

    let mut cursor = body_start;
    let mut body = Vec::new();
    for line in source[body_start..].split_inclusive('\n') {
        cursor += line.len();
        if line.trim() == "---" {
            let masked = mask(source, start, cursor);
            let description = body.join("\n").trim().to_owned();
            return Header {
                description: (!description.is_empty()).then_some(description),
                source: Cow::Owned(masked),
            };
        }
        body.push(line.trim_end());
    }
    unchanged(source)
}

fn unchanged(source: &str) -> Header<'_> {
    Header {
        description: None,
        source: Cow::Borrowed(source),
    }
}

/// Replace `source[start..end]` with spaces, keeping newlines and byte offsets.
fn mask(source: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(source.len());
    out.push_str(&source[..start]);
    for ch in source[start..end].chars() {
        if ch == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    }
    out.push_str(&source[end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_is_extracted_and_masked() {
        let source = "#!/usr/bin/env rad\n---\nFetches things.\n\nMore detail.\n---\nprint(1)\n";
        let header = split_header(source);
        assert_eq!(
            header.description.as_deref(),
            Some("Fetches things.\n\nMore detail.")
        );
        assert_eq!(header.source.len(), source.len());
        assert_eq!(header.source.find("print"), source.find("print"));
        assert!(!header.source.contains("---"));
    }

    #[test]
    fn test_no_header() {
        let header = split_header("a = 1\n---\n");
        assert_eq!(header.description, None);
        assert!(matches!(header.source, Cow::Borrowed(_)));
    }

    #[test]
    fn test_unclosed_header_is_left_alone() {
        let header = split_header("---\nnever closed\n");
        assert_eq!(header.description, None);
    }
}
