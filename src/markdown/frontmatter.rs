//! YAML frontmatter codec.
//!
//! Artifact files are markdown documents that optionally begin with a YAML
//! block delimited by `---` lines:
//!
//! ```text
//! ---
//! description: Review code changes
//! model: sonnet
//! ---
//!
//! Review the staged diff and point out problems.
//! ```
//!
//! The opening delimiter must be the very first line (`---\n` or `---\r\n`).
//! The closing delimiter is the next line consisting of exactly `---`, so a
//! YAML scalar containing three dashes mid-line never ends the block. One blank
//! separator line after the closing delimiter belongs to the frontmatter and is
//! not part of the body.
//!
//! Parsing goes through [`serde_yaml::Value`] first so that an empty block
//! (`---\n---\n`) or a block holding only comments yields `T::default()`.

use crate::core::AixError;
use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::BufRead;

/// Result of splitting and decoding a markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// Decoded metadata, or `T::default()` when the document has none
    pub metadata: T,
    /// Markdown body with line endings normalized to `\n`
    pub body: String,
    /// Whether a complete frontmatter block was present
    pub has_frontmatter: bool,
}

/// Raw split of a document into its YAML region and body.
struct Split<'a> {
    yaml: &'a str,
    body: &'a str,
}

enum SplitOutcome<'a> {
    /// Document does not start with a delimiter line
    NoOpening,
    /// Opening delimiter present but no closing line
    Unclosed,
    Closed(Split<'a>),
}

fn opening_len(content: &str) -> Option<usize> {
    if content.starts_with("---\n") {
        Some(4)
    } else if content.starts_with("---\r\n") {
        Some(5)
    } else {
        None
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\n').trim_end_matches('\r') == "---"
}

fn split(content: &str) -> SplitOutcome<'_> {
    let Some(start) = opening_len(content) else {
        return SplitOutcome::NoOpening;
    };

    let mut pos = start;
    for line in content[start..].split_inclusive('\n') {
        if is_delimiter(line) {
            let yaml = &content[start..pos];
            let mut body = &content[pos + line.len()..];
            if let Some(rest) = body.strip_prefix("\r\n") {
                body = rest;
            } else if let Some(rest) = body.strip_prefix('\n') {
                body = rest;
            }
            return SplitOutcome::Closed(Split {
                yaml,
                body,
            });
        }
        pos += line.len();
    }

    SplitOutcome::Unclosed
}

fn decode<T>(yaml: &str, source: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| AixError::InvalidYaml {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

    if value.is_null() {
        return Ok(T::default());
    }

    let metadata = serde_yaml::from_value(value).map_err(|e| AixError::InvalidYaml {
        path: source.to_string(),
        reason: e.to_string(),
    })?;
    Ok(metadata)
}

fn normalize_body(body: &str) -> String {
    body.replace("\r\n", "\n")
}

/// Parse a document whose frontmatter is optional.
///
/// A document without an opening delimiter, or with an opening delimiter that
/// is never closed, is returned whole as the body with default metadata.
/// `source` names the document in error messages.
pub fn parse<T>(content: &str, source: &str) -> Result<Parsed<T>>
where
    T: DeserializeOwned + Default,
{
    match split(content) {
        SplitOutcome::NoOpening | SplitOutcome::Unclosed => Ok(Parsed {
            metadata: T::default(),
            body: normalize_body(content),
            has_frontmatter: false,
        }),
        SplitOutcome::Closed(split) => Ok(Parsed {
            metadata: decode(split.yaml, source)?,
            body: normalize_body(split.body),
            has_frontmatter: true,
        }),
    }
}

/// Parse a document that must carry frontmatter.
///
/// Fails with [`AixError::MissingFrontmatter`] when the first line is not a
/// delimiter and [`AixError::MissingFrontmatterClose`] when the block is not closed.
pub fn must_parse<T>(content: &str, source: &str) -> Result<Parsed<T>>
where
    T: DeserializeOwned + Default,
{
    match split(content) {
        SplitOutcome::NoOpening => Err(AixError::MissingFrontmatter {
            path: source.to_string(),
        }
        .into()),
        SplitOutcome::Unclosed => Err(AixError::MissingFrontmatterClose {
            path: source.to_string(),
        }
        .into()),
        SplitOutcome::Closed(split) => Ok(Parsed {
            metadata: decode(split.yaml, source)?,
            body: normalize_body(split.body),
            has_frontmatter: true,
        }),
    }
}

/// Decode only the frontmatter, reading no further than the closing delimiter.
///
/// Used by listing operations so that bodies are never read. Follows the
/// optional semantics of [`parse`]: a missing or unclosed block yields
/// `T::default()`.
pub fn parse_header<T, R>(mut reader: R, source: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    R: BufRead,
{
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line != "---\n" && line != "---\r\n" {
        return Ok(T::default());
    }

    let mut yaml = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(T::default());
        }
        if is_delimiter(&line) {
            break;
        }
        yaml.push_str(&line);
    }

    decode(&yaml, source)
}

/// Emit `metadata` as a frontmatter block followed by `body`.
///
/// The output is `---\n<yaml>---\n\n<body>` with a trailing newline appended to
/// the body when missing. An empty body produces `---\n<yaml>---\n` only.
pub fn format<T: Serialize>(metadata: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(metadata)?;

    let mut out = String::with_capacity(yaml.len() + body.len() + 10);
    out.push_str("---\n");
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("---\n");

    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok(out)
}

/// Whether `metadata` serializes to an empty mapping (or nothing at all).
pub fn is_empty_metadata<T: Serialize>(metadata: &T) -> Result<bool> {
    let value = serde_yaml::to_value(metadata)?;
    Ok(match value {
        serde_yaml::Value::Null => true,
        serde_yaml::Value::Mapping(map) => map.is_empty(),
        _ => false,
    })
}

/// Serialize an artifact file: frontmatter plus body, or the bare body when
/// the metadata is empty.
pub fn render<T: Serialize>(metadata: &T, body: &str) -> Result<String> {
    if is_empty_metadata(metadata)? {
        let mut out = body.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    } else {
        format(metadata, body)
    }
}
