use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step into the validated object's schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Child(String),
    Index(usize),
    Key(String),
}

/// Location of a field inside a validated object, e.g. `spec.usages[2]`.
///
/// Paths are values: `child`, `index` and `key` return a new path and leave
/// the receiver untouched, so a parent path can be shared across siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("empty segment at byte {offset} in {path:?}")]
    EmptySegment { path: String, offset: usize },

    #[error("unterminated subscript in {path:?}")]
    UnterminatedSubscript { path: String },

    #[error("unexpected character {found:?} at byte {offset} in {path:?}")]
    UnexpectedChar {
        path: String,
        offset: usize,
        found: char,
    },
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self::root().child(name)
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Child(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.with_segment(PathSegment::Index(index))
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Key(key.into()))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Child(name) if position == 0 => f.write_str(name)?,
                PathSegment::Child(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) if key_needs_quotes(key) => {
                    f.write_str("[\"")?;
                    for ch in key.chars() {
                        if matches!(ch, '"' | '\\') {
                            f.write_str("\\")?;
                        }
                        write!(f, "{ch}")?;
                    }
                    f.write_str("\"]")?;
                }
                PathSegment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

// Keys that would read back as an index, or would not read back at all.
fn key_needs_quotes(key: &str) -> bool {
    key.is_empty() || parses_as_index(key) || key.contains([']', '"', '\\'])
}

fn parses_as_index(subscript: &str) -> bool {
    !subscript.starts_with('+') && subscript.parse::<usize>().is_ok()
}

/// Parses the rendered form back into segments. A leading `.` is accepted so
/// `.spec.request` and `spec.request` name the same field. Bracketed digits
/// are read as list indices; anything else inside brackets, or anything
/// quoted (`["0"]`), is a map key.
impl FromStr for FieldPath {
    type Err = PathParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "<root>" {
            return Ok(Self::root());
        }
        let body = trimmed.strip_prefix('.').unwrap_or(trimmed);
        let base = trimmed.len() - body.len();

        let mut segments = Vec::new();
        let mut chars = body.char_indices().peekable();
        let mut name = String::new();
        let mut name_start = 0;

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '.' => {
                    // `a[0].b` is fine, `a..b` and a trailing dot are not.
                    let after_subscript = matches!(
                        segments.last(),
                        Some(PathSegment::Index(_) | PathSegment::Key(_))
                    );
                    if (name.is_empty() && !after_subscript) || chars.peek().is_none() {
                        return Err(PathParseError::EmptySegment {
                            path: raw.to_string(),
                            offset: base + offset,
                        });
                    }
                    if !name.is_empty() {
                        segments.push(PathSegment::Child(std::mem::take(&mut name)));
                    }
                    name_start = offset + 1;
                }
                '[' => {
                    if !name.is_empty() {
                        segments.push(PathSegment::Child(std::mem::take(&mut name)));
                    } else if segments.is_empty() {
                        return Err(PathParseError::EmptySegment {
                            path: raw.to_string(),
                            offset: base + offset,
                        });
                    }
                    let (segment, closed) = if chars.peek().is_some_and(|&(_, c)| c == '"') {
                        chars.next();
                        read_quoted_key(&mut chars)
                    } else {
                        let mut subscript = String::new();
                        let mut closed = false;
                        for (_, inner) in chars.by_ref() {
                            if inner == ']' {
                                closed = true;
                                break;
                            }
                            subscript.push(inner);
                        }
                        let segment = match subscript.parse::<usize>() {
                            Ok(index) if parses_as_index(&subscript) => PathSegment::Index(index),
                            _ => PathSegment::Key(subscript),
                        };
                        (segment, closed)
                    };
                    if !closed {
                        return Err(PathParseError::UnterminatedSubscript {
                            path: raw.to_string(),
                        });
                    }
                    segments.push(segment);
                    if let Some(&(next_offset, next)) = chars.peek()
                        && next != '.'
                        && next != '['
                    {
                        return Err(PathParseError::UnexpectedChar {
                            path: raw.to_string(),
                            offset: base + next_offset,
                            found: next,
                        });
                    }
                }
                ']' => {
                    return Err(PathParseError::UnexpectedChar {
                        path: raw.to_string(),
                        offset: base + offset,
                        found: ch,
                    });
                }
                other => {
                    if name.is_empty() {
                        name_start = offset;
                    }
                    name.push(other);
                }
            }
        }

        if !name.is_empty() {
            segments.push(PathSegment::Child(name));
        } else if segments.is_empty() {
            return Err(PathParseError::EmptySegment {
                path: raw.to_string(),
                offset: base + name_start,
            });
        }

        Ok(Self { segments })
    }
}

/// Reads `key"]` after an opening `["`; `\` escapes the next character.
/// Returns the key and whether the subscript was properly closed.
fn read_quoted_key(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> (PathSegment, bool) {
    let mut key = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => key.push(escaped),
                None => break,
            },
            '"' => {
                let closed = chars.next().is_some_and(|(_, c)| c == ']');
                return (PathSegment::Key(key), closed);
            }
            other => key.push(other),
        }
    }
    (PathSegment::Key(key), false)
}

impl TryFrom<String> for FieldPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        if path.is_root() {
            String::new()
        } else {
            path.to_string()
        }
    }
}
