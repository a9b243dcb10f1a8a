//! Field paths: a small query language for pulling values out of records.
//!
//! ```text
//! $.name              attribute
//! $.custom_domains.*  every element of a sequence
//! $.resources.*.name  attribute of every element
//! $.["suspended", "schedule"]  one composite value holding both attributes
//! $.orgs[0]           sequence index
//! ```

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path must start with '$': {0:?}")]
    MissingRoot(String),

    #[error("unexpected character {found:?} at offset {offset} in {path:?}")]
    Unexpected {
        path: String,
        offset: usize,
        found: char,
    },

    #[error("unexpected end of path in {0:?}")]
    UnexpectedEnd(String),

    #[error("empty key list in {0:?}")]
    EmptyTuple(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Wildcard,
    Tuple(Vec<String>),
    Index(usize),
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    source: String,
    segments: Vec<Segment>,
    resolvable: bool,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        Parser::new(path).parse()
    }

    /// A path that never resolves to anything. Used for path strings that
    /// failed to parse.
    pub fn unresolvable(source: &str) -> Self {
        Self {
            source: source.to_string(),
            segments: Vec::new(),
            resolvable: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate against a record. Missing attributes produce an empty
    /// sequence; `null` values that are present are kept.
    pub fn extract(&self, record: &Value) -> Vec<Value> {
        if !self.resolvable {
            return Vec::new();
        }
        let mut current: Vec<&Value> = vec![record];
        let mut composites: Vec<Value> = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            let mut next: Vec<&Value> = Vec::new();
            match segment {
                Segment::Key(key) => {
                    for value in &current {
                        if let Some(v) = value.as_object().and_then(|m| m.get(key)) {
                            next.push(v);
                        }
                    }
                }
                Segment::Wildcard => {
                    for value in &current {
                        match value {
                            Value::Array(items) => next.extend(items.iter()),
                            Value::Object(map) => next.extend(map.values()),
                            _ => {}
                        }
                    }
                }
                Segment::Index(idx) => {
                    for value in &current {
                        if let Some(v) = value.as_array().and_then(|a| a.get(*idx)) {
                            next.push(v);
                        }
                    }
                }
                Segment::Tuple(keys) => {
                    // Composite values are owned; anything after a tuple applies to them.
                    for value in &current {
                        if let Some(map) = value.as_object() {
                            let tuple = keys
                                .iter()
                                .map(|k| map.get(k).cloned().unwrap_or(Value::Null))
                                .collect();
                            composites.push(Value::Array(tuple));
                        }
                    }
                    let rest = FieldPath {
                        source: self.source.clone(),
                        segments: self.segments[i + 1..].to_vec(),
                        resolvable: true,
                    };
                    return composites.iter().flat_map(|c| rest.extract(c)).collect();
                }
            }
            current = next;
        }

        current.into_iter().cloned().collect()
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse `path` and evaluate it against `record`; a malformed path yields
/// nothing.
pub fn extract(record: &Value, path: &str) -> Vec<Value> {
    FieldPath::parse(path)
        .map(|p| p.extract(record))
        .unwrap_or_default()
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<FieldPath, PathError> {
        if self.peek() != Some('$') {
            return Err(PathError::MissingRoot(self.source.to_string()));
        }
        self.pos += 1;

        let mut segments = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    match self.peek() {
                        Some('*') => {
                            self.pos += 1;
                            segments.push(Segment::Wildcard);
                        }
                        Some('[') => segments.push(self.tuple()?),
                        Some(_) => segments.push(Segment::Key(self.name()?)),
                        None => return Err(self.end()),
                    }
                }
                '[' => segments.push(self.bracket()?),
                other => return Err(self.unexpected(other)),
            }
        }

        Ok(FieldPath {
            source: self.source.to_string(),
            segments,
            resolvable: true,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn end(&self) -> PathError {
        PathError::UnexpectedEnd(self.source.to_string())
    }

    fn unexpected(&self, found: char) -> PathError {
        PathError::Unexpected {
            path: self.source.to_string(),
            offset: self.pos,
            found,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn name(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn quoted(&mut self, quote: char) -> Result<String, PathError> {
        self.pos += 1;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let key = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(key);
            }
            self.pos += 1;
        }
        Err(self.end())
    }

    fn key(&mut self) -> Result<String, PathError> {
        self.skip_whitespace();
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.quoted(q),
            Some(_) => self.name(),
            None => Err(self.end()),
        }
    }

    /// `[` after a dot: always a tuple of keys.
    fn tuple(&mut self) -> Result<Segment, PathError> {
        self.pos += 1;
        let mut keys = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') && keys.is_empty() {
                return Err(PathError::EmptyTuple(self.source.to_string()));
            }
            keys.push(self.key()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Segment::Tuple(keys));
                }
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(self.end()),
            }
        }
    }

    /// `[` directly after a segment: an index, `*`, or a single quoted key.
    fn bracket(&mut self) -> Result<Segment, PathError> {
        self.pos += 1;
        self.skip_whitespace();
        let segment = match self.peek() {
            Some('*') => {
                self.pos += 1;
                Segment::Wildcard
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits: String = self.chars[start..self.pos].iter().collect();
                let idx = digits
                    .parse()
                    .map_err(|_| self.unexpected(self.chars[start]))?;
                Segment::Index(idx)
            }
            Some(q @ ('"' | '\'')) => Segment::Key(self.quoted(q)?),
            Some(c) => return Err(self.unexpected(c)),
            None => return Err(self.end()),
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(segment)
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(self.end()),
        }
    }
}
