//! Minimal XML property list reader
//!
//! Builds a [`Value`] tree from the `<plist>` document iTunes writes.
//! Only the XML flavour is supported; binary plists are rejected by the
//! XML tokenizer as malformed input.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::BufRead;
use thiserror::Error;

/// Structural or lexical problem in a plist document
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PlistError(String);

impl PlistError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A plist value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dict(Dict),
    Array(Vec<Value>),
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// ISO 8601 timestamp, kept as text
    Date(String),
    /// Base64 payload, kept as text
    Data(String),
}

/// Ordered key/value pairs of a `<dict>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict(Vec<(String, Value)>);

impl Dict {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    /// Missing booleans read as false, the way iTunes omits them
    pub fn get_flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl Value {
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Container currently being filled
enum Container {
    Dict {
        entries: Vec<(String, Value)>,
        pending_key: Option<String>,
    },
    Array(Vec<Value>),
}

impl Container {
    fn into_value(self) -> Result<Value, PlistError> {
        match self {
            Container::Dict {
                pending_key: Some(key),
                ..
            } => Err(PlistError::new(format!(
                "<dict> ends after key '{}' without a value",
                key
            ))),
            Container::Dict { entries, .. } => Ok(Value::Dict(Dict(entries))),
            Container::Array(items) => Ok(Value::Array(items)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    Key,
    String,
    Integer,
    Real,
    Date,
    Data,
    True,
    False,
}

impl LeafKind {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        Some(match tag {
            b"key" => LeafKind::Key,
            b"string" => LeafKind::String,
            b"integer" => LeafKind::Integer,
            b"real" => LeafKind::Real,
            b"date" => LeafKind::Date,
            b"data" => LeafKind::Data,
            b"true" => LeafKind::True,
            b"false" => LeafKind::False,
            _ => return None,
        })
    }
}

/// Text-only element being read
struct Leaf {
    kind: LeafKind,
    text: String,
}

enum Finished {
    Key(String),
    Value(Value),
}

impl Leaf {
    fn finish(self) -> Result<Finished, PlistError> {
        let value = match self.kind {
            LeafKind::Key => return Ok(Finished::Key(self.text)),
            LeafKind::String => Value::String(self.text),
            LeafKind::Integer => {
                let parsed = self.text.trim().parse::<i64>().map_err(|_| {
                    PlistError::new(format!("invalid <integer> value '{}'", self.text))
                })?;
                Value::Integer(parsed)
            }
            LeafKind::Real => {
                let parsed = self.text.trim().parse::<f64>().map_err(|_| {
                    PlistError::new(format!("invalid <real> value '{}'", self.text))
                })?;
                Value::Real(parsed)
            }
            LeafKind::Date => Value::Date(self.text.trim().to_string()),
            LeafKind::Data => Value::Data(self.text),
            LeafKind::True => Value::Boolean(true),
            LeafKind::False => Value::Boolean(false),
        };
        Ok(Finished::Value(value))
    }
}

/// Read a complete plist document into a value tree
pub fn read_plist<R: BufRead>(source: R) -> Result<Value, PlistError> {
    let mut reader = Reader::from_reader(source);

    let mut stack: Vec<Container> = Vec::new();
    let mut leaf: Option<Leaf> = None;
    let mut root: Option<Value> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if leaf.is_some() {
                    return Err(PlistError::new(format!(
                        "unexpected <{}> inside a text element",
                        String::from_utf8_lossy(name.as_ref())
                    )));
                }
                match name.as_ref() {
                    b"plist" => {}
                    b"dict" => stack.push(Container::Dict {
                        entries: Vec::new(),
                        pending_key: None,
                    }),
                    b"array" => stack.push(Container::Array(Vec::new())),
                    tag => match LeafKind::from_tag(tag) {
                        Some(kind) => {
                            leaf = Some(Leaf {
                                kind,
                                text: String::new(),
                            })
                        }
                        None => {
                            return Err(PlistError::new(format!(
                                "unknown element <{}>",
                                String::from_utf8_lossy(tag)
                            )))
                        }
                    },
                }
            }

            Ok(Event::Empty(e)) => {
                let name = e.name();
                let finished = match name.as_ref() {
                    b"plist" => None,
                    b"dict" => Some(Finished::Value(Value::Dict(Dict::default()))),
                    b"array" => Some(Finished::Value(Value::Array(Vec::new()))),
                    tag => match LeafKind::from_tag(tag) {
                        Some(kind) => Some(
                            Leaf {
                                kind,
                                text: String::new(),
                            }
                            .finish()?,
                        ),
                        None => {
                            return Err(PlistError::new(format!(
                                "unknown element <{}/>",
                                String::from_utf8_lossy(tag)
                            )))
                        }
                    },
                };
                if let Some(finished) = finished {
                    attach(&mut stack, &mut root, finished)?;
                }
            }

            Ok(Event::Text(e)) => {
                if let Some(ref mut leaf) = leaf {
                    let text = e
                        .unescape()
                        .map_err(|err| PlistError::new(format!("invalid text: {}", err)))?;
                    leaf.text.push_str(&text);
                }
            }

            Ok(Event::CData(e)) => {
                if let Some(ref mut leaf) = leaf {
                    leaf.text.push_str(&String::from_utf8_lossy(&e));
                }
            }

            Ok(Event::End(e)) => {
                let name = e.name();
                match name.as_ref() {
                    b"plist" => {}
                    b"dict" | b"array" => {
                        let container = stack
                            .pop()
                            .ok_or_else(|| PlistError::new("unbalanced closing tag"))?;
                        let value = container.into_value()?;
                        attach(&mut stack, &mut root, Finished::Value(value))?;
                    }
                    _ => {
                        let finished = leaf
                            .take()
                            .ok_or_else(|| PlistError::new("unbalanced closing tag"))?
                            .finish()?;
                        attach(&mut stack, &mut root, finished)?;
                    }
                }
            }

            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PlistError::new(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            // Declaration, doctype, comments, processing instructions
            _ => {}
        }

        buf.clear();
    }

    if !stack.is_empty() || leaf.is_some() {
        return Err(PlistError::new("unexpected end of document"));
    }

    root.ok_or_else(|| PlistError::new("document contains no plist value"))
}

/// Hand a finished key or value to the enclosing container
fn attach(
    stack: &mut [Container],
    root: &mut Option<Value>,
    finished: Finished,
) -> Result<(), PlistError> {
    match (stack.last_mut(), finished) {
        (Some(Container::Dict { pending_key, .. }), Finished::Key(key)) => {
            if let Some(previous) = pending_key {
                return Err(PlistError::new(format!(
                    "key '{}' has no value before key '{}'",
                    previous, key
                )));
            }
            *pending_key = Some(key);
            Ok(())
        }
        (_, Finished::Key(key)) => Err(PlistError::new(format!(
            "key '{}' outside of a <dict>",
            key
        ))),
        (
            Some(Container::Dict {
                entries,
                pending_key,
            }),
            Finished::Value(value),
        ) => {
            let key = pending_key
                .take()
                .ok_or_else(|| PlistError::new("<dict> value without a preceding <key>"))?;
            entries.push((key, value));
            Ok(())
        }
        (Some(Container::Array(items)), Finished::Value(value)) => {
            items.push(value);
            Ok(())
        }
        (None, Finished::Value(value)) => {
            if root.is_some() {
                return Err(PlistError::new("more than one root value"));
            }
            *root = Some(value);
            Ok(())
        }
    }
}
