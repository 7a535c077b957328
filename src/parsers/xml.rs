//! XML parser.
//!
//! Maps an XML document onto the value model the way xmltodict does:
//!
//! - every element with attributes or child elements becomes an Object
//! - attributes become keys prefixed with `@`, in document order
//! - element text alongside attributes or children lands under `#text`
//! - a text-only element collapses to a typed scalar
//! - repeated sibling tags collapse into an Array under that tag
//! - CDATA is kept verbatim as a string
//! - namespace prefixes are stripped by default

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::Parser;

/// Parser for XML input.
#[derive(Debug, Clone, Copy)]
pub struct XmlParser {
    strip_namespaces: bool,
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlParser {
    /// Creates a parser that strips namespace prefixes from tag and
    /// attribute names (`soap:Body` parses as `Body`).
    #[must_use]
    pub const fn new() -> Self {
        XmlParser {
            strip_namespaces: true,
        }
    }

    /// Keeps namespace prefixes as part of the key strings.
    #[must_use]
    pub const fn preserve_namespaces() -> Self {
        XmlParser {
            strip_namespaces: false,
        }
    }

    fn tag_name(&self, raw: &[u8]) -> std::result::Result<String, ParseError> {
        let name = std::str::from_utf8(raw)
            .map_err(|e| ParseError::new("xml", format!("invalid UTF-8 in tag name: {e}")))?;
        Ok(if self.strip_namespaces {
            name.rsplit(':').next().unwrap_or(name).to_string()
        } else {
            name.to_string()
        })
    }

    /// Collect `@`-prefixed attribute entries for an element.
    fn read_attributes(
        &self,
        element: &BytesStart<'_>,
        fields: &mut ValueMap,
    ) -> std::result::Result<(), ParseError> {
        for attr in element.attributes() {
            let attr =
                attr.map_err(|e| ParseError::new("xml", format!("malformed attribute: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::new("xml", format!("invalid UTF-8 in attribute: {e}")))?;

            if self.strip_namespaces && (key == "xmlns" || key.starts_with("xmlns:")) {
                continue;
            }
            let key = if self.strip_namespaces {
                key.rsplit(':').next().unwrap_or(key)
            } else {
                key
            };

            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::new("xml", format!("bad attribute value: {e}")))?;
            // Attribute values stay strings; only element text is typed.
            fields.insert(format!("@{key}"), Value::String(value.into_owned()));
        }
        Ok(())
    }
}

/// An element whose closing tag has not been seen yet.
struct OpenElement {
    name: String,
    fields: ValueMap,
    text: String,
    has_text: bool,
    cdata: bool,
}

impl OpenElement {
    fn new(name: String, fields: ValueMap) -> Self {
        OpenElement {
            name,
            fields,
            text: String::new(),
            has_text: false,
            cdata: false,
        }
    }

    /// Collapse the finished element into a value.
    fn finalize(self) -> Value {
        let text_value = if self.has_text {
            if self.cdata {
                Some(Value::String(self.text))
            } else {
                Some(typed_scalar(&self.text))
            }
        } else {
            None
        };

        if self.fields.is_empty() {
            return text_value.unwrap_or(Value::Null);
        }

        let mut fields = self.fields;
        if let Some(text) = text_value {
            fields.insert("#text".to_string(), text);
        }
        Value::Object(fields)
    }
}

/// Append a finished child, collapsing repeated sibling tags into arrays.
fn add_child(fields: &mut ValueMap, name: String, child: Value) {
    if let Some(existing) = fields.get_mut(&name) {
        if let Value::Array(arr) = existing {
            arr.push(child);
        } else {
            let prev = std::mem::take(existing);
            *existing = Value::Array(vec![prev, child]);
        }
    } else {
        fields.insert(name, child);
    }
}

/// Type element text the way the other self-describing parsers would.
fn typed_scalar(text: &str) -> Value {
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(Number::Integer(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() {
            return Value::Number(Number::Float(f));
        }
    }
    Value::String(text.to_string())
}

impl Parser for XmlParser {
    fn format_name(&self) -> &'static str {
        "xml"
    }

    fn parse(&self, input: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(input)
            .map_err(|e| ParseError::new("xml", format!("invalid UTF-8: {e}")))?;

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<OpenElement> = Vec::new();

        loop {
            let position = reader.buffer_position() as usize;
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = self.tag_name(e.name().as_ref())?;
                    let mut fields = ValueMap::new();
                    self.read_attributes(&e, &mut fields)?;
                    stack.push(OpenElement::new(name, fields));
                }
                Ok(Event::Empty(e)) => {
                    let name = self.tag_name(e.name().as_ref())?;
                    let mut fields = ValueMap::new();
                    self.read_attributes(&e, &mut fields)?;
                    let value = OpenElement::new(name.clone(), fields).finalize();
                    match stack.last_mut() {
                        Some(parent) => add_child(&mut parent.fields, name, value),
                        None => return Ok(singleton(name, value)),
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        let name = element.name.clone();
                        let value = element.finalize();
                        match stack.last_mut() {
                            Some(parent) => add_child(&mut parent.fields, name, value),
                            None => return Ok(singleton(name, value)),
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| {
                        ParseError::at_offset("xml", position, err.to_string())
                    })?;
                    if !text.is_empty() {
                        if let Some(element) = stack.last_mut() {
                            element.text.push_str(&text);
                            element.has_text = true;
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&text);
                        element.has_text = true;
                        element.cdata = true;
                    }
                }
                Ok(Event::Eof) => {
                    if stack.is_empty() {
                        return Err(ParseError::new("xml", "no root element").into());
                    }
                    return Err(ParseError::at_offset(
                        "xml",
                        position,
                        format!("unclosed element <{}>", stack[stack.len() - 1].name),
                    )
                    .into());
                }
                Err(e) => {
                    return Err(ParseError::at_offset("xml", position, e.to_string()).into())
                }
                // Declarations, comments, doctype and processing
                // instructions carry no data.
                _ => {}
            }
        }
    }
}

fn singleton(name: String, value: Value) -> Value {
    let mut root = ValueMap::new();
    root.insert(name, value);
    Value::Object(root)
}
