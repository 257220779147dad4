//! A small owned XML element model.
//!
//! Only what expressions need is kept: a namespace-qualified name, the
//! attributes, the leading text content and the child elements. Documents
//! are read with `roxmltree` and written with `quick-xml`.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::namespaces::{self, NAMESPACES};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("XML write error: {0}")]
    Write(String),
    #[error("No prefix registered for attribute namespace '{0}'")]
    UnknownNamespace(String),
}

/// A (namespace URI, local name) pair, independent of prefix spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local_name: local_name.into(),
        }
    }

    /// A name in the Filter Encoding namespace.
    pub fn fes(local_name: impl Into<String>) -> Self {
        Self::new(Some(namespaces::FES), local_name)
    }

    /// A name with no namespace.
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        Self::new(None, local_name)
    }

    pub fn matches(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// The `prefix:local` spelling, if the namespace has a registered prefix.
    fn prefixed(&self) -> Option<String> {
        match &self.namespace {
            None => Some(self.local_name.clone()),
            Some(uri) => namespaces::prefix(uri).map(|p| format!("{p}:{}", self.local_name)),
        }
    }
}

/// Clark notation: `{uri}local`, or just `local` without a namespace.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: QName,
    pub attributes: Vec<(QName, String)>,
    /// Text before the first child element.
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get an unqualified attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.namespace.is_none() && n.local_name == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an unqualified attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.namespace.is_none() && n.local_name == name)
        {
            Some((_, v)) => *v = value,
            None => self.attributes.push((QName::unqualified(name), value)),
        }
    }

    /// Parse an XML document and return its root element.
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self::from(doc.root_element()))
    }

    /// Render the element as indented XML text (two spaces per level,
    /// trailing newline, no XML declaration).
    ///
    /// The root element declares every prefix from the namespace table;
    /// elements in a namespace without a prefix get a default namespace
    /// declaration instead.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer, true, None)?;
        let mut output =
            String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
        output.push('\n');
        Ok(output)
    }

    fn write_to<'a, W: Write>(
        &'a self,
        writer: &mut Writer<W>,
        root: bool,
        default_ns: Option<&'a str>,
    ) -> Result<(), XmlError> {
        let element_ns = self.name.namespace.as_deref();
        let prefix = element_ns.and_then(namespaces::prefix);
        let tag = match prefix {
            Some(prefix) => format!("{prefix}:{}", self.name.local_name),
            None => self.name.local_name.clone(),
        };

        let mut start = BytesStart::new(tag.as_str());
        if root {
            for (prefix, uri) in NAMESPACES {
                start.push_attribute((format!("xmlns:{prefix}").as_str(), *uri));
            }
        }
        let default_ns = match (element_ns, prefix) {
            (Some(_), Some(_)) => default_ns,
            (None, _) => {
                if default_ns.is_some() {
                    start.push_attribute(("xmlns", ""));
                }
                None
            }
            (Some(uri), None) => {
                if default_ns != Some(uri) {
                    start.push_attribute(("xmlns", uri));
                }
                Some(uri)
            }
        };

        for (name, value) in &self.attributes {
            let key = name.prefixed().ok_or_else(|| {
                XmlError::UnknownNamespace(name.namespace.clone().unwrap_or_default())
            })?;
            let value = escape_attribute(value);
            start.push_attribute((key.as_bytes(), value.as_bytes()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        if let Some(text) = &self.text {
            write_event(writer, Event::Text(BytesText::from_escaped(escape_text(text))))?;
        }
        for child in &self.children {
            child.write_to(writer, false, default_ns)?;
        }
        write_event(writer, Event::End(BytesEnd::new(tag.as_str())))
    }
}

/// Escape markup and write `\r` as a character reference, so that line-end
/// normalization on reading gives back the same text.
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = escape(text);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}

/// Escape markup and write `\t`, `\n` and `\r` as character references,
/// which attribute-value normalization would otherwise turn into spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

impl From<roxmltree::Node<'_, '_>> for XmlElement {
    fn from(node: roxmltree::Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        Self {
            name: QName::new(tag.namespace(), tag.name()),
            attributes: node
                .attributes()
                .map(|a| (QName::new(a.namespace(), a.name()), a.value().to_string()))
                .collect(),
            text: node.text().map(str::to_string),
            children: node
                .children()
                .filter(|n| n.is_element())
                .map(XmlElement::from)
                .collect(),
        }
    }
}
