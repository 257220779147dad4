//! Output expressions as XML, and in a compact one-line text form.

pub mod expressions;

pub use expressions::escaped;

use crate::xml::{XmlElement, XmlError};

/// A trait for expression types that can be written as an XML element.
///
/// Implementors only build the element; [`serialize`](ToElement::serialize)
/// is shared and renders it as indented XML text.
pub trait ToElement {
    fn to_element(&self) -> XmlElement;

    fn serialize(&self) -> Result<String, XmlError> {
        self.to_element().to_xml_string()
    }
}
