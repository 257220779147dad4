use crate::namespaces;
use crate::validators::ValidationError;
use crate::xml::XmlElement;

use super::ParseError;

/// A trait for building an expression type from an XML element.
///
/// Implementors name the element they are parsed from; [`from_element`]
/// checks the element's qualified name and only calls [`parse_element`] on
/// a match. A name mismatch is not an error: it means "not this type", and
/// the caller is free to try another.
///
/// [`from_element`]: FromElement::from_element
/// [`parse_element`]: FromElement::parse_element
pub trait FromElement: Sized {
    // The local name, in the fes namespace, this type is parsed from.
    fn entity_name() -> &'static str;

    // Build an instance from an element already known to carry the right
    // name. Validation failures of the element's content are returned.
    fn parse_element(element: &XmlElement) -> Result<Self, ValidationError>;

    fn from_element(element: &XmlElement) -> Result<Option<Self>, ValidationError> {
        if !element.name.matches(namespaces::FES, Self::entity_name()) {
            log::debug!("Not a fes:{}: {}", Self::entity_name(), element.name);
            return Ok(None);
        }
        Self::parse_element(element).map(Some)
    }

    fn parse_str(text: &str) -> Result<Option<Self>, ParseError> {
        let element = XmlElement::parse(text)?;
        Ok(Self::from_element(&element)?)
    }
}
