//! Deserialization of expressions from XML elements.
//!
//! Each expression type implements [`FromElement`] and claims only elements
//! carrying its own name in the fes namespace. [`ExpressionParser`] tries the
//! types in a fixed order and returns the first match.

mod common;
mod expressions;

pub use common::FromElement;
use thiserror::Error;

use crate::expressions::{Expression, Function, Literal, ValueReference};
use crate::validators::ValidationError;
use crate::xml::{QName, XmlElement, XmlError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Xml(#[from] XmlError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Element {0} is not a Filter Encoding expression")]
    Unrecognized(QName),
}

type Candidate = fn(&XmlElement) -> Result<Option<Expression>, ValidationError>;

fn candidate<T: FromElement + Into<Expression>>(
    element: &XmlElement,
) -> Result<Option<Expression>, ValidationError> {
    Ok(T::from_element(element)?.map(Into::into))
}

/// Builds an [`Expression`] of whichever type matches an XML element.
pub struct ExpressionParser;

impl ExpressionParser {
    /// Expression types in the order they are tried. The first one to
    /// claim an element wins.
    const CANDIDATES: &'static [Candidate] = &[
        candidate::<ValueReference>,
        candidate::<Literal>,
        candidate::<Function>,
    ];

    /// Parse `element` as an expression.
    ///
    /// Returns `Ok(None)` when no expression type claims the element; that
    /// is not an error at this level. Invalid content in a claimed element
    /// (a malformed property or function name) is.
    pub fn parse(element: &XmlElement) -> Result<Option<Expression>, ValidationError> {
        for candidate in Self::CANDIDATES {
            if let Some(expression) = candidate(element)? {
                return Ok(Some(expression));
            }
        }
        log::debug!("No expression type matches {}", element.name);
        Ok(None)
    }

    /// Parse XML text and then its root element as an expression.
    pub fn parse_str(text: &str) -> Result<Option<Expression>, ParseError> {
        let element = XmlElement::parse(text)?;
        Ok(Self::parse(&element)?)
    }
}

/// Parse XML text into an expression, treating an unrecognised root
/// element as an error.
pub fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    let element = XmlElement::parse(text)?;
    ExpressionParser::parse(&element)?.ok_or(ParseError::Unrecognized(element.name))
}
