#![doc = include_str!("../API.md")]

pub mod expressions;
pub mod namespaces;
pub mod parser;
pub mod textify;
pub mod validators;
pub mod xml;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types for easier access
pub use expressions::{Expression, Function, Literal, LiteralValue, ValueReference};
pub use parser::{ExpressionParser, FromElement, ParseError};
pub use textify::ToElement;
pub use validators::ValidationError;
pub use xml::{QName, XmlElement, XmlError};

/// Parse a Filter Encoding expression from XML text.
///
/// This is the main entry point for reading expressions. The root element
/// must be a `fes:ValueReference`, `fes:Literal` or `fes:Function`.
///
/// # Example
/// ```rust
/// use fes_expression::parse;
///
/// let xml = r#"
/// <fes:Function xmlns:fes="http://www.opengis.net/fes/2.0" name="add">
///   <fes:ValueReference>population</fes:ValueReference>
///   <fes:Literal>5</fes:Literal>
/// </fes:Function>
/// "#;
///
/// let expression = parse(xml).unwrap();
/// assert_eq!(expression.to_string(), "add($population, '5')");
/// ```
///
/// # Errors
///
/// Returns a `ParseError` if the text is not well-formed XML, if the root
/// element is not an expression, or if a property or function name in it
/// fails validation.
///
/// ```rust
/// use fes_expression::{parse, ParseError};
///
/// let xml = r#"<fes:Bogus xmlns:fes="http://www.opengis.net/fes/2.0"/>"#;
/// assert!(matches!(parse(xml), Err(ParseError::Unrecognized(_))));
/// ```
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    parser::parse_expression(input)
}

/// Serialize an expression as indented XML text.
///
/// # Example
/// ```rust
/// use fes_expression::{serialize, Expression, Literal};
///
/// let text = serialize(&Expression::from(Literal::new("5"))).unwrap();
/// assert!(text.contains(">5</fes:Literal>"));
/// ```
pub fn serialize(expression: &Expression) -> Result<String, XmlError> {
    expression.serialize()
}
