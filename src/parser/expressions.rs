use crate::expressions::{Function, Literal, ValueReference};
use crate::validators::ValidationError;
use crate::xml::XmlElement;

use super::{ExpressionParser, FromElement};

impl FromElement for ValueReference {
    fn entity_name() -> &'static str {
        ValueReference::XML_ENTITY_NAME
    }

    fn parse_element(element: &XmlElement) -> Result<Self, ValidationError> {
        // No text reads as the empty string, which is never a valid path.
        ValueReference::new(element.text.clone().unwrap_or_default())
    }
}

impl FromElement for Literal {
    fn entity_name() -> &'static str {
        Literal::XML_ENTITY_NAME
    }

    fn parse_element(element: &XmlElement) -> Result<Self, ValidationError> {
        let mut literal = Literal::new(element.text.clone().unwrap_or_default());
        literal.set_literal_type(element.attribute("type").map(str::to_string));
        Ok(literal)
    }
}

impl FromElement for Function {
    fn entity_name() -> &'static str {
        Function::XML_ENTITY_NAME
    }

    fn parse_element(element: &XmlElement) -> Result<Self, ValidationError> {
        let name = element.attribute("name").unwrap_or_default();
        Function::from_elements(name, &element.children)
    }
}

impl Function {
    /// Build a function whose arguments are parsed from `elements`.
    ///
    /// Each element goes through [`ExpressionParser`], so arguments can be
    /// any expression, nested functions included. Elements that are not
    /// expressions are logged and left out; the function is still built
    /// from the remaining ones. Invalid expression content is an error.
    pub fn from_elements<'a>(
        name: impl Into<String>,
        elements: impl IntoIterator<Item = &'a XmlElement>,
    ) -> Result<Self, ValidationError> {
        let mut function = Function::new(name, Vec::new())?;
        for element in elements {
            match ExpressionParser::parse(element)? {
                Some(argument) => function.push_argument(argument),
                None => log::warn!(
                    "Dropping argument {} of function '{}': not an expression",
                    element.name,
                    function.name()
                ),
            }
        }
        Ok(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::{LiteralValue, XS_DATE};
    use crate::xml::QName;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_value_reference_from_element() {
        let el = XmlElement::new(QName::fes("ValueReference")).with_text("gml:name");
        let v = ValueReference::from_element(&el).unwrap().unwrap();
        assert_eq!(v.value(), "gml:name");
    }

    #[test]
    fn test_value_reference_invalid_content() {
        init_logging();
        let el = XmlElement::new(QName::fes("ValueReference")).with_text("no good");
        assert!(ValueReference::from_element(&el).is_err());

        let empty = XmlElement::new(QName::fes("ValueReference"));
        assert!(ValueReference::from_element(&empty).is_err());
    }

    #[test]
    fn test_wrong_namespace_is_declined() {
        init_logging();
        let el = XmlElement::new(QName::new(Some("urn:other"), "ValueReference")).with_text("a");
        assert_eq!(ValueReference::from_element(&el).unwrap(), None);

        let el = XmlElement::new(QName::unqualified("Literal")).with_text("a");
        assert_eq!(Literal::from_element(&el).unwrap(), None);
    }

    #[test]
    fn test_literal_from_element() {
        let el = XmlElement::new(QName::fes("Literal"))
            .with_attribute("type", XS_DATE)
            .with_text("2020-01-15T00:00:00");
        let lit = Literal::from_element(&el).unwrap().unwrap();
        assert_eq!(lit.literal_type(), Some(XS_DATE));
        assert!(matches!(lit.value().unwrap(), LiteralValue::DateTime(_)));

        let empty = XmlElement::new(QName::fes("Literal"));
        let lit = Literal::from_element(&empty).unwrap().unwrap();
        assert_eq!(lit.raw_value(), "");
        assert_eq!(lit.literal_type(), None);
    }

    #[test]
    fn test_function_drops_non_expressions() {
        init_logging();
        let elements = [
            XmlElement::new(QName::fes("Bogus")),
            XmlElement::new(QName::fes("Literal")).with_text("5"),
        ];
        let f = Function::from_elements("myFunc", &elements).unwrap();
        assert_eq!(f.arguments().len(), 1);
        assert_eq!(f.arguments()[0].as_literal().unwrap().raw_value(), "5");
    }

    #[test]
    fn test_function_without_name() {
        let el = XmlElement::new(QName::fes("Function"));
        let err = Function::from_element(&el).unwrap_err();
        assert_eq!(err.rule, "gml name");
    }
}
