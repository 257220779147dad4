use std::fmt;

use super::ToElement;
use crate::expressions::{Expression, Function, Literal, ValueReference};
use crate::xml::{QName, XmlElement};

// Text form, used by `Display`:
// $… for value reference
// '…' for literal, '…':type when typed
// …(…) for function call

impl ToElement for ValueReference {
    fn to_element(&self) -> XmlElement {
        XmlElement::new(QName::fes(Self::XML_ENTITY_NAME)).with_text(self.value())
    }
}

impl ToElement for Literal {
    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new(QName::fes(Self::XML_ENTITY_NAME));
        if let Some(t) = self.literal_type() {
            element.set_attribute("type", t);
        }
        if !self.raw_value().is_empty() {
            element.text = Some(self.raw_value().to_string());
        }
        element
    }
}

impl ToElement for Function {
    fn to_element(&self) -> XmlElement {
        let mut element =
            XmlElement::new(QName::fes(Self::XML_ENTITY_NAME)).with_attribute("name", self.name());
        element.children = self.arguments().iter().map(|a| a.to_element()).collect();
        element
    }
}

impl ToElement for Expression {
    fn to_element(&self) -> XmlElement {
        match self {
            Expression::ValueReference(v) => v.to_element(),
            Expression::Literal(l) => l.to_element(),
            Expression::Function(f) => f.to_element(),
        }
    }
}

/// Escape backslashes and single quotes for a quoted literal.
pub fn escaped(s: &str) -> impl fmt::Display + '_ {
    struct Escaped<'a>(&'a str);

    impl fmt::Display for Escaped<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for c in self.0.chars() {
                match c {
                    '\\' | '\'' => write!(f, "\\{c}")?,
                    '\n' => write!(f, "\\n")?,
                    '\t' => write!(f, "\\t")?,
                    _ => write!(f, "{c}")?,
                }
            }
            Ok(())
        }
    }

    Escaped(s)
}

impl fmt::Display for ValueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.value())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", escaped(self.raw_value()))?;
        if let Some(t) = self.literal_type() {
            write!(f, ":{t}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, argument) in self.arguments().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{argument}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::ValueReference(v) => fmt::Display::fmt(v, f),
            Expression::Literal(l) => fmt::Display::fmt(l, f),
            Expression::Function(func) => fmt::Display::fmt(func, f),
        }
    }
}
