//! The Filter Encoding expression model: value references, literals and
//! function calls.
//!
//! Fields with constraints are private and assigned through setters that
//! run the relevant validators first; a rejected value leaves the previous
//! one in place.

use chrono::NaiveDateTime;

use crate::validators::{
    ValidationError, Validator, gml_name_validator, gml_property_name_validator,
};

/// The `type` attribute value that marks a literal as a date/time.
pub const XS_DATE: &str = "xs:date";

/// Format of `xs:date` literals, both when reading and when storing a
/// [`NaiveDateTime`].
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A value-producing term of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    ValueReference(ValueReference),
    Literal(Literal),
    Function(Function),
}

impl Expression {
    /// The local name of this expression's XML element.
    pub fn xml_entity_name(&self) -> &'static str {
        match self {
            Expression::ValueReference(_) => ValueReference::XML_ENTITY_NAME,
            Expression::Literal(_) => Literal::XML_ENTITY_NAME,
            Expression::Function(_) => Function::XML_ENTITY_NAME,
        }
    }

    pub fn as_value_reference(&self) -> Option<&ValueReference> {
        match self {
            Expression::ValueReference(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expression::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Expression::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl From<ValueReference> for Expression {
    fn from(v: ValueReference) -> Self {
        Expression::ValueReference(v)
    }
}

impl From<Literal> for Expression {
    fn from(l: Literal) -> Self {
        Expression::Literal(l)
    }
}

impl From<Function> for Expression {
    fn from(f: Function) -> Self {
        Expression::Function(f)
    }
}

/// A path naming a property of a feature, e.g. `gml:name` or `road/@id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueReference {
    value: String,
}

impl ValueReference {
    pub const XML_ENTITY_NAME: &'static str = "ValueReference";
    /// Rules a value must pass. The property-name rule checks every name
    /// and prefix in the path with the same NCName rule as
    /// [`gml_name_validator`].
    pub const VALIDATORS: &'static [Validator] = &[gml_property_name_validator];

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self { value })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        Self::validate(&value)?;
        self.value = value;
        Ok(())
    }

    fn validate(value: &str) -> Result<(), ValidationError> {
        Self::VALIDATORS
            .iter()
            .try_for_each(|validator| validator(value))
    }
}

/// The interpreted value of a [`Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue<'a> {
    /// The raw text, for untyped literals and types without special handling
    Text(&'a str),
    /// An `xs:date` literal
    DateTime(NaiveDateTime),
}

/// A constant, optionally tagged with an XML Schema type name.
///
/// Literal content is not validated on assignment: any text is accepted.
/// The value is always stored in its string form; typed interpretation
/// happens only when it is read through [`Literal::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    value: String,
    literal_type: Option<String>,
}

impl Literal {
    pub const XML_ENTITY_NAME: &'static str = "Literal";

    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal_type: None,
        }
    }

    pub fn typed(value: impl Into<String>, literal_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal_type: Some(literal_type.into()),
        }
    }

    /// An `xs:date` literal holding `value` in [`DATE_FORMAT`].
    pub fn date_time(value: NaiveDateTime) -> Self {
        Self::typed(value.format(DATE_FORMAT).to_string(), XS_DATE)
    }

    pub fn raw_value(&self) -> &str {
        &self.value
    }

    /// Read the value, interpreted according to the literal type.
    ///
    /// Fails only for an `xs:date` literal whose text is not in
    /// [`DATE_FORMAT`].
    pub fn value(&self) -> Result<LiteralValue<'_>, ValidationError> {
        match self.literal_type.as_deref() {
            Some(XS_DATE) => NaiveDateTime::parse_from_str(&self.value, DATE_FORMAT)
                .map(LiteralValue::DateTime)
                .map_err(|e| ValidationError::new(XS_DATE, &self.value, e.to_string())),
            _ => Ok(LiteralValue::Text(&self.value)),
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Store `value` in [`DATE_FORMAT`] and mark the literal as `xs:date`.
    pub fn set_date_time(&mut self, value: NaiveDateTime) {
        self.value = value.format(DATE_FORMAT).to_string();
        self.literal_type = Some(XS_DATE.to_string());
    }

    pub fn literal_type(&self) -> Option<&str> {
        self.literal_type.as_deref()
    }

    pub fn set_literal_type(&mut self, literal_type: Option<String>) {
        self.literal_type = literal_type;
    }
}

/// A named function applied to an ordered list of argument expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    arguments: Vec<Expression>,
}

impl Function {
    pub const XML_ENTITY_NAME: &'static str = "Function";

    pub fn new(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = Expression>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        gml_name_validator(&name)?;
        Ok(Self {
            name,
            arguments: arguments.into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        gml_name_validator(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    pub fn push_argument(&mut self, argument: impl Into<Expression>) {
        self.arguments.push(argument.into());
    }

    pub fn into_arguments(self) -> Vec<Expression> {
        self.arguments
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_value_reference_validates() {
        let mut v = ValueReference::new("gml:name").unwrap();
        assert_eq!(v.value(), "gml:name");

        let err = v.set_value("not a path").unwrap_err();
        assert_eq!(err.rule, "gml property name");
        // The rejected value is not stored
        assert_eq!(v.value(), "gml:name");

        v.set_value("road/@id").unwrap();
        assert_eq!(v.value(), "road/@id");

        assert!(ValueReference::new("").is_err());
    }

    #[test]
    fn test_literal_untyped_reads_raw() {
        let lit = Literal::new("2020-01-15T00:00:00");
        assert_eq!(lit.value().unwrap(), LiteralValue::Text("2020-01-15T00:00:00"));
        assert_eq!(lit.literal_type(), None);
    }

    #[test]
    fn test_literal_date() {
        let lit = Literal::typed("2020-01-15T00:00:00", XS_DATE);
        let expected = NaiveDate::from_ymd_opt(2020, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(lit.value().unwrap(), LiteralValue::DateTime(expected));
        // Storage is unchanged by reading
        assert_eq!(lit.raw_value(), "2020-01-15T00:00:00");
    }

    #[test]
    fn test_literal_bad_date() {
        let lit = Literal::typed("15/01/2020", XS_DATE);
        let err = lit.value().unwrap_err();
        assert_eq!(err.rule, XS_DATE);
        assert_eq!(err.value, "15/01/2020");
    }

    #[test]
    fn test_literal_other_type_reads_raw() {
        let lit = Literal::typed("5", "xs:int");
        assert_eq!(lit.value().unwrap(), LiteralValue::Text("5"));
    }

    #[test]
    fn test_literal_set_date_time() {
        let when = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        let mut lit = Literal::new("placeholder");
        lit.set_date_time(when);
        assert_eq!(lit.raw_value(), "1999-12-31T23:59:58");
        assert_eq!(lit.literal_type(), Some(XS_DATE));
        assert_eq!(lit.value().unwrap(), LiteralValue::DateTime(when));
        assert_eq!(Literal::date_time(when), lit);
    }

    #[test]
    fn test_function_arguments_in_order() {
        let f = Function::new(
            "myFunc",
            [
                Expression::from(ValueReference::new("prop1").unwrap()),
                Expression::from(Literal::new("5")),
            ],
        )
        .unwrap();
        assert_eq!(f.arguments().len(), 2);
        assert_eq!(f.arguments()[0].xml_entity_name(), "ValueReference");
        assert_eq!(f.arguments()[1].as_literal().unwrap().raw_value(), "5");
    }

    #[test]
    fn test_function_arguments_are_per_instance() {
        let mut first = Function::new("first", Vec::new()).unwrap();
        first.push_argument(Literal::new("1"));
        first.push_argument(Literal::new("2"));

        let second = Function::new("second", Vec::new()).unwrap();
        assert!(second.arguments().is_empty());
        assert_eq!(first.arguments().len(), 2);
    }

    #[test]
    fn test_function_name_validates() {
        assert!(Function::new("1bad", Vec::new()).is_err());

        let mut f = Function::new("good", Vec::new()).unwrap();
        assert!(f.set_name("also bad").is_err());
        assert_eq!(f.name(), "good");
        f.set_name("renamed").unwrap();
        assert_eq!(f.name(), "renamed");
    }
}
