//! Common test utilities for roundtrip testing

#![allow(dead_code)]

use fes_expression::{Expression, ExpressionParser, ToElement};

pub const FES_NS: &str = r#"xmlns:fes="http://www.opengis.net/fes/2.0""#;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serialize an expression, parse the text back, and verify that the result
/// equals the original. Returns the serialized text.
pub fn roundtrip_expression(expression: &Expression) -> String {
    let text = match expression.serialize() {
        Ok(text) => text,
        Err(e) => {
            println!("Error serializing {expression}:\n{e}");
            panic!("{}", e);
        }
    };

    let parsed = match ExpressionParser::parse_str(&text) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => panic!("No expression type claimed:\n{text}"),
        Err(e) => {
            println!("Error parsing:\n{text}");
            panic!("{}", e);
        }
    };

    assert_eq!(
        &parsed, expression,
        "Expected:\n---\n{expression}\n---\nActual:\n---\n{parsed}\n---\nXML:\n{text}"
    );
    text
}

/// Parse XML text, then serialize and parse again, and verify the two parsed
/// expressions agree.
pub fn roundtrip_xml(input: &str) -> Expression {
    let expression = match fes_expression::parse(input) {
        Ok(expression) => expression,
        Err(e) => {
            println!("Error parsing:\n{input}");
            panic!("{}", e);
        }
    };
    roundtrip_expression(&expression);
    expression
}

/// Depth of function nesting: 0 for a non-function.
pub fn depth(expression: &Expression) -> usize {
    match expression {
        Expression::Function(f) => 1 + f.arguments().iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
