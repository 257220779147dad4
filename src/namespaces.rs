//! The fixed prefix to namespace URI table used when qualifying generated
//! elements and when recognising incoming ones.

/// Filter Encoding 2.0.
pub const FES: &str = "http://www.opengis.net/fes/2.0";
/// GML 3.2.
pub const GML: &str = "http://www.opengis.net/gml/3.2";
/// XML Schema datatypes, used by typed literals (`xs:date`).
pub const XS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XLINK: &str = "http://www.w3.org/1999/xlink";

/// All known namespaces, in the order their declarations are written on a
/// serialized root element.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("fes", FES),
    ("gml", GML),
    ("xs", XS),
    ("xsi", XSI),
    ("xlink", XLINK),
];

/// Look up the URI bound to `prefix`.
pub fn uri(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

/// Look up the prefix bound to `uri`.
pub fn prefix(uri: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(_, u)| *u == uri)
        .map(|(prefix, _)| *prefix)
}

/// Format `local` in Clark notation (`{uri}local`) under the namespace
/// bound to `prefix`.
pub fn qualified(prefix: &str, local: &str) -> Option<String> {
    uri(prefix).map(|uri| format!("{{{uri}}}{local}"))
}
