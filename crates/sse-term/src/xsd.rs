//! XSD datatype IRIs understood by the numeric accessors and the printer.

/// Namespace shared by all XSD datatypes.
pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// `xsd:string`
pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:boolean`
pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// `xsd:integer`
pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// `xsd:long`
pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
/// `xsd:int`
pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
/// `xsd:decimal`
pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
/// `xsd:double`
pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
/// `xsd:float`
pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

/// Whether `datatype` is one of the numeric XSD datatypes.
pub fn is_numeric(datatype: &str) -> bool {
    matches!(
        datatype,
        INTEGER | LONG | INT | DECIMAL | DOUBLE | FLOAT
    )
}

/// Whether `datatype` is an integer-valued XSD datatype.
pub fn is_integer(datatype: &str) -> bool {
    matches!(datatype, INTEGER | LONG | INT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_classification() {
        assert!(is_numeric(INTEGER));
        assert!(is_numeric(DOUBLE));
        assert!(!is_numeric(STRING));
        assert!(!is_numeric(BOOLEAN));
        assert!(is_integer(LONG));
        assert!(!is_integer(DECIMAL));
    }
}
