//! Payment method catalog adapters.

mod xml_parser;

pub use xml_parser::parse_payment_methods_xml;
