//! Backend module - XML serialization of the validated AST

pub mod xml_printer;

pub use xml_printer::print_xml;
