//! Translation pipeline: lexer, parser, semantic analysis, XML

use log::debug;

use crate::backend::print_xml;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::semantic::SemanticAnalyzer;
use crate::utils::Result;

/// Translate SOL25 source into the XML document.
/// The first error of any stage stops the pipeline.
pub fn translate(source: &str) -> Result<String> {
    // 1. Lexer -> Tokens
    let lexer = Lexer::new(source);

    // 2. Parser -> AST
    let mut parser = Parser::new(lexer)?;
    let program = parser.parse_program()?;

    // 3. Semantic Analysis
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&program)?;

    // 4. Serialization
    let document = print_xml(&program);
    debug!("translation finished");
    Ok(document)
}
