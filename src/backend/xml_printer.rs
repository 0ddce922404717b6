//! XML Printer - Serialize a validated SOL25 AST
//!
//! Elements keep source declaration order; attributes are written in a fixed
//! order so the same AST always yields byte-identical output.

use log::debug;

use crate::frontend::ast::*;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const LANGUAGE: &str = "SOL25";
const INDENT: &str = "  ";

/// Pretty printer producing the XML document
pub struct XmlPrinter {
    output: String,
    indent: usize,
}

impl XmlPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Print a program to an XML string
    pub fn print_program(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent = 0;

        self.output.push_str(XML_DECLARATION);
        self.output.push('\n');

        let mut attrs = vec![("language", LANGUAGE.to_string())];
        if let Some(description) = &program.description {
            attrs.push(("description", description.clone()));
        }

        if program.classes.is_empty() {
            self.empty("program", &attrs);
        } else {
            self.open("program", &attrs);
            for class in &program.classes {
                self.print_class(class);
            }
            self.close("program");
        }

        debug!("serialized program ({} bytes)", self.output.len());
        self.output.clone()
    }

    fn print_class(&mut self, class: &ClassDef) {
        let attrs = [
            ("name", class.name.name.clone()),
            ("parent", class.parent.name.clone()),
        ];
        if class.methods.is_empty() {
            self.empty("class", &attrs);
            return;
        }

        self.open("class", &attrs);
        for method in &class.methods {
            self.open("method", &[("selector", method.selector.clone())]);
            self.print_block(&method.body);
            self.close("method");
        }
        self.close("class");
    }

    fn print_block(&mut self, block: &Block) {
        let attrs = [("arity", block.arity().to_string())];
        if block.params.is_empty() && block.stmts.is_empty() {
            self.empty("block", &attrs);
            return;
        }

        self.open("block", &attrs);
        for (i, param) in block.params.iter().enumerate() {
            self.empty(
                "parameter",
                &[("name", param.name.clone()), ("order", (i + 1).to_string())],
            );
        }
        for (i, stmt) in block.stmts.iter().enumerate() {
            self.open("assign", &[("order", (i + 1).to_string())]);
            self.empty("var", &[("name", stmt.target.name.clone())]);
            self.print_expr(&stmt.value);
            self.close("assign");
        }
        self.close("block");
    }

    /// Print an expression wrapped in `<expr>`
    fn print_expr(&mut self, expr: &Expr) {
        self.open("expr", &[]);
        match expr {
            Expr::Literal { kind, value, .. } => {
                self.empty(
                    "literal",
                    &[("class", kind.as_str().to_string()), ("value", value.clone())],
                );
            }
            Expr::Variable { name, .. } => {
                self.empty("var", &[("name", name.clone())]);
            }
            Expr::Send {
                receiver,
                selector,
                args,
                ..
            } => {
                self.open("send", &[("selector", selector.clone())]);
                self.print_expr(receiver);
                for (i, arg) in args.iter().enumerate() {
                    self.open("arg", &[("order", (i + 1).to_string())]);
                    self.print_expr(arg);
                    self.close("arg");
                }
                self.close("send");
            }
            Expr::Block(block) => self.print_block(block),
        }
        self.close("expr");
    }

    // ==================== Element Helpers ====================

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn open(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.line(&format!("<{}{}>", name, render_attrs(attrs)));
        self.indent += 1;
    }

    fn close(&mut self, name: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(&format!("</{}>", name));
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.line(&format!("<{}{}/>", name, render_attrs(attrs)));
    }
}

impl Default for XmlPrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn render_attrs(attrs: &[(&str, String)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_attr(value)))
        .collect()
}

/// Escape a value for use inside a double-quoted attribute
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Convenience function to serialize a program
pub fn print_xml(program: &Program) -> String {
    XmlPrinter::new().print_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;
    use pretty_assertions::assert_eq;

    fn xml(source: &str) -> String {
        let program = Parser::new(Lexer::new(source))
            .unwrap()
            .parse_program()
            .unwrap();
        print_xml(&program)
    }

    #[test]
    fn test_minimal_program() {
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="SOL25">
  <class name="Main" parent="Object">
    <method selector="run">
      <block arity="0">
        <assign order="1">
          <var name="x"/>
          <expr>
            <literal class="Integer" value="5"/>
          </expr>
        </assign>
      </block>
    </method>
  </class>
</program>
"#;
        assert_eq!(xml("class Main : Object { run [ | x := 5. ] }"), expected);
    }

    #[test]
    fn test_sends_parameters_and_nested_blocks() {
        let source = r#"
            "Adds things"
            class Main : Object {
                run [ | _ := self add: 1 to: 'two'. ]
                add:to: [ :a :b | r := [ :x | y := x. ] value: (Integer new). ]
            }"#;
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="SOL25" description="Adds things">
  <class name="Main" parent="Object">
    <method selector="run">
      <block arity="0">
        <assign order="1">
          <var name="_"/>
          <expr>
            <send selector="add:to:">
              <expr>
                <var name="self"/>
              </expr>
              <arg order="1">
                <expr>
                  <literal class="Integer" value="1"/>
                </expr>
              </arg>
              <arg order="2">
                <expr>
                  <literal class="String" value="two"/>
                </expr>
              </arg>
            </send>
          </expr>
        </assign>
      </block>
    </method>
    <method selector="add:to:">
      <block arity="2">
        <parameter name="a" order="1"/>
        <parameter name="b" order="2"/>
        <assign order="1">
          <var name="r"/>
          <expr>
            <send selector="value:">
              <expr>
                <block arity="1">
                  <parameter name="x" order="1"/>
                  <assign order="1">
                    <var name="y"/>
                    <expr>
                      <var name="x"/>
                    </expr>
                  </assign>
                </block>
              </expr>
              <arg order="1">
                <expr>
                  <send selector="new">
                    <expr>
                      <literal class="class" value="Integer"/>
                    </expr>
                  </send>
                </expr>
              </arg>
            </send>
          </expr>
        </assign>
      </block>
    </method>
  </class>
</program>
"#;
        assert_eq!(xml(source), expected);
    }

    #[test]
    fn test_empty_elements_self_close() {
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="SOL25">
  <class name="Main" parent="Object">
    <method selector="run">
      <block arity="0"/>
    </method>
  </class>
  <class name="Other" parent="Main"/>
</program>
"#;
        assert_eq!(
            xml("class Main : Object { run [ | ] } class Other : Main { }"),
            expected
        );
        assert!(xml("").ends_with("<program language=\"SOL25\"/>\n"));
    }

    #[test]
    fn test_literal_kinds() {
        let out = xml("class Main : Object { run [ | a := nil. b := true. c := false. d := -7. ] }");
        assert!(out.contains(r#"<literal class="Nil" value="nil"/>"#));
        assert!(out.contains(r#"<literal class="True" value="true"/>"#));
        assert!(out.contains(r#"<literal class="False" value="false"/>"#));
        assert!(out.contains(r#"<literal class="Integer" value="-7"/>"#));
    }

    #[test]
    fn test_attribute_escaping() {
        let out = xml("\"a < b & \n 'c'\" class Main : Object { run [ | s := 'x > \\'y\\' \"q\"'. ] }");
        assert!(out.contains(r#"description="a &lt; b &amp; &#10; 'c'""#));
        assert!(out.contains(r#"value="x &gt; \'y\' &quot;q&quot;""#));
    }

    #[test]
    fn test_empty_description_is_kept() {
        assert!(xml("\"\"").contains(r#"<program language="SOL25" description=""/>"#));
    }

    #[test]
    fn test_output_is_idempotent() {
        let program = Parser::new(Lexer::new("class Main : Object { run [ | x := y foo: 1. ] }"))
            .unwrap()
            .parse_program()
            .unwrap();
        let mut printer = XmlPrinter::new();
        let first = printer.print_program(&program);
        let second = printer.print_program(&program);
        assert_eq!(first, second);
    }
}
