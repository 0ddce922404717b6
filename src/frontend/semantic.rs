//! Semantic Analysis for SOL25
//!
//! Performs:
//! - Class registry management (built-ins plus user classes, parents, methods)
//! - Inheritance checks (unknown parents, cycles)
//! - Method table checks (duplicate selectors, selector/block arity)
//! - Name resolution through nested block scopes
//! - Entry point check (`Main>>run`)

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::frontend::ast::*;
use crate::stdlib::BUILTIN_CLASSES;
use crate::utils::{Error, Result};

/// Assignment target that is never declared and always resolves
const DISCARD: &str = "_";

/// Names bound in the outermost scope
const PSEUDO_VARIABLES: &[&str] = &["self", "super", "nil", "true", "false"];

// ==================== Class Registry ====================

/// Registry entry for one class
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Resolved parent; `None` for `Object` and for user classes before resolution
    pub parent: Option<String>,
    /// Selector to arity
    pub methods: HashMap<String, usize>,
}

/// Global mapping from class name to parent and method table
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassInfo>,
}

impl ClassRegistry {
    /// Create a registry holding only the built-in classes
    pub fn with_builtins() -> Self {
        let classes = BUILTIN_CLASSES
            .iter()
            .map(|builtin| {
                let info = ClassInfo {
                    parent: builtin.parent.map(str::to_string),
                    methods: builtin
                        .methods
                        .iter()
                        .map(|(selector, arity)| (selector.to_string(), *arity))
                        .collect(),
                };
                (builtin.name.to_string(), info)
            })
            .collect();
        Self { classes }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// Register a user class with an unresolved parent
    fn declare(&mut self, class: &ClassDef) -> Result<()> {
        if self.contains(&class.name.name) {
            return Err(Error::DuplicateClass {
                name: class.name.name.clone(),
                span: class.name.span,
            });
        }
        trace!("registered class {}", class.name.name);
        self.classes.insert(
            class.name.name.clone(),
            ClassInfo {
                parent: None,
                methods: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Link a declared class to its parent
    fn resolve_parent(&mut self, class: &ClassDef) -> Result<()> {
        if !self.contains(&class.parent.name) {
            return Err(Error::UndefinedClass {
                name: class.parent.name.clone(),
                span: class.parent.span,
            });
        }
        if let Some(info) = self.classes.get_mut(&class.name.name) {
            info.parent = Some(class.parent.name.clone());
        }
        Ok(())
    }

    /// Walk the parent chain of `class`, failing if any name repeats
    fn check_acyclic(&self, class: &Ident) -> Result<()> {
        let mut visited = HashSet::new();
        let mut current = Some(class.name.as_str());

        while let Some(name) = current {
            if !visited.insert(name) {
                return Err(Error::CircularInheritance {
                    class: class.name.clone(),
                    span: class.span,
                });
            }
            current = self.classes.get(name).and_then(|info| info.parent.as_deref());
        }
        Ok(())
    }

    /// Enter every method of a user class into its table. The first of two
    /// equal selectors wins; duplicates are reported on the class's own turn.
    fn register_methods(&mut self, class: &ClassDef) -> Result<()> {
        let info = self.classes.get_mut(&class.name.name).ok_or_else(|| {
            Error::Internal(format!("class {} vanished from registry", class.name.name))
        })?;

        for method in &class.methods {
            info.methods
                .entry(method.selector.clone())
                .or_insert(method.arity);
        }
        trace!(
            "registered {} methods of {}",
            class.methods.len(),
            class.name.name
        );
        Ok(())
    }

    /// Find a selector in `class` or its nearest ancestor; returns its arity.
    /// Stops at the first repeated class, so unchecked cyclic chains end.
    pub fn lookup_method(&self, class: &str, selector: &str) -> Option<usize> {
        let mut visited = HashSet::new();
        let mut current = Some(class);
        while let Some(name) = current {
            if !visited.insert(name) {
                return None;
            }
            let info = self.classes.get(name)?;
            if let Some(arity) = info.methods.get(selector) {
                return Some(*arity);
            }
            current = info.parent.as_deref();
        }
        None
    }
}

// ==================== Symbol Table ====================

/// Index of a scope in the scope arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// How a name was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Pseudo,
    Parameter,
    Variable,
}

/// A scope containing bindings
#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    names: HashMap<String, Binding>,
}

/// Arena of nested block scopes; the root holds the pseudo-variables
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        let global = Scope {
            parent: None,
            names: PSEUDO_VARIABLES
                .iter()
                .map(|name| (name.to_string(), Binding::Pseudo))
                .collect(),
        };
        Self {
            scopes: vec![global],
            current: ScopeId(0),
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(self.current),
            names: HashMap::new(),
        });
        self.current = id;
        id
    }

    /// Exit the current scope and drop its bindings; the root is never popped
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                self.current = scope.parent.unwrap_or(ScopeId(0));
            }
        }
    }

    /// Number of open scopes, root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a block parameter in the current scope
    pub fn define_param(&mut self, param: &Ident) -> Result<()> {
        let scope = &mut self.scopes[self.current.0];
        if scope.names.contains_key(&param.name) {
            return Err(Error::DuplicateParameter {
                name: param.name.clone(),
                span: param.span,
            });
        }
        scope.names.insert(param.name.clone(), Binding::Parameter);
        Ok(())
    }

    /// Bind an assignment target in the current scope
    pub fn define_var(&mut self, target: &Ident) -> Result<()> {
        let scope = &mut self.scopes[self.current.0];
        if scope.names.get(&target.name) == Some(&Binding::Parameter) {
            return Err(Error::VariableCollision {
                name: target.name.clone(),
                span: target.span,
            });
        }
        scope
            .names
            .entry(target.name.clone())
            .or_insert(Binding::Variable);
        Ok(())
    }

    /// Look up a name, searching from the current scope outward
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            if let Some(binding) = self.scopes[id.0].names.get(name) {
                return Some(*binding);
            }
            scope_id = self.scopes[id.0].parent;
        }
        None
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Semantic Analyzer ====================

/// Semantic analyzer
pub struct SemanticAnalyzer {
    pub registry: ClassRegistry,
    pub symbols: SymbolTable,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::with_builtins(),
            symbols: SymbolTable::new(),
        }
    }

    /// Analyze a program; the first error found is returned
    pub fn analyze(&mut self, program: &Program) -> Result<()> {
        // Pass 1: register every class, then link parents
        for class in &program.classes {
            self.registry.declare(class)?;
        }
        for class in &program.classes {
            self.registry.resolve_parent(class)?;
        }

        // Method tables are filled up front so sends may name classes
        // declared later in the file
        for class in &program.classes {
            self.registry.register_methods(class)?;
        }

        // Pass 2: per class, in declaration order
        for class in &program.classes {
            self.registry.check_acyclic(&class.name)?;
            check_unique_methods(class)?;
            self.check_class(class)?;
        }

        self.check_entry_point(program)?;

        debug!("semantic analysis passed for {} classes", program.classes.len());
        Ok(())
    }

    fn check_class(&mut self, class: &ClassDef) -> Result<()> {
        for method in &class.methods {
            if method.arity != method.body.arity() {
                return Err(Error::ArityMismatch {
                    selector: method.selector.clone(),
                    expected: method.arity,
                    got: method.body.arity(),
                    span: method.span,
                });
            }
            self.check_block(&method.body)?;
        }
        Ok(())
    }

    fn check_block(&mut self, block: &Block) -> Result<()> {
        self.symbols.enter_scope();
        trace!("entered block scope (depth {})", self.symbols.depth());
        let result = self.check_block_body(block);
        self.symbols.exit_scope();
        result
    }

    fn check_block_body(&mut self, block: &Block) -> Result<()> {
        for param in &block.params {
            self.symbols.define_param(param)?;
        }
        for stmt in &block.stmts {
            if stmt.target.name != DISCARD {
                self.symbols.define_var(&stmt.target)?;
            }
            self.check_expr(&stmt.value)?;
        }
        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal {
                kind: LiteralKind::Class,
                value,
                span,
            } => {
                if !self.registry.contains(value) {
                    return Err(Error::UndefinedClass {
                        name: value.clone(),
                        span: *span,
                    });
                }
                Ok(())
            }
            Expr::Literal { .. } => Ok(()),
            Expr::Variable { name, span } => {
                if name != DISCARD && self.symbols.lookup(name).is_none() {
                    return Err(Error::UndefinedVariable {
                        name: name.clone(),
                        span: *span,
                    });
                }
                Ok(())
            }
            Expr::Send {
                receiver,
                selector,
                args,
                span,
            } => {
                self.check_expr(receiver)?;
                for arg in args {
                    self.check_expr(arg)?;
                }

                // only class-literal receivers have a statically known class
                if let Some(class) = receiver.as_class_literal() {
                    if self.registry.lookup_method(class, selector).is_none() {
                        return Err(Error::UndefinedMethod {
                            class: class.to_string(),
                            selector: selector.clone(),
                            span: *span,
                        });
                    }
                }
                Ok(())
            }
            Expr::Block(block) => self.check_block(block),
        }
    }

    /// `Main` must exist and declare `run` itself
    fn check_entry_point(&self, program: &Program) -> Result<()> {
        let main = program
            .classes
            .iter()
            .find(|class| class.name.name == "Main")
            .ok_or(Error::MissingMainClass)?;

        let has_run = self
            .registry
            .get("Main")
            .map_or(false, |info| info.methods.get("run") == Some(&0));
        if !has_run {
            return Err(Error::MissingRunMethod {
                span: main.name.span,
            });
        }
        Ok(())
    }
}

/// A selector may be defined only once per class
fn check_unique_methods(class: &ClassDef) -> Result<()> {
    let mut seen = HashSet::new();
    for method in &class.methods {
        if !seen.insert(method.selector.as_str()) {
            return Err(Error::DuplicateMethod {
                class: class.name.name.clone(),
                selector: method.selector.clone(),
                span: method.span,
            });
        }
    }
    Ok(())
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
