//! Built-in Class Table
//!
//! The seven predefined SOL25 classes with their parents and method tables.
//! This is read-only data merged into the class registry before user classes.

/// A built-in class: name, parent and `(selector, arity)` pairs
#[derive(Debug, Clone, Copy)]
pub struct BuiltinClass {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub methods: &'static [(&'static str, usize)],
}

const BOOLEAN_METHODS: &[(&str, usize)] = &[
    ("not", 0),
    ("and:", 1),
    ("or:", 1),
    ("ifTrue:ifFalse:", 2),
    ("isBoolean", 0),
];

/// All built-in classes; `Object` is the only root
pub const BUILTIN_CLASSES: &[BuiltinClass] = &[
    BuiltinClass {
        name: "Object",
        parent: None,
        methods: &[
            ("new", 0),
            ("from:", 1),
            ("identicalTo:", 1),
            ("equalTo:", 1),
            ("asString", 0),
            ("isNumber", 0),
            ("isString", 0),
            ("isBlock", 0),
            ("isNil", 0),
            ("isBoolean", 0),
        ],
    },
    BuiltinClass {
        name: "Nil",
        parent: Some("Object"),
        methods: &[("asString", 0), ("isNil", 0)],
    },
    BuiltinClass {
        name: "True",
        parent: Some("Object"),
        methods: BOOLEAN_METHODS,
    },
    BuiltinClass {
        name: "False",
        parent: Some("Object"),
        methods: BOOLEAN_METHODS,
    },
    BuiltinClass {
        name: "Integer",
        parent: Some("Object"),
        methods: &[
            ("equalTo:", 1),
            ("greaterThan:", 1),
            ("plus:", 1),
            ("minus:", 1),
            ("multiplyBy:", 1),
            ("divBy:", 1),
            ("asString", 0),
            ("asInteger", 0),
            ("timesRepeat:", 1),
            ("isNumber", 0),
        ],
    },
    BuiltinClass {
        name: "String",
        parent: Some("Object"),
        methods: &[
            ("read", 0),
            ("print", 0),
            ("equalTo:", 1),
            ("asString", 0),
            ("asInteger", 0),
            ("concatenateWith:", 1),
            ("startsWith:endsBefore:", 2),
            ("isString", 0),
        ],
    },
    BuiltinClass {
        name: "Block",
        parent: Some("Object"),
        methods: &[
            ("value", 0),
            ("value:", 1),
            ("value:value:", 2),
            ("value:value:value:", 3),
            ("value:value:value:value:", 4),
            ("whileTrue:", 1),
            ("isBlock", 0),
        ],
    },
];
