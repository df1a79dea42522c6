//! Option descriptors and the values they bind to.
use std::fmt;

/// The closed set of things an option can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Positional,
    Boolean,
    String,
    Number,
    Array,
}

impl OptionKind {
    /// How error messages refer to an option of this kind.
    pub fn noun(self) -> &'static str {
        match self {
            OptionKind::Positional => "Positional argument",
            OptionKind::Boolean | OptionKind::String | OptionKind::Number | OptionKind::Array => {
                "Option"
            }
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Positional => "positional",
            OptionKind::Boolean => "boolean",
            OptionKind::String => "string",
            OptionKind::Number => "number",
            OptionKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A bound, typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Num(f64),
    List(Vec<String>),
}

impl Value {
    /// Whether this value may stand in for an option of `kind`.
    pub fn kind_fits(&self, kind: OptionKind) -> bool {
        matches!(
            (self, kind),
            (Value::Bool(_), OptionKind::Boolean)
                | (Value::Str(_), OptionKind::String | OptionKind::Positional)
                | (Value::Num(_), OptionKind::Number)
                | (Value::List(_), OptionKind::Array)
        )
    }
}

impl From<bool> for Value {
    fn from(it: bool) -> Self {
        Value::Bool(it)
    }
}

impl From<f64> for Value {
    fn from(it: f64) -> Self {
        Value::Num(it)
    }
}

impl From<i32> for Value {
    fn from(it: i32) -> Self {
        Value::Num(f64::from(it))
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Self {
        Value::Str(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Self {
        Value::Str(it)
    }
}

impl From<Vec<String>> for Value {
    fn from(it: Vec<String>) -> Self {
        Value::List(it)
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(it: [&str; N]) -> Self {
        Value::List(it.into_iter().map(String::from).collect())
    }
}

/// Declares one bindable value of a command.
///
/// `name` doubles as the long flag (`--name`) and as the key the bound value
/// is stored under. Positionals are ranked by the order they are declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    pub name: String,
    pub kind: OptionKind,
    pub short: Option<String>,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl OptionDescriptor {
    fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        let (required, default) = match kind {
            OptionKind::Positional => (true, None),
            OptionKind::Boolean => (false, Some(Value::Bool(false))),
            OptionKind::Array => (false, Some(Value::List(Vec::new()))),
            OptionKind::String | OptionKind::Number => (false, None),
        };
        OptionDescriptor {
            name: name.into(),
            kind,
            short: None,
            required,
            default,
            description: String::new(),
        }
    }

    /// Required unless marked [`optional`](Self::optional).
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Positional)
    }
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Boolean)
    }
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::String)
    }
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Number)
    }
    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Array)
    }

    /// Short alias, given without the leading dash.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Checked against the kind when the owning command is registered.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_positional(&self) -> bool {
        self.kind == OptionKind::Positional
    }
}
