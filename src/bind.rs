//! Reconciling tokenized argv with a command's option descriptors.
use indexmap::IndexMap;

use crate::{
    option::{OptionDescriptor, OptionKind, Value},
    raw::{Hints, RawArgs, RawValue, Scalar},
    Error, Result,
};

/// Flags every command understands; they never reach binding.
pub const RESERVED: [&str; 4] = ["help", "h", "version", "v"];

/// The typed values of one invocation, keyed by option name.
///
/// Options that were neither supplied nor defaulted are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: IndexMap<String, Value>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::Str(it) => Some(it),
            _ => None,
        }
    }

    /// Absent booleans read as `false`.
    pub fn bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Num(it) => Some(*it),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(Value::List(it)) => it,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tokenizer hints for a command's options.
///
/// Long and short names are hinted separately and no alias map is passed,
/// so [`bind`] can still tell which spelling supplied a value.
pub fn hints(options: &IndexMap<String, OptionDescriptor>, strict: bool) -> Hints {
    let mut res = Hints::default();
    let mut known: Vec<String> = Vec::new();
    for option in options.values().filter(|it| !it.is_positional()) {
        for name in std::iter::once(&option.name).chain(option.short.as_ref()) {
            match option.kind {
                OptionKind::Boolean => res.boolean.push(name.clone()),
                OptionKind::String | OptionKind::Array => res.string.push(name.clone()),
                OptionKind::Number | OptionKind::Positional => (),
            }
            known.push(name.clone());
        }
    }
    if strict {
        known.extend(RESERVED.iter().map(|it| it.to_string()));
        res.known = Some(known);
    }
    res
}

/// Binds `raw` against `options`, all or nothing.
///
/// `positionals` are consumed left to right by positional options in
/// declaration order.
pub fn bind(
    options: &IndexMap<String, OptionDescriptor>,
    raw: &RawArgs,
    positionals: &[String],
) -> Result<Bindings> {
    let declared = options.values().filter(|it| it.is_positional()).count();
    if positionals.len() > declared {
        return Err(Error::ExtraPositional { extra: positionals[declared..].to_vec() });
    }

    let mut res = Bindings::default();
    let mut rank = 0;
    for option in options.values() {
        let value = match option.kind {
            OptionKind::Positional => {
                rank += 1;
                positionals.get(rank - 1).map(|it| Value::Str(it.clone()))
            }
            _ => flag_value(option, raw)?,
        };

        let value = match value {
            Some(value) => Some(value),
            None => option.default.clone(),
        };

        match value {
            Some(value) => {
                res.values.insert(option.name.clone(), value);
            }
            None if option.required => {
                return Err(Error::RequiredMissing { name: option.name.clone(), kind: option.kind });
            }
            None => (),
        }
    }

    tracing::debug!(bound = res.len(), "bound options");
    Ok(res)
}

fn flag_value(option: &OptionDescriptor, raw: &RawArgs) -> Result<Option<Value>> {
    let long = raw.get(&option.name);
    let short = option.short.as_deref().and_then(|it| raw.get(it));

    let supplied = match (long, short) {
        (Some(_), Some(_)) if option.kind != OptionKind::Array => {
            return Err(Error::ConflictingAlias {
                long: format!("--{}", option.name),
                short: format!("-{}", option.short.as_deref().unwrap_or_default()),
            });
        }
        (None, None) => return Ok(None),
        (long, short) => [long, short],
    };

    let value = match option.kind {
        OptionKind::Positional => return Ok(None),
        OptionKind::Array => {
            let all = supplied.iter().flatten().copied().flat_map(RawValue::scalars);
            Value::List(all.map(Scalar::to_text).collect())
        }
        OptionKind::Boolean => Value::Bool(supplied.iter().flatten().copied().any(truthy)),
        OptionKind::String => Value::Str(last(&supplied).map(Scalar::to_text).unwrap_or_default()),
        OptionKind::Number => {
            let number = match last(&supplied) {
                Some(Scalar::Num(n)) => Some(*n),
                Some(Scalar::Str(s)) => s.trim().parse::<f64>().ok().filter(|it| it.is_finite()),
                Some(Scalar::Bool(_)) | None => None,
            };
            match number {
                Some(n) => Value::Num(n),
                None => {
                    return Err(Error::InvalidNumber {
                        name: option.name.clone(),
                        value: last(&supplied)
                            .filter(|it| !matches!(it, Scalar::Bool(_)))
                            .map(Scalar::to_text)
                            .unwrap_or_default(),
                    })
                }
            }
        }
    };
    Ok(Some(value))
}

fn last<'a>(supplied: &[Option<&'a RawValue>; 2]) -> Option<&'a Scalar> {
    supplied.iter().flatten().copied().find_map(RawValue::last)
}

/// Truthiness in the loose sense: empty text, zero and `false` are false, a
/// repeated flag is true.
fn truthy(value: &RawValue) -> bool {
    match value {
        RawValue::Many(_) => true,
        RawValue::One(Scalar::Bool(b)) => *b,
        RawValue::One(Scalar::Str(s)) => !s.is_empty(),
        RawValue::One(Scalar::Num(n)) => *n != 0.0 && !n.is_nan(),
    }
}
