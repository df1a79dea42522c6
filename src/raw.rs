//! A command-agnostic flag tokenizer.
//!
//! [`parse`] knows nothing about commands. It splits argv into positionals and
//! flags, guided by [`Hints`]: which names are booleans, which must stay
//! strings, which names are aliases of each other, what to default and,
//! optionally, which names are allowed at all.
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Str(String),
    Num(f64),
}

impl Scalar {
    /// The text a scalar stands for, `true` for bare presence flags.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Str(s) => s.clone(),
            Scalar::Num(n) => n.to_string(),
        }
    }
}

/// A flag's value: what it was set to, or every value if it was repeated.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl RawValue {
    fn push(&mut self, next: Scalar) {
        match self {
            RawValue::One(first) => {
                let first = std::mem::replace(first, Scalar::Bool(false));
                *self = RawValue::Many(vec![first, next]);
            }
            RawValue::Many(all) => all.push(next),
        }
    }

    /// The most recent value.
    pub fn last(&self) -> Option<&Scalar> {
        match self {
            RawValue::One(it) => Some(it),
            RawValue::Many(all) => all.last(),
        }
    }

    pub fn scalars(&self) -> &[Scalar] {
        match self {
            RawValue::One(it) => std::slice::from_ref(it),
            RawValue::Many(all) => all,
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(it: Scalar) -> Self {
        RawValue::One(it)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArgs {
    pub positionals: Vec<String>,
    pub flags: IndexMap<String, RawValue>,
}

impl RawArgs {
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.flags.get(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hints {
    pub boolean: Vec<String>,
    pub string: Vec<String>,
    pub alias: IndexMap<String, Vec<String>>,
    pub default: IndexMap<String, RawValue>,
    /// Strict mode: any flag outside this list is an error.
    pub known: Option<Vec<String>>,
}

impl Hints {
    pub fn boolean(mut self, name: impl Into<String>) -> Self {
        self.boolean.push(name.into());
        self
    }

    pub fn string(mut self, name: impl Into<String>) -> Self {
        self.string.push(name.into());
        self
    }

    pub fn alias<I>(mut self, name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.alias.entry(name.into()).or_default().extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn default_value(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.default.insert(name.into(), RawValue::One(value));
        self
    }

    pub fn known<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.known.get_or_insert_with(Vec::new).extend(names.into_iter().map(Into::into));
        self
    }
}

/// Alias groups, each stored under the first name it was declared with.
struct Aliases<'h> {
    canonical: HashMap<&'h str, &'h str>,
    peers: HashMap<&'h str, Vec<&'h str>>,
}

impl<'h> Aliases<'h> {
    fn new(alias: &'h IndexMap<String, Vec<String>>) -> Self {
        let mut res = Aliases { canonical: HashMap::new(), peers: HashMap::new() };
        for (name, aliases) in alias {
            let canonical = res.canonical.get(name.as_str()).copied().unwrap_or(name.as_str());
            for member in std::iter::once(name).chain(aliases) {
                if res.canonical.contains_key(member.as_str()) {
                    continue;
                }
                res.canonical.insert(member.as_str(), canonical);
                res.peers.entry(canonical).or_default().push(member.as_str());
            }
        }
        res
    }

    fn canonical<'a>(&self, name: &'a str) -> &'a str
    where
        'h: 'a,
    {
        self.canonical.get(name).copied().unwrap_or(name)
    }

    /// `name` and every name it is interchangeable with.
    fn group<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        match self.peers.get(self.canonical(name)) {
            Some(peers) => peers.clone(),
            None => vec![name],
        }
    }
}

struct Rules<'h> {
    aliases: Aliases<'h>,
    boolean: Vec<&'h str>,
    string: Vec<&'h str>,
    known: Option<&'h [String]>,
}

impl<'h> Rules<'h> {
    fn new(hints: &'h Hints) -> Self {
        let mut boolean: Vec<&str> = hints.boolean.iter().map(String::as_str).collect();
        let mut string: Vec<&str> = hints.string.iter().map(String::as_str).collect();
        for (name, value) in &hints.default {
            match value.last() {
                Some(Scalar::Bool(_)) => boolean.push(name),
                Some(Scalar::Str(_)) => string.push(name),
                Some(Scalar::Num(_)) | None => (),
            }
        }
        Rules { aliases: Aliases::new(&hints.alias), boolean, string, known: hints.known.as_deref() }
    }

    fn any_in(&self, list: &[&str], name: &str) -> bool {
        self.aliases.group(name).iter().any(|it| list.contains(it))
    }

    fn is_string(&self, name: &str) -> bool {
        self.any_in(&self.string, name)
    }

    fn is_boolean(&self, name: &str) -> bool {
        !self.is_string(name) && self.any_in(&self.boolean, name)
    }

    fn is_known(&self, name: &str) -> bool {
        match self.known {
            None => true,
            Some(known) => {
                self.aliases.group(name).iter().any(|it| known.iter().any(|k| k.as_str() == *it))
            }
        }
    }

    /// Applies the coercion hints to a flag's value. `None` means the flag
    /// was given without one.
    fn coerce(&self, name: &str, value: Option<&str>) -> Scalar {
        if self.is_string(name) {
            return Scalar::Str(value.unwrap_or_default().to_string());
        }
        match value {
            None => Scalar::Bool(true),
            Some("true") if self.is_boolean(name) => Scalar::Bool(true),
            Some("false") if self.is_boolean(name) => Scalar::Bool(false),
            Some(value) if self.is_boolean(name) => Scalar::Str(value.to_string()),
            Some(value) => match numeric(value) {
                Some(n) => Scalar::Num(n),
                None => Scalar::Str(value.to_string()),
            },
        }
    }
}

fn numeric(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|it| it.is_finite())
}

/// Argv cursor. Arguments are stored reversed so the next one is a `pop`.
struct Parser<'a> {
    rargs: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    fn new<S: AsRef<str>>(args: &'a [S]) -> Self {
        Parser { rargs: args.iter().rev().map(|it| it.as_ref()).collect() }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.rargs.pop()
    }

    fn peek(&self) -> Option<&'a str> {
        self.rargs.last().copied()
    }

    fn rest(&mut self) -> impl Iterator<Item = &'a str> + '_ {
        self.rargs.drain(..).rev()
    }

    /// The next token, if it can be a value rather than another flag.
    fn next_value(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(next) if !next.starts_with('-') => self.next(),
            _ => None,
        }
    }

    /// A boolean flag only swallows a following literal `true` or `false`.
    fn next_bool_literal(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(lit @ ("true" | "false")) => {
                self.next();
                Some(lit)
            }
            _ => None,
        }
    }
}

/// Splits `args` into positionals and flags.
pub fn parse<S: AsRef<str>>(args: &[S], hints: &Hints) -> Result<RawArgs> {
    let rules = Rules::new(hints);
    let mut p = Parser::new(args);
    let mut out = RawArgs::default();

    while let Some(arg) = p.next() {
        if arg == "--" {
            out.positionals.extend(p.rest().map(str::to_string));
            break;
        }

        let body = arg.trim_start_matches('-');
        let dashes = arg.len() - body.len();
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if dashes == 0 || name.is_empty() {
            tracing::trace!(arg, "positional");
            out.positionals.push(arg.to_string());
            continue;
        }

        let names: Vec<&str> = if dashes == 2 {
            vec![name]
        } else {
            name.char_indices().map(|(i, c)| &name[i..i + c.len_utf8()]).collect()
        };
        if let Some(unknown) = names.iter().find(|it| !rules.is_known(it)) {
            return Err(Error::UnknownFlag { flag: format!("{}{unknown}", &arg[..dashes]) });
        }

        let (last, init) = match names.split_last() {
            Some(it) => it,
            None => continue,
        };
        for name in init {
            store(&mut out, &rules, name, rules.coerce(name, None));
        }
        let value = match inline {
            Some(value) => Some(value),
            None if rules.is_boolean(last) => p.next_bool_literal(),
            None => p.next_value(),
        };
        tracing::trace!(flag = last, ?value, "flag");
        store(&mut out, &rules, last, rules.coerce(last, value));
    }

    for (name, value) in &hints.default {
        let key = rules.aliases.canonical(name);
        if !out.flags.contains_key(key) {
            out.flags.insert(key.to_string(), value.clone());
        }
    }

    let stored: Vec<(String, RawValue)> =
        out.flags.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    for (key, value) in stored {
        for peer in rules.aliases.group(&key) {
            if peer != key {
                out.flags.insert(peer.to_string(), value.clone());
            }
        }
    }

    Ok(out)
}

fn store(out: &mut RawArgs, rules: &Rules<'_>, name: &str, value: Scalar) {
    let key = rules.aliases.canonical(name);
    match out.flags.get_mut(key) {
        Some(old) => old.push(value),
        None => {
            out.flags.insert(key.to_string(), RawValue::One(value));
        }
    }
}
