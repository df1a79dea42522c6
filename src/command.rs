//! Command descriptors: a path, metadata, options and a handler.
use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;
use indexmap::IndexMap;

use crate::{option::OptionDescriptor, Bindings, Error, OptionKind, Result};

macro_rules! invalid {
    ($cmd:expr, $($tt:tt)*) => {
        return Err(Error::InvalidDescriptor { command: $cmd.display_name(), reason: format!($($tt)*) })
    };
}

/// What a command does once its options are bound.
pub type Handler = Arc<dyn Fn(Bindings) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Help-facing metadata. The core never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub description: String,
    pub usage: String,
    pub category: String,
    pub details: String,
    pub examples: Vec<Example>,
}

impl Meta {
    pub fn new(description: impl Into<String>) -> Self {
        Meta { description: description.into(), ..Meta::default() }
    }
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
    pub fn example(mut self, label: impl Into<String>, invocation: impl Into<String>) -> Self {
        self.examples.push(Example { label: label.into(), invocation: invocation.into() });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub label: String,
    pub invocation: String,
}

/// One declared command.
///
/// `paths` is the literal argv prefix that selects the command, so
/// `["test", "hello"]` answers to `kuro test hello`. Options keep their
/// declaration order, which is also the order positionals are consumed in.
#[derive(Clone, Default)]
pub struct CommandDescriptor {
    pub paths: Vec<String>,
    pub options: IndexMap<String, OptionDescriptor>,
    pub meta: Meta,
    pub handler: Option<Handler>,
}

impl CommandDescriptor {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        CommandDescriptor { paths: paths.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn depth(&self) -> usize {
        self.paths.len()
    }

    /// Adds an option; a later option with the same name replaces the earlier
    /// one but keeps its position.
    pub fn option(mut self, option: OptionDescriptor) -> Self {
        self.options.insert(option.name.clone(), option);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn handler<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Bindings) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: Handler =
            Arc::new(move |bindings| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(f(bindings))
            });
        self.handler = Some(handler);
        self
    }

    pub(crate) fn display_name(&self) -> String {
        if self.paths.is_empty() {
            "<root>".to_string()
        } else {
            self.paths.join(" ")
        }
    }

    /// Checks the things that would otherwise surface as confusing runtime
    /// behavior. `root` allows the empty path.
    pub(crate) fn validate(&self, root: bool) -> Result<()> {
        if self.paths.is_empty() && !root {
            invalid!(self, "path must not be empty");
        }
        for segment in &self.paths {
            if segment.is_empty() {
                invalid!(self, "path segments must not be empty");
            }
            if segment.starts_with('-') {
                invalid!(self, "path segment can't begin with `-`: `{segment}`");
            }
        }

        let mut shorts: Vec<&str> = Vec::new();
        for (key, option) in &self.options {
            if key != &option.name {
                invalid!(self, "option `{}` registered under `{key}`", option.name);
            }
            if option.name.is_empty() || option.name.starts_with('-') {
                invalid!(self, "invalid option name: `{}`", option.name);
            }
            if let Some(short) = &option.short {
                if option.kind == OptionKind::Positional {
                    invalid!(self, "positional `{}` can't have a short alias", option.name);
                }
                if short.is_empty() || short.starts_with('-') {
                    invalid!(self, "invalid short alias for `{}`: `{short}`", option.name);
                }
                let clash = shorts.contains(&short.as_str())
                    || self.options.values().any(|other| {
                        other.name == *short && other.kind != OptionKind::Positional
                    });
                if clash {
                    invalid!(self, "short alias `{short}` is used more than once");
                }
                shorts.push(short);
            }
            if let Some(default) = &option.default {
                if !default.kind_fits(option.kind) {
                    invalid!(
                        self,
                        "default for `{}` does not fit kind `{}`: {default:?}",
                        option.name,
                        option.kind
                    );
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for CommandDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let same_handler = match (&self.handler, &other.handler) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.paths == other.paths
            && self.options == other.options
            && self.meta == other.meta
            && same_handler
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("paths", &self.paths)
            .field("options", &self.options)
            .field("meta", &self.meta)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .finish()
    }
}
