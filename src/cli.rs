//! A CLI instance: registered commands, their cached tree, and the
//! resolve → tokenize → bind → run pipeline.
use std::{fmt, sync::OnceLock};

use crate::{
    bind::{self, Bindings},
    raw,
    tree::{self, CommandNode},
    CommandDescriptor, Error, Handler, Result,
};

/// Instance-level settings. Presentation (colors, banners) belongs to
/// whoever renders help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliMeta {
    pub app_name: String,
    pub binary_name: String,
    pub description: String,
    pub version: Option<String>,
    /// Reject flags no option declares.
    pub strict: bool,
}

impl Default for CliMeta {
    fn default() -> Self {
        CliMeta::new("")
    }
}

impl CliMeta {
    pub fn new(binary_name: impl Into<String>) -> Self {
        let binary_name = binary_name.into();
        CliMeta {
            app_name: binary_name.clone(),
            binary_name,
            description: String::new(),
            version: None,
            strict: true,
        }
    }
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// What an argv asks for, decided without running anything.
#[derive(Debug)]
pub enum Dispatch {
    /// `--help`/`-h`: render help for the node at `path`.
    Help { path: Vec<String> },
    /// `--version`/`-v`.
    Version { version: String },
    Run(Invocation),
}

/// A resolved command with its options bound, ready to run.
pub struct Invocation {
    pub path: Vec<String>,
    pub bindings: Bindings,
    handler: Handler,
}

impl Invocation {
    pub async fn run(self) -> Result<()> {
        let Invocation { path, bindings, handler } = self;
        tracing::debug!(?path, "running command");
        handler(bindings)
            .await
            .map_err(|error| Error::Handler { command: path.join(" "), error })
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("path", &self.path)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// How [`Cli::run`] finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Help { path: Vec<String> },
    Version { version: String },
    Completed { path: Vec<String> },
}

#[derive(Debug, Default)]
pub struct Cli {
    meta: CliMeta,
    root: Option<CommandDescriptor>,
    commands: Vec<CommandDescriptor>,
    tree: OnceLock<CommandNode>,
}

impl Cli {
    pub fn new(meta: CliMeta) -> Self {
        Cli { meta, ..Cli::default() }
    }

    pub fn meta(&self) -> &CliMeta {
        &self.meta
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn register(&mut self, command: CommandDescriptor) -> Result<&mut Self> {
        command.validate(false)?;
        tracing::debug!(path = ?command.paths, "registered command");
        self.commands.push(command);
        self.tree.take();
        Ok(self)
    }

    pub fn register_all<I>(&mut self, commands: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = CommandDescriptor>,
    {
        for command in commands {
            self.register(command)?;
        }
        Ok(self)
    }

    /// Runs `command` when argv names no registered path.
    pub fn root(&mut self, command: CommandDescriptor) -> Result<&mut Self> {
        command.validate(true)?;
        self.root = Some(command);
        self.tree.take();
        Ok(self)
    }

    /// The command tree, built on first use and kept until the command set
    /// changes.
    pub fn tree(&self) -> &CommandNode {
        self.tree.get_or_init(|| tree::build_rooted(self.root.as_ref(), &self.commands))
    }

    /// Resolves and binds `args` (argv without the program name).
    pub fn prepare<I>(&self, args: I) -> Result<Dispatch>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (node, rest) = tree::resolve(self.tree(), &args);
        let path = node.path.clone();

        let flags = rest.iter().take_while(|it| it.as_str() != "--");
        let mut help = false;
        let mut version = false;
        for arg in flags {
            match arg.as_str() {
                "--help" | "-h" => help = true,
                "--version" | "-v" => version = true,
                _ => (),
            }
        }
        if help {
            tracing::debug!(?path, "help requested");
            return Ok(Dispatch::Help { path });
        }
        if version {
            let version = self.meta.version.clone().ok_or(Error::MissingVersion)?;
            return Ok(Dispatch::Version { version });
        }

        let command = match &node.descriptor {
            Some(it) => it,
            None => return Err(Error::NoRunnableCommand { path }),
        };
        let hints = bind::hints(&command.options, self.meta.strict);
        let raw = raw::parse(rest, &hints)?;
        let bindings = bind::bind(&command.options, &raw, &raw.positionals)?;
        let handler = match &command.handler {
            Some(it) => it.clone(),
            None => return Err(Error::NotImplemented { path }),
        };

        Ok(Dispatch::Run(Invocation { path, bindings, handler }))
    }

    /// [`prepare`](Self::prepare), then await the handler if there is one to
    /// run.
    pub async fn run<I>(&self, args: I) -> Result<Outcome>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        match self.prepare(args)? {
            Dispatch::Help { path } => Ok(Outcome::Help { path }),
            Dispatch::Version { version } => Ok(Outcome::Version { version }),
            Dispatch::Run(invocation) => {
                let path = invocation.path.clone();
                invocation.run().await?;
                Ok(Outcome::Completed { path })
            }
        }
    }
}
