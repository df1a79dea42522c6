//! Declarative command trees with typed option binding.
//!
//! Commands are plain data: a path, some metadata, a list of
//! [`OptionDescriptor`]s and an async handler. A [`Cli`] folds them into a
//! tree, finds the deepest command an argv names, tokenizes what is left and
//! binds it against the command's options:
//!
//! ```
//! use flagtree::{Cli, CliMeta, CommandDescriptor, Dispatch, OptionDescriptor};
//!
//! let mut cli = Cli::new(CliMeta::new("kuro").version("1.0.0"));
//! cli.register(
//!     CommandDescriptor::new(["serve"])
//!         .option(OptionDescriptor::number("port").short("p").default(3000.0))
//!         .handler(|_args| async { Ok(()) }),
//! )
//! .unwrap();
//!
//! match cli.prepare(["serve", "-p", "8080"]).unwrap() {
//!     Dispatch::Run(invocation) => {
//!         assert_eq!(invocation.bindings.number("port"), Some(8080.0))
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! The pieces are usable on their own too: [`tree::build`],
//! [`tree::resolve`], [`raw::parse`] and [`bind::bind`].

pub mod bind;
pub mod cli;
pub mod command;
pub mod option;
pub mod raw;
pub mod tree;

pub use crate::{
    bind::Bindings,
    cli::{Cli, CliMeta, Dispatch, Invocation, Outcome},
    command::{CommandDescriptor, Example, Handler, Meta},
    option::{OptionDescriptor, OptionKind, Value},
    tree::CommandNode,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can stop an invocation before (or while) its handler runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown flag: `{flag}`. Use `--help` for more information")]
    UnknownFlag { flag: String },

    #[error("Extra positional arguments: {}", .extra.join(", "))]
    ExtraPositional { extra: Vec<String> },

    #[error("Option `{long}` and `{short}` cannot be used together as they are the same option")]
    ConflictingAlias { long: String, short: String },

    #[error("Option `{name}` must be a number, got `{value}`")]
    InvalidNumber { name: String, value: String },

    #[error("{} `{name}` is required. Use `--help` for more information", .kind.noun())]
    RequiredMissing { name: String, kind: OptionKind },

    #[error("Could not find a command to run{}", display_path(.path))]
    NoRunnableCommand { path: Vec<String> },

    #[error("Command `{}` is not implemented", .path.join(" "))]
    NotImplemented { path: Vec<String> },

    #[error("Version is required")]
    MissingVersion,

    #[error("Invalid command `{command}`: {reason}")]
    InvalidDescriptor { command: String, reason: String },

    #[error("Command `{command}` failed: {error:#}")]
    Handler { command: String, error: anyhow::Error },
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" under `{}`", path.join(" "))
    }
}
