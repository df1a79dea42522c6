use std::sync::{Arc, Mutex};

use flagtree::{Cli, CliMeta, CommandDescriptor, Error, OptionDescriptor, Outcome};
use futures::executor::block_on;

fn recording(log: &Arc<Mutex<Vec<String>>>) -> CommandDescriptor {
    let log = Arc::clone(log);
    CommandDescriptor::new(["greet"])
        .option(OptionDescriptor::positional("name"))
        .option(OptionDescriptor::boolean("loud").short("l"))
        .handler(move |args| {
            let log = Arc::clone(&log);
            async move {
                let name = args.str("name").unwrap_or_default();
                let line = if args.bool("loud") { name.to_uppercase() } else { name.to_string() };
                log.lock().unwrap().push(line);
                Ok(())
            }
        })
}

#[test]
fn run_invokes_the_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cli = Cli::new(CliMeta::new("kuro").version("0.1.0"));
    cli.register(recording(&log)).unwrap();

    let outcome = block_on(cli.run(["greet", "kuro"])).unwrap();
    assert_eq!(outcome, Outcome::Completed { path: vec!["greet".to_string()] });
    let outcome = block_on(cli.run(["greet", "-l", "kuro"])).unwrap();
    assert_eq!(outcome, Outcome::Completed { path: vec!["greet".to_string()] });

    let outcome = block_on(cli.run(["greet", "--help"])).unwrap();
    assert_eq!(outcome, Outcome::Help { path: vec!["greet".to_string()] });
    let outcome = block_on(cli.run(["--version"])).unwrap();
    assert_eq!(outcome, Outcome::Version { version: "0.1.0".to_string() });

    assert!(matches!(block_on(cli.run(["greet"])), Err(Error::RequiredMissing { .. })));
    assert_eq!(*log.lock().unwrap(), vec!["kuro", "KURO"]);
}

#[test]
fn handler_failures_name_the_command() {
    let mut cli = Cli::default();
    cli.register(
        CommandDescriptor::new(["db", "migrate"])
            .handler(|_| async { Err(anyhow::anyhow!("connection refused")) }),
    )
    .unwrap();

    let err = block_on(cli.run(["db", "migrate"])).unwrap_err();
    assert_eq!(err.to_string(), "Command `db migrate` failed: connection refused");
}

#[test]
fn the_tree_follows_registrations() {
    let mut cli = Cli::default();
    cli.register(CommandDescriptor::new(["a"])).unwrap();
    assert!(cli.tree().find(&["b"]).is_none());

    cli.register(CommandDescriptor::new(["b", "c"])).unwrap();
    assert!(cli.tree().find(&["b", "c"]).is_some());
    assert!(std::ptr::eq(cli.tree(), cli.tree()));
    assert_eq!(cli.commands().len(), 2);
}

#[test]
fn lenient_mode_accepts_unknown_flags() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut strict = Cli::default();
    strict.register(recording(&log)).unwrap();
    let err = strict.prepare(["greet", "kuro", "--extra"]).unwrap_err();
    assert_eq!(err.to_string(), "Unknown flag: `--extra`. Use `--help` for more information");

    let mut lenient = Cli::new(CliMeta::new("kuro").strict(false));
    lenient.register(recording(&log)).unwrap();
    assert!(lenient.prepare(["greet", "kuro", "--extra"]).is_ok());
}

#[test]
fn invalid_descriptors_are_rejected() {
    let cases = [
        (CommandDescriptor::new(Vec::<String>::new()), "Invalid command `<root>`: path must not be empty"),
        (CommandDescriptor::new(["-x"]), "Invalid command `-x`: path segment can't begin with `-`: `-x`"),
        (CommandDescriptor::new(["a", ""]), "Invalid command `a `: path segments must not be empty"),
        (
            CommandDescriptor::new(["serve"]).option(OptionDescriptor::number("port").default("abc")),
            r#"Invalid command `serve`: default for `port` does not fit kind `number`: Str("abc")"#,
        ),
        (
            CommandDescriptor::new(["serve"])
                .option(OptionDescriptor::boolean("all").short("a"))
                .option(OptionDescriptor::array("add").short("a")),
            "Invalid command `serve`: short alias `a` is used more than once",
        ),
        (
            CommandDescriptor::new(["cp"]).option(OptionDescriptor::positional("src").short("s")),
            "Invalid command `cp`: positional `src` can't have a short alias",
        ),
    ];
    for (command, message) in cases {
        let mut cli = Cli::default();
        let err = cli.register(command).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}
