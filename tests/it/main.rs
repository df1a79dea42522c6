mod cli;

use expect_test::{expect, Expect};
use flagtree::{Cli, CliMeta, CommandDescriptor, Dispatch, Meta, OptionDescriptor};

fn kuro() -> Cli {
    let mut cli = Cli::new(CliMeta::new("kuro").app_name("Kurogashi").version("1.0.3"));
    cli.root(
        CommandDescriptor::new(Vec::<String>::new())
            .meta(Meta::new("create a new package").example("Create a package", "kuro"))
            .option(OptionDescriptor::positional("pos").optional())
            .option(OptionDescriptor::string("test"))
            .option(OptionDescriptor::number("number"))
            .option(OptionDescriptor::boolean("isTrue").short("t"))
            .option(OptionDescriptor::array("array"))
            .handler(|_| async { Ok(()) }),
    )
    .unwrap();
    cli.register_all(vec![
        CommandDescriptor::new(["test", "hello"])
            .option(OptionDescriptor::positional("name"))
            .option(OptionDescriptor::boolean("no-tsconfig"))
            .handler(|_| async { Ok(()) }),
        CommandDescriptor::new(["test", "goodbye"]).handler(|_| async { Ok(()) }),
        CommandDescriptor::new(["test", "goodbye", "bye"])
            .option(OptionDescriptor::positional("pos"))
            .handler(|_| async { Ok(()) }),
        CommandDescriptor::new(["test", "goodbye", "bye", "why"]),
        CommandDescriptor::new(["serve"])
            .option(OptionDescriptor::number("port").short("p").default(3000))
            .option(OptionDescriptor::string("host").short("H"))
            .option(OptionDescriptor::array("allow").short("a"))
            .option(OptionDescriptor::boolean("verbose"))
            .handler(|_| async { Ok(()) }),
    ])
    .unwrap();
    cli
}

fn check(cli: &Cli, args: &str, expect: Expect) {
    let args = args.split_ascii_whitespace().map(String::from).collect::<Vec<_>>();
    match cli.prepare(args) {
        Ok(Dispatch::Run(invocation)) => {
            let bound = invocation
                .bindings
                .iter()
                .map(|(name, value)| format!(" {name}={value:?}"))
                .collect::<String>();
            expect.assert_eq(&format!("{:?}{bound}", invocation.path));
        }
        Ok(other) => expect.assert_eq(&format!("{other:?}")),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

#[test]
fn smoke() {
    let cli = kuro();
    check(&cli, "test hello bob", expect![[r#"["test", "hello"] name=Str("bob") no-tsconfig=Bool(false)"#]]);
    check(
        &cli,
        "test hello bob --no-tsconfig",
        expect![[r#"["test", "hello"] name=Str("bob") no-tsconfig=Bool(true)"#]],
    );
    check(
        &cli,
        "test hello --no-tsconfig bob",
        expect![[r#"["test", "hello"] name=Str("bob") no-tsconfig=Bool(true)"#]],
    );
    check(
        &cli,
        "test hello --no-tsconfig false bob",
        expect![[r#"["test", "hello"] name=Str("bob") no-tsconfig=Bool(false)"#]],
    );
    check(
        &cli,
        "test hello",
        expect!["Positional argument `name` is required. Use `--help` for more information"],
    );
    check(&cli, "test hello a b", expect!["Extra positional arguments: b"]);
    check(
        &cli,
        "test hello bob --nope",
        expect!["Unknown flag: `--nope`. Use `--help` for more information"],
    );
    check(&cli, "test goodbye bye me", expect![[r#"["test", "goodbye", "bye"] pos=Str("me")"#]]);
}

#[test]
fn grouping_and_unimplemented() {
    let cli = kuro();
    check(&cli, "test", expect!["Could not find a command to run under `test`"]);
    check(&cli, "test goodbye bye why", expect!["Command `test goodbye bye why` is not implemented"]);

    let bare = Cli::new(CliMeta::new("bare"));
    check(&bare, "anything", expect!["Could not find a command to run"]);
}

#[test]
fn global_flags() {
    let cli = kuro();
    check(&cli, "test --help", expect![[r#"Help { path: ["test"] }"#]]);
    check(&cli, "test hello -h", expect![[r#"Help { path: ["test", "hello"] }"#]]);
    check(&cli, "-v", expect![[r#"Version { version: "1.0.3" }"#]]);
    check(&cli, "-h --version", expect![[r#"Help { path: [] }"#]]);
    check(&cli, "test hello -- --help", expect![[r#"["test", "hello"] name=Str("--help") no-tsconfig=Bool(false)"#]]);

    let unversioned = Cli::new(CliMeta::new("bare"));
    check(&unversioned, "--version", expect!["Version is required"]);
}

#[test]
fn root_command() {
    let cli = kuro();
    check(&cli, "", expect![[r#"[] isTrue=Bool(false) array=List([])"#]]);
    check(
        &cli,
        "-t x --number 4",
        expect![[r#"[] pos=Str("x") number=Num(4.0) isTrue=Bool(true) array=List([])"#]],
    );
    check(
        &cli,
        "--test a --array 1 --array 2",
        expect![[r#"[] test=Str("a") isTrue=Bool(false) array=List(["1", "2"])"#]],
    );
}

#[test]
fn serve_options() {
    let cli = kuro();
    check(&cli, "serve", expect![[r#"["serve"] port=Num(3000.0) allow=List([]) verbose=Bool(false)"#]]);
    check(&cli, "serve -p 8080", expect![[r#"["serve"] port=Num(8080.0) allow=List([]) verbose=Bool(false)"#]]);
    check(
        &cli,
        "serve -p=-1 --verbose",
        expect![[r#"["serve"] port=Num(-1.0) allow=List([]) verbose=Bool(true)"#]],
    );
    check(
        &cli,
        "serve --allow x --allow y -a z",
        expect![[r#"["serve"] port=Num(3000.0) allow=List(["x", "y", "z"]) verbose=Bool(false)"#]],
    );
    check(
        &cli,
        "serve --host a --host b",
        expect![[r#"["serve"] port=Num(3000.0) host=Str("b") allow=List([]) verbose=Bool(false)"#]],
    );
    check(
        &cli,
        "serve --port 1 -p 2",
        expect!["Option `--port` and `-p` cannot be used together as they are the same option"],
    );
    check(&cli, "serve --port abc", expect!["Option `port` must be a number, got `abc`"]);
    check(&cli, "serve -- --port", expect!["Extra positional arguments: --port"]);
}
