use flagtree::{Cli, CliMeta, CommandDescriptor, Meta, OptionDescriptor, Outcome};
use tracing_subscriber::EnvFilter;

fn commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(["test", "hello"])
            .meta(Meta::new("This command will say hello to you."))
            .option(OptionDescriptor::positional("name"))
            .option(
                OptionDescriptor::boolean("no-tsconfig")
                    .description("Do not write the tsconfig file"),
            )
            .handler(|args| async move {
                let name = args.str("name").unwrap_or_default();
                println!("hello {name} {}!", args.bool("no-tsconfig"));
                Ok(())
            }),
        CommandDescriptor::new(["test", "goodbye"])
            .meta(Meta::new("This command will say goodbye to you."))
            .handler(|_| async {
                println!("Goodbye, world!");
                Ok(())
            }),
        CommandDescriptor::new(["test", "goodbye", "bye"])
            .meta(Meta::new("This command will say goodbye byeee to you."))
            .option(OptionDescriptor::positional("pos"))
            .handler(|args| async move {
                println!("Goodbye, {}!", args.str("pos").unwrap_or_default());
                Ok(())
            }),
        CommandDescriptor::new(["serve"])
            .meta(Meta::new("Pretend to start a server.").category("Network"))
            .option(OptionDescriptor::number("port").short("p").default(3000))
            .option(OptionDescriptor::array("allow").short("a"))
            .handler(|args| async move {
                let port = args.number("port").unwrap_or_default();
                println!("listening on {port}, allowing {:?}", args.list("allow"));
                Ok(())
            }),
    ]
}

fn main() {
    let filter = EnvFilter::try_from_env("FLAGTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut cli = Cli::new(
        CliMeta::new("kuro")
            .app_name("Kurogashi")
            .description("Declarative commands, typed options")
            .version("1.0.3"),
    );
    if let Err(err) = cli.register_all(commands()) {
        eprintln!("{err}");
        std::process::exit(2)
    }

    match futures::executor::block_on(cli.run(std::env::args().skip(1))) {
        Ok(Outcome::Help { path }) => {
            let meta = cli.meta();
            println!("{} - {}", meta.app_name, meta.description);
            let node = cli.tree().find(&path).unwrap_or_else(|| cli.tree());
            for command in node.commands() {
                let description =
                    command.descriptor.as_ref().map(|it| it.meta.description.as_str()).unwrap_or_default();
                println!("  {} {}\n      {description}", meta.binary_name, command.path.join(" "));
            }
        }
        Ok(Outcome::Version { version }) => println!("{} v{version}", cli.meta().app_name),
        Ok(Outcome::Completed { .. }) => (),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1)
        }
    }
}
