use std::time::Instant;

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("DEMO");
        cmd!(sh, "cargo run --example kuro -- serve -p 8080 -a one --allow two").run()?;
    }

    {
        let _s = section("PUBLISH");

        let pkgid = cmd!(sh, "cargo pkgid -p flagtree").read()?;
        let version = pkgid.rsplit(['#', '@']).next().unwrap_or_default().to_string();
        let tag = format!("v{version}");

        let current_branch = cmd!(sh, "git branch --show-current").read()?;
        let tag_exists =
            cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);

        if current_branch == "master" && !tag_exists {
            cmd!(sh, "git tag v{version}").run()?;

            cmd!(sh, "cargo publish -p flagtree").run()?;
            cmd!(sh, "git push --tags").run()?;
        }
    }

    Ok(())
}

/// A GitHub Actions log group, closed and timed on drop.
struct Section {
    name: &'static str,
    start: Instant,
}

fn section(name: &'static str) -> Section {
    println!("::group::{name}");
    Section { name, start: Instant::now() }
}

impl Drop for Section {
    fn drop(&mut self) {
        eprintln!("{}: {:.2?}", self.name, self.start.elapsed());
        println!("::endgroup::");
    }
}
