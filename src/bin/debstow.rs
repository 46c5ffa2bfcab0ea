use std::{env, process::Command};

use anyhow::Result;
use clap::{App, AppSettings, Arg};
use debstow::{enumerate, install, sync, Config, HttpTransport};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("debstow")
        .version("0.1.0")
        .about("Installs and runs Debian packages from an unprivileged prefix")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(App::new("update").about("Refresh the package index"))
        .subcommand(App::new("list").about("List available packages"))
        .subcommand(
            App::new("install")
                .about("Install packages into the prefix")
                .arg(
                    Arg::new("packages")
                        .value_name("PACKAGE")
                        .help("The packages to install")
                        .takes_value(true)
                        .multiple_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            App::new("run")
                .about("Run a command with the prefix on PATH")
                .setting(AppSettings::TrailingVarArg)
                .arg(
                    Arg::new("command")
                        .value_name("COMMAND")
                        .help("The command line to execute")
                        .takes_value(true)
                        .multiple_values(true)
                        .required(true),
                ),
        )
        .get_matches();

    let config = Config::from_host()?;
    let transport = HttpTransport::new();

    match matches.subcommand() {
        Some(("update", _)) => {
            sync(&config, &transport)?;
        }
        Some(("list", _)) => {
            sync(&config, &transport)?;
            for entry in enumerate(&config.index_path())? {
                let (name, description) = entry?;
                println!("{}\t{}", name, description);
            }
        }
        Some(("install", sub)) => {
            let names: Vec<String> = sub
                .values_of("packages")
                .into_iter()
                .flatten()
                .map(str::to_owned)
                .collect();
            install(&config, &transport, &names)?;
        }
        Some(("run", sub)) => {
            let argv: Vec<String> = sub
                .values_of("command")
                .into_iter()
                .flatten()
                .map(str::to_owned)
                .collect();
            run_in_prefix(&config, &argv)?;
        }
        _ => unreachable!(),
    }

    Ok(())
}

/// Execute a command with the prefix's bin directories ahead of PATH and
/// its library directory on LD_LIBRARY_PATH, mirroring the child's exit
/// code.
fn run_in_prefix(config: &Config, argv: &[String]) -> Result<()> {
    let mut search: Vec<String> = config
        .bin_dirs()
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();
    if let Ok(inherited) = env::var("PATH") {
        search.push(inherited);
    }

    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .env("PATH", search.join(":"))
        .env("LD_LIBRARY_PATH", config.lib_dir())
        .status()?;

    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
