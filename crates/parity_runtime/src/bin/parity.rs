//! Parity CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use parity_runtime::{Profile, RunManifest, Summary, logging, run_manifest, write_outputs};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    manifest: Option<PathBuf>,
    json: Option<PathBuf>,
    msgpack: Option<PathBuf>,
    filtered: bool,
    log_json: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mabort: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--filtered" => config.filtered = true,
            "--log-json" => config.log_json = true,
            "--json" => {
                let path = args.next().ok_or("--json requires a path")?;
                config.json = Some(PathBuf::from(path));
            }
            "--msgpack" => {
                let path = args.next().ok_or("--msgpack requires a path")?;
                config.msgpack = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}").into());
            }
            path => {
                if config.manifest.is_some() {
                    return Err(format!("unexpected argument: {path}").into());
                }
                config.manifest = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("parity {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init(if config.log_json {
        Profile::Json
    } else {
        Profile::Human
    });

    let path = config.manifest.ok_or("missing MANIFEST argument (see --help)")?;
    let mut manifest = RunManifest::load(&path)?;
    // Command-line paths are relative to the working directory, not the manifest.
    let cwd = env::current_dir()?;
    if let Some(json) = config.json {
        manifest.output.json = Some(cwd.join(json));
    }
    if let Some(msgpack) = config.msgpack {
        manifest.output.msgpack = Some(cwd.join(msgpack));
    }

    let outcome = run_manifest(&manifest)?;
    write_outputs(&manifest, &outcome)?;
    print!(
        "{}",
        Summary::new(&outcome.report).with_problems(config.filtered)
    );
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mparity\x1b[0m - API surface compatibility auditing

\x1b[1mUSAGE:\x1b[0m
    parity [OPTIONS] MANIFEST

\x1b[1mARGUMENTS:\x1b[0m
    MANIFEST          TOML run manifest naming the reference and candidate versions

\x1b[1mOPTIONS:\x1b[0m
    -h, --help        Print help information
    -V, --version     Print version information
    --json PATH       Write the comparison set as JSON
    --msgpack PATH    Write the comparison set as MessagePack
    --filtered        List every symbol that is not fully supported
    --log-json        Emit logs as JSON lines

\x1b[1mENVIRONMENT:\x1b[0m
    RUST_LOG          Log filter (default: parity=info)

\x1b[1mEXAMPLES:\x1b[0m
    parity audit.toml
    parity --filtered --json out/comparison.json audit.toml"
    );
}
