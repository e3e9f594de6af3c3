//! Purpose: `jsonseam` CLI entry point for inspecting and using the selected JSON backend.
//! Role: Binary crate root; parses args, runs one command, emits JSON on stdout.
//! Invariants: Command output on stdout is a single JSON document followed by a newline.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use jsonseam::backend::builtin_names;
use jsonseam::{
    Encoding, Error, ErrorKind, Handler, Selector, SelectorConfig, SmokeTest, select_handler,
    to_exit_code,
};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonseam",
    version,
    about = "Inspect and use the fastest JSON backend linked into this build",
    long_about = None,
    after_help = r#"EXAMPLES
  $ jsonseam which
  $ jsonseam probe
  $ echo '{"answer": 42}' | jsonseam fmt
  $ jsonseam --backend serde_json fmt payload.json

ENVIRONMENT
  JSONSEAM_BACKENDS   comma-separated backend preference (baseline always last)
  JSONSEAM_SMOKE      strict|loose smoke test (default strict)
  RUST_LOG            log filter for stderr diagnostics (default warn)"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        help = "Prefer only this backend, falling back to serde_json: sonic-rs|simd-json|serde_json"
    )]
    backend: Option<String>,
    #[arg(long, value_enum, help = "Smoke test strictness (overrides JSONSEAM_SMOKE)")]
    smoke: Option<SmokeArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Print the selected backend")]
    Which,
    #[command(about = "Probe every candidate backend and report its status")]
    Probe,
    #[command(about = "Decode JSON from FILE or stdin and re-encode it with the selected backend")]
    Fmt(FmtArgs),
}

#[derive(Args)]
struct FmtArgs {
    #[arg(help = "Input file (default: stdin)", value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
    #[arg(long, default_value = "utf-8", help = "Output encoding label")]
    encoding: String,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SmokeArg {
    Strict,
    Loose,
}

impl From<SmokeArg> for SmokeTest {
    fn from(value: SmokeArg) -> Self {
        match value {
            SmokeArg::Strict => SmokeTest::Strict,
            SmokeArg::Loose => SmokeTest::Loose,
        }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `jsonseam --help` for usage."));
            }
        },
    };

    let config = resolve_config(&cli)?;
    match &cli.command {
        Command::Which => {
            let handler = resolve_handler(config.as_ref());
            emit_json(&json!({ "backend": handler.name() }))?;
        }
        Command::Probe => {
            let config = config.unwrap_or_else(SelectorConfig::from_env);
            let probes = Selector::from_config(&config).probe();
            let value = serde_json::to_value(&probes).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode probe report")
                    .with_source(err)
            })?;
            emit_json(&value)?;
        }
        Command::Fmt(args) => {
            let handler = resolve_handler(config.as_ref());
            fmt_command(&handler, args)?;
        }
    }
    Ok(0)
}

/// Returns an explicit config only when flags override the environment.
fn resolve_config(cli: &Cli) -> Result<Option<SelectorConfig>, Error> {
    if cli.backend.is_none() && cli.smoke.is_none() {
        return Ok(None);
    }
    let mut config = SelectorConfig::from_env();
    if let Some(name) = &cli.backend {
        if !builtin_names().contains(&name.as_str()) {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown backend: {name}"))
                .with_hint(format!("Known backends: {}.", builtin_names().join(", "))));
        }
        config = config.with_order([name.as_str()]);
    }
    if let Some(smoke) = cli.smoke {
        config = config.with_smoke(smoke.into());
    }
    Ok(Some(config))
}

fn resolve_handler(config: Option<&SelectorConfig>) -> Handler {
    match config {
        Some(config) => Selector::from_config(config).select(),
        None => select_handler(),
    }
}

fn fmt_command(handler: &Handler, args: &FmtArgs) -> Result<(), Error> {
    let input = match &args.input {
        Some(path) => fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        })?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            buf
        }
    };
    let encoding = match args.encoding.parse::<Encoding>() {
        Ok(encoding) => encoding,
        Err(never) => match never {},
    };
    let value = handler.decode(&input)?;
    let mut output = handler.encode_with(&value, &encoding)?;
    output.push(b'\n');
    write_stdout(&output)
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let mut text = serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    text.push('\n');
    write_stdout(text.as_bytes())
}

fn write_stdout(bytes: &[u8]) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write stdout")
                .with_source(err)
        })
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(err.kind().as_str()));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or(err.kind().as_str())),
    );
    if let Some(backend) = err.backend() {
        inner.insert("backend".to_string(), json!(backend));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
