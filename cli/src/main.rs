use std::io::{BufRead, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_args_core::{ParseProfile, ParsedArguments, join_quoted, split};
use tracing::debug;

/// Output formats for word lists.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SplitFormat {
    Json,
    Yaml,
    /// Re-quoted command line that splits back to the same words.
    Shell,
}

/// Output formats for flag mappings.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum MapFormat {
    Json,
    Yaml,
    /// Command-line rendering of the active flags.
    Shell,
}

/// Value types a flag can be read as.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ValueKind {
    String,
    Int,
    Float,
    Bool,
}

#[derive(Debug, Parser)]
#[command(name = "cmdargs")]
#[command(about = "Split and parse quote-aware command arguments")]
struct Cli {
    /// Emit debug logs on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split text into words.
    Split(SplitArgs),
    /// Parse text into flags and print the active mapping.
    Parse(ParseArgs),
    /// Read one flag with a given type.
    Query(QueryArgs),
    /// Split each line from stdin until end of input.
    Repl,
}

#[derive(Debug, Args)]
struct SplitArgs {
    /// Text to split (read from stdin when omitted). Pass it after `--`
    /// when it starts with a dash.
    text: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: SplitFormat,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Argument text (read from stdin when omitted). Pass it after `--`
    /// when it starts with a dash.
    text: Option<String>,
    /// YAML parse profile applied after parsing.
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Context to activate before reading.
    #[arg(long)]
    context: Option<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: MapFormat,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Flag name to read.
    name: String,
    #[command(flatten)]
    source: SourceArgs,
    /// Type each value is read as.
    #[arg(long = "type", default_value = "string")]
    kind: ValueKind,
    /// Print only the most recent value.
    #[arg(long)]
    last: bool,
    /// Value printed when the flag is absent.
    #[arg(long)]
    default: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Split(args) => run_split(args),
        Command::Parse(args) => run_parse(args),
        Command::Query(args) => run_query(args),
        Command::Repl => run_repl(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "command_args_core=debug,cmdargs=debug"
    } else {
        "command_args_core=warn,cmdargs=warn"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(text: Option<String>) -> Result<String, String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(buf)
        }
    }
}

fn load_arguments(source: SourceArgs) -> Result<ParsedArguments, String> {
    let text = read_text(source.text)?;
    let mut args = ParsedArguments::parse(&text).map_err(|e| e.to_string())?;

    if let Some(path) = &source.profile {
        let profile = ParseProfile::load(path)
            .map_err(|e| format!("Failed to load profile '{}': {e}", path.display()))?;
        profile.apply(&mut args).map_err(|e| e.to_string())?;
    }

    if let Some(context) = &source.context {
        if args.context(context).is_none() {
            return Err(format!("Unknown context '{context}'"));
        }
        args.set_context(Some(context));
    }

    debug!(flags = args.len(), "Loaded arguments");
    Ok(args)
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

fn run_split(args: SplitArgs) -> Result<(), String> {
    let text = read_text(args.text)?;
    let words = split(&text).map_err(|e| e.to_string())?;
    let output = match args.format {
        SplitFormat::Json => serde_json::to_string_pretty(&words)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        SplitFormat::Yaml => {
            serde_yaml::to_string(&words).map_err(|e| format!("YAML serialization failed: {e}"))?
        }
        SplitFormat::Shell => join_quoted(&words),
    };
    println!("{}", output.trim_end());
    Ok(())
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let parsed = load_arguments(args.source)?;
    let output = match args.format {
        MapFormat::Json => serde_json::to_string_pretty(&parsed)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        MapFormat::Yaml => {
            serde_yaml::to_string(&parsed).map_err(|e| format!("YAML serialization failed: {e}"))?
        }
        MapFormat::Shell => parsed.to_string(),
    };
    println!("{}", output.trim_end());
    Ok(())
}

// ---------------------------------------------------------------------------
// query
// ---------------------------------------------------------------------------

fn run_query(args: QueryArgs) -> Result<(), String> {
    let parsed = load_arguments(args.source)?;
    let values = match args.kind {
        ValueKind::String => read_values(&parsed, &args.name, args.last, |s| {
            Ok::<_, std::convert::Infallible>(serde_json::Value::from(s))
        }),
        ValueKind::Int => read_values(&parsed, &args.name, args.last, |s| {
            s.parse::<i64>().map(serde_json::Value::from)
        }),
        ValueKind::Float => read_values(&parsed, &args.name, args.last, |s| {
            s.parse::<f64>().map(serde_json::Value::from)
        }),
        ValueKind::Bool => read_values(&parsed, &args.name, args.last, |s| {
            s.parse::<bool>().map(serde_json::Value::from)
        }),
    }
    .map_err(|e| e.to_string())?;

    match values {
        Some(value) => println!("{value}"),
        None => match args.default {
            Some(default) => println!("{default}"),
            None => return Err(format!("Flag '{}' is not set", args.name)),
        },
    }
    Ok(())
}

fn read_values<E, F>(
    parsed: &ParsedArguments,
    name: &str,
    last: bool,
    coerce: F,
) -> command_args_core::Result<Option<serde_json::Value>>
where
    E: std::fmt::Display,
    F: FnMut(&str) -> Result<serde_json::Value, E>,
{
    if last {
        parsed.last_as(name, coerce)
    } else {
        let values = parsed.get_as(name, coerce)?;
        Ok((!values.is_empty()).then(|| serde_json::Value::Array(values)))
    }
}

// ---------------------------------------------------------------------------
// repl
// ---------------------------------------------------------------------------

fn run_repl() -> Result<(), String> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("Failed to read stdin: {err}"))?;
        match split(&line) {
            Ok(words) => println!("{words:?}"),
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}
