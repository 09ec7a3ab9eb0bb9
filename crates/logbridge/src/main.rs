mod output;
mod scope;
mod telemetry;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use logbridge_convert::{Bridge, LogSink, OtlpBatch, md5_hash};
use logbridge_core::clef;
use logbridge_core::config::Config;
use tracing::{info, warn};

use crate::output::{LineSink, LineStyle, flags_json, print_flags_human};
use crate::scope::ScopeFilter;
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "logbridge")]
#[command(about = "Convert structured log events into OpenTelemetry log records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Convert CLEF lines into log records")]
    Convert {
        #[arg(help = "CLEF file to read; stdin when absent or '-'")]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, help = "Comma separated included data flags")]
        include: Option<String>,
        #[arg(long)]
        min_level: Option<String>,
        #[arg(long, help = "Only keep records whose scope matches this glob")]
        scope: Option<String>,
        #[arg(long)]
        service: Option<String>,
    },
    #[command(about = "Print the MD5 hash of a message template")]
    Hash { template: String },
    #[command(about = "List included data flags and whether each is enabled")]
    Flags {
        #[arg(long)]
        include: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Pretty,
    Otlp,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    converted: usize,
    below_level: usize,
    malformed: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    match cli.command {
        Commands::Convert {
            input,
            format,
            output,
            include,
            min_level,
            scope,
            service,
        } => {
            let mut cfg = Config::load().context("load config")?;
            apply_cli_overrides(&mut cfg, include, min_level, service)?;
            let scope = scope
                .map(|p| {
                    glob::Pattern::new(&p).with_context(|| format!("invalid scope glob: {p}"))
                })
                .transpose()?;
            let reader = open_input(input.as_deref())?;
            run_convert(&cfg, reader, format, output.as_deref(), scope)
        }
        Commands::Hash { template } => {
            let hash = md5_hash(&template);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "template": template,
                        "md5": hash,
                    }))?
                );
            } else {
                println!("{hash}");
            }
            Ok(())
        }
        Commands::Flags { include } => {
            let mut cfg = Config::load().context("load config")?;
            apply_cli_overrides(&mut cfg, include, None, None)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&flags_json(cfg.included_data))?
                );
            } else {
                print_flags_human(cfg.included_data);
            }
            Ok(())
        }
    }
}

fn apply_cli_overrides(
    cfg: &mut Config,
    include: Option<String>,
    min_level: Option<String>,
    service: Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = include {
        cfg.included_data = v.parse().context("invalid --include")?;
    }
    if let Some(v) = min_level {
        cfg.min_level = v.parse().context("invalid --min-level")?;
    }
    if let Some(v) = service {
        cfg.service_name = v;
    }
    Ok(())
}

fn open_input(input: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn run_convert(
    cfg: &Config,
    reader: impl BufRead,
    format: OutputFormat,
    output: Option<&Path>,
    scope: Option<glob::Pattern>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Otlp => {
            let Some(output) = output else {
                anyhow::bail!("--format otlp requires --output");
            };
            let sink = ScopeFilter::new(OtlpBatch::new(cfg.service_name.clone()), scope);
            let mut bridge = Bridge::from_config(sink, cfg);
            let summary = convert_events(reader, &mut bridge)?;
            let filter = bridge.into_sink();
            log_summary(&summary, filter.skipped());
            fs::write(output, filter.into_inner().encode_request())
                .with_context(|| format!("write {}", output.display()))?;
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            let (out, terminal): (Box<dyn Write>, bool) = match output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("create {}", path.display()))?;
                    (Box::new(file), false)
                }
                None => (Box::new(io::stdout().lock()), io::stdout().is_terminal()),
            };
            let style = match format {
                OutputFormat::Pretty => LineStyle::Human { color: terminal },
                _ => LineStyle::Json,
            };
            let sink = ScopeFilter::new(LineSink::new(BufWriter::new(out), style), scope);
            let mut bridge = Bridge::from_config(sink, cfg);
            let summary = convert_events(reader, &mut bridge)?;
            let filter = bridge.into_sink();
            log_summary(&summary, filter.skipped());
            filter.into_inner().finish().context("flush output")?;
            Ok(())
        }
    }
}

fn convert_events<S: LogSink>(
    reader: impl BufRead,
    bridge: &mut Bridge<S>,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for (line, event) in clef::read_events(reader) {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                warn!(line, error = %err, "skipping malformed event");
                summary.malformed += 1;
                continue;
            }
        };
        if bridge
            .emit(&event)
            .with_context(|| format!("emit event from line {line}"))?
        {
            summary.converted += 1;
        } else {
            summary.below_level += 1;
        }
    }
    Ok(summary)
}

fn log_summary(summary: &Summary, scope_skipped: usize) {
    info!(
        converted = summary.converted,
        below_level = summary.below_level,
        malformed = summary.malformed,
        scope_skipped,
        "conversion finished"
    );
}
