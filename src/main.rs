mod cli;

use reelforge::{
    config,
    convert::{self, ConvertOptions},
};
use reelforge_probe::{CachingProber, DryRunProber, FfprobeProber, Prober};
use reelforge_reel::{filter, ReelLine, ReelWarning, TokenStream};
use reelforge_timeline::Document;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelforge=trace,reelforge_reel=trace,reelforge_probe=debug,reelforge_timeline=debug"
                .to_string()
        } else {
            "reelforge=info,reelforge_reel=info,reelforge_probe=info".to_string()
        }
    });

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Read {
            ref input,
            ref output,
            relative_paths,
            dry_run,
        } => read_command(input, output.as_deref(), relative_paths, dry_run, config_path),
        Commands::Write {
            ref input,
            ref output,
            relative_paths,
        } => write_command(input, output, relative_paths, config_path),
        Commands::Inspect { ref input } => inspect(input),
        Commands::Probe { ref file, json } => probe_file(file, json, config_path),
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate { ref path } => validate_config(path.as_deref().or(config_path)),
        Commands::Version => {
            println!("reelforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn make_prober(config: &config::Config, dry_run: bool) -> Result<Box<dyn Prober>> {
    let args = config.tools.probe_args.clone();
    if dry_run {
        let command = std::iter::once("ffprobe".to_string()).chain(args);
        return Ok(Box::new(DryRunProber::new().with_command(command)));
    }

    let ffprobe = FfprobeProber::from_config(config.tools.ffprobe_path.as_deref())
        .context("ffprobe is required to read shot lists (install it or pass --dry-run)")?
        .with_args(args);
    Ok(Box::new(CachingProber::new(ffprobe)))
}

/// Log every warning, then summarize on stderr.
fn report_warnings(warnings: &[ReelWarning]) {
    if warnings.is_empty() {
        return;
    }
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    eprintln!("{} warning(s)", warnings.len());
}

fn read_command(
    input: &Path,
    output: Option<&Path>,
    relative_paths: bool,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let prober = make_prober(&config, dry_run)?;
    let options = ConvertOptions {
        relative_paths: relative_paths || config.reel.relative_paths,
        studio: config.studio.resolve(),
    };

    let converted = convert::read_reel_file(input, &options, prober.as_ref())
        .with_context(|| format!("Failed to read shot list {:?}", input))?;
    let document = Document::from(converted.value);

    match output {
        Some(path) => {
            convert::write_document_json(&document, path)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", document.to_json()?),
    }

    report_warnings(&converted.warnings);
    Ok(())
}

fn write_command(
    input: &Path,
    output: &Path,
    relative_paths: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let document = convert::read_document(input)
        .with_context(|| format!("Failed to read timeline {:?}", input))?;
    let options = ConvertOptions {
        relative_paths: relative_paths || config.reel.relative_paths,
        ..Default::default()
    };

    let paths = convert::write_reel_files(&document, output, &options)?;
    for path in &paths {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read shot list {:?}", input))?;

    let mut dropped = Vec::new();
    let tokens = TokenStream::new(filter(&text), &mut dropped);

    for token in tokens {
        let detail = match &token.kind {
            ReelLine::Shot(shot) => format!(
                "shot    \"{}\" {}-{} {}-{} {}",
                shot.kind.name(),
                shot.first,
                shot.last,
                shot.start_frame(),
                shot.end_frame(),
                shot.fps
                    .map_or_else(|| "(probe)".to_string(), |fps| format!("{} fps", fps))
            ),
            ReelLine::Audio(path) => format!("audio   {}", path),
            ReelLine::AudioOffset(offset) => format!("offset  {}", offset),
        };
        println!("{:>5}  {}", token.line, detail);
    }

    for warning in &dropped {
        if let ReelWarning::MalformedLine { line, text } = warning {
            println!("{:>5}  dropped {}", line, text);
        }
    }
    println!("\n{} line(s) dropped", dropped.len());
    Ok(())
}

fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let prober = FfprobeProber::from_config(config.tools.ffprobe_path.as_deref())?
        .with_args(config.tools.probe_args.clone());
    let summary = prober.summary(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("File: {}", summary.path.display());
        println!("Video streams: {}", summary.streams.video);
        println!("Audio streams: {}", summary.streams.audio);
        println!("Duration: {:.3}s", summary.duration_seconds);
        match summary.fps {
            Some(fps) => println!("Frame rate: {:.3} fps", fps),
            None => println!("Frame rate: unknown"),
        }
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = reelforge_probe::check_tools(config.tools.ffprobe_path.as_deref());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Reading shot lists needs ffprobe unless --dry-run is used.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let studio = config.studio.resolve();
    println!(
        "  Studio: {}",
        studio.name.as_deref().unwrap_or("(none, no metadata stamped)")
    );
    println!(
        "  ffprobe: {}",
        config
            .tools
            .ffprobe_path
            .as_deref()
            .map_or_else(|| "from PATH".to_string(), |p| p.display().to_string())
    );
    println!("  Probe args: {}", config.tools.probe_args.join(" "));
    println!("  Relative paths: {}", config.reel.relative_paths);

    Ok(())
}
