mod cli;

use vidsweep::{
    batch::BatchTranscoder,
    config::{self, Overrides},
};
use vidsweep_av::{FfmpegTranscoder, ToolRegistry, FFMPEG};
use vidsweep_core::error::{EXIT_OK, EXIT_PARTIAL};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidsweep=trace,vidsweep_av=trace,vidsweep_core=debug".to_string()
        } else {
            "vidsweep=info,vidsweep_av=info,vidsweep_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => run_batch(cli.run, cli.config.as_deref()),
        Some(Commands::CheckTools) => check_tools(cli.config.as_deref()),
        Some(Commands::Validate {
            config: config_path,
        }) => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Some(Commands::Version) => {
            println!("vidsweep {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::from(EXIT_OK))
        }
    }
}

fn run_batch(args: RunArgs, config_path: Option<&std::path::Path>) -> Result<ExitCode> {
    let mut config = config::load_config_or_default(config_path)?;

    Overrides {
        source_dir: args.source_dir,
        from_ext: args.from_ext,
        to_ext: args.to_ext,
    }
    .apply(&mut config);
    config.validate()?;

    let registry = ToolRegistry::discover(&config.tools);
    let transcoder = FfmpegTranscoder::new(registry.program(FFMPEG), &config.transcode);
    let batch = BatchTranscoder::new(config.batch.clone(), Arc::new(transcoder)).dry_run(args.dry_run);

    // One file at a time; a current-thread runtime is all the batch needs.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = match rt.block_on(batch.run()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if report.is_success() {
        Ok(ExitCode::from(EXIT_OK))
    } else {
        Ok(ExitCode::from(EXIT_PARTIAL))
    }
}

fn check_tools(config_path: Option<&std::path::Path>) -> Result<ExitCode> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let registry = ToolRegistry::discover(&config.tools);
    let tools = registry.check_all();
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
        println!("Some tools are missing. Install them or set tools.ffmpeg_path in the config.");
    }

    Ok(ExitCode::from(EXIT_OK))
}

fn validate_config(path: Option<&std::path::Path>) -> Result<ExitCode> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    config.validate()?;

    println!("✓ Configuration is valid");
    println!("  Source dir: {}", config.batch.source_dir.display());
    println!("  Convert: {} -> {}", config.batch.from_ext, config.batch.to_ext);
    match config.tools.ffmpeg_path {
        Some(ref p) => println!("  Tool: {}", p.display()),
        None => println!("  Tool: {FFMPEG} (from PATH)"),
    }
    println!("  Arguments: {}", config.transcode.args.join(" "));
    if let Some(timeout) = config.transcode.timeout() {
        println!("  Timeout: {}s", timeout.as_secs());
    }
    for warning in config.warnings() {
        println!("  warning: {warning}");
    }

    Ok(ExitCode::from(EXIT_OK))
}
