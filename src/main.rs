use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ck3_weightgen::config::AppConfig;
use ck3_weightgen::core::logging;
use ck3_weightgen::core::pipeline::Pipeline;

/// Rewrites marker-delimited AI placeholder blocks in CK3 event files
/// into conditional weight expressions, from declarative trait and
/// archetype data.
#[derive(Parser)]
#[command(name = "ck3-weightgen")]
#[command(version)]
struct Cli {
    /// Configuration file (default: weightgen.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scan and resolve, write nothing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print resolved weight totals per model and exit
    #[arg(short, long)]
    weights: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let pipeline = Pipeline::new(config);

    if cli.weights {
        print!("{}", pipeline.weight_report()?);
        return Ok(());
    }

    let summary = pipeline.run(cli.dry_run)?;
    print!("{summary}");
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
