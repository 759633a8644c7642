use anyhow::Result;
use binstock_cli::config::DriverConfig;
use binstock_cli::io::cli::Cli;
use binstock_cli::{driver, io};
use clap::Parser as ClapParser;
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            DriverConfig::default()
        }
        Some(config_file) => io::read_json::<DriverConfig>(config_file)?,
    };
    info!("[MAIN] Successfully parsed DriverConfig: {config:?}");

    if args.input_file.is_none() {
        info!(
            "[MAIN] No input file provided, generating a synthetic instance for {}",
            args.solver
        );
    }

    let mut rng = match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    driver::run(
        args.solver,
        args.input_file.as_deref(),
        &config,
        &mut rng,
        args.solution_folder.as_deref(),
    )?;

    Ok(())
}
