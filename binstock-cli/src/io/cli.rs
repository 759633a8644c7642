use std::path::PathBuf;

use binstock::solvers::SolverKind;
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Solution strategy: milp, dp, bnb, colgen, ffd, ga or k2d
    #[arg(long, value_name = "SOLVER")]
    pub solver: SolverKind,
    /// JSON instance matching the solver. A synthetic instance is generated if omitted
    #[arg(short, long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,
    /// Folder to write the solution to. Nothing is written if omitted
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: Option<PathBuf>,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
