use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use binstock::entities::SolveStatus;
use binstock::error::SolveError;
use binstock::io::export::{
    export_bp_instance, export_bp_solution, export_cs_instance, export_cs_solution,
    export_sheet_instance, export_sheet_solution,
};
use binstock::io::ext_repr::{ExtBPInstance, ExtCSInstance, ExtSheetInstance};
use binstock::io::import::{import_bp_instance, import_cs_instance, import_sheet_instance};
use binstock::solvers::{ProblemShape, SolverKind, bnb, colgen, dp, ffd, genetic, knapsack_2d, milp};
use log::info;
use rand::Rng;
use thousands::Separable;

use crate::EPOCH;
use crate::config::DriverConfig;
use crate::io;
use crate::io::output::{BPOutput, CSOutput, SheetOutput, SubsetSumOutput};
use crate::samplers::synthetic;

/// Objective reached by a single solver run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub instance_name: String,
    /// Bins, rolls, pieces or items, depending on the solver
    pub objective: u64,
    /// `None` for solvers that do not tag their result
    pub status: Option<SolveStatus>,
}

/// Loads (or generates) an instance, solves it with `solver` and writes `sol_<name>.json`
/// to `solution_folder` if one is given.
pub fn run(
    solver: SolverKind,
    input_file: Option<&Path>,
    config: &DriverConfig,
    rng: &mut impl Rng,
    solution_folder: Option<&Path>,
) -> Result<RunSummary> {
    let name = match input_file {
        Some(path) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("invalid input file name: {}", path.display()))?
            .to_string(),
        None => format!("synthetic_{solver}"),
    };

    if let Some(folder) = solution_folder {
        if !folder.exists() {
            fs::create_dir_all(folder).with_context(|| {
                format!("could not create solution folder: {}", folder.display())
            })?;
        }
    }
    let solution_path = solution_folder.map(|f| f.join(format!("sol_{name}.json")));

    let summary = match solver.shape() {
        ProblemShape::BinPacking => {
            let ext_instance = match input_file {
                Some(path) => io::read_json::<ExtBPInstance>(path)?,
                None => export_bp_instance(&synthetic::bp_instance(&config.synthetic, rng)?, &name),
            };
            run_bp(solver, ext_instance, config, rng, solution_path.as_deref())?
        }
        ProblemShape::CuttingStock => {
            let ext_instance = match input_file {
                Some(path) => io::read_json::<ExtCSInstance>(path)?,
                None => export_cs_instance(&synthetic::cs_instance(&config.synthetic, rng)?, &name),
            };
            run_cs(solver, ext_instance, config, solution_path.as_deref())?
        }
        ProblemShape::Sheet => {
            let ext_instance = match input_file {
                Some(path) => io::read_json::<ExtSheetInstance>(path)?,
                None => export_sheet_instance(
                    &synthetic::sheet_instance(&config.synthetic, rng)?,
                    &name,
                ),
            };
            run_sheet(ext_instance, solution_path.as_deref())?
        }
    };

    info!(
        "[MAIN] {solver} on {}: objective {} ({})",
        summary.instance_name,
        summary.objective.separate_with_commas(),
        summary
            .status
            .map_or("untagged".to_string(), |s| s.to_string())
    );
    Ok(summary)
}

fn run_bp(
    solver: SolverKind,
    ext_instance: ExtBPInstance,
    config: &DriverConfig,
    rng: &mut impl Rng,
    solution_path: Option<&Path>,
) -> Result<RunSummary> {
    let instance = import_bp_instance(&ext_instance).context("invalid bin packing instance")?;
    info!(
        "[MAIN] bin packing instance {}: {} items, capacity {}, lower bound {}",
        ext_instance.name,
        instance.n_items(),
        instance.capacity,
        instance.lower_bound()
    );

    if solver == SolverKind::SubsetSumDp {
        let table = dp::SubsetSumTable::build(&instance)?;
        let min_items = table.min_items(table.capacity());
        if let Some(path) = solution_path {
            let output = SubsetSumOutput {
                instance: ext_instance.clone(),
                min_items,
                max_reachable: table.max_reachable(),
            };
            io::write_json(&output, path)?;
        }
        let Some(n) = min_items else {
            return Err(SolveError::Infeasible(format!(
                "no subset fills the capacity of {} exactly, closest sum is {}",
                instance.capacity,
                table.max_reachable()
            ))
            .into());
        };
        info!("[MAIN] {n} items fill a bin of capacity {} exactly", instance.capacity);
        return Ok(RunSummary {
            instance_name: ext_instance.name,
            objective: n as u64,
            status: None,
        });
    }

    let solution = match solver {
        SolverKind::Milp => milp::solve(&instance, &config.milp)?,
        SolverKind::FirstFitDecreasing => ffd::solve(&instance)?,
        SolverKind::Genetic => genetic::solve(&instance, &config.ga, rng)?.solution,
        _ => unreachable!("{solver} does not solve bin packing instances"),
    };

    let summary = RunSummary {
        instance_name: ext_instance.name.clone(),
        objective: solution.n_bins() as u64,
        status: Some(solution.status),
    };
    if let Some(path) = solution_path {
        let output = BPOutput {
            solution: export_bp_solution(&solution, &instance, *EPOCH),
            instance: ext_instance,
            solver,
            config: *config,
        };
        io::write_json(&output, path)?;
    }
    Ok(summary)
}

fn run_cs(
    solver: SolverKind,
    ext_instance: ExtCSInstance,
    config: &DriverConfig,
    solution_path: Option<&Path>,
) -> Result<RunSummary> {
    let instance = import_cs_instance(&ext_instance).context("invalid cutting stock instance")?;
    info!(
        "[MAIN] cutting stock instance {}: {} types, {} units of demand, stock length {}, lower bound {}",
        ext_instance.name,
        instance.n_types(),
        instance.total_demand(),
        instance.stock_length,
        instance.lower_bound()
    );

    let solution = match solver {
        SolverKind::BranchAndBound => bnb::solve(&instance, &config.bnb)?.solution,
        SolverKind::ColumnGeneration => colgen::solve(&instance, &config.colgen)?.solution,
        _ => unreachable!("{solver} does not solve cutting stock instances"),
    };

    let summary = RunSummary {
        instance_name: ext_instance.name.clone(),
        objective: solution.total_rolls(),
        status: Some(solution.status),
    };
    if let Some(path) = solution_path {
        let output = CSOutput {
            solution: export_cs_solution(&solution, &instance, *EPOCH),
            instance: ext_instance,
            solver,
            config: *config,
        };
        io::write_json(&output, path)?;
    }
    Ok(summary)
}

fn run_sheet(ext_instance: ExtSheetInstance, solution_path: Option<&Path>) -> Result<RunSummary> {
    let instance = import_sheet_instance(&ext_instance).context("invalid sheet instance")?;
    let solution = knapsack_2d::solve(&instance)?;

    let summary = RunSummary {
        instance_name: ext_instance.name.clone(),
        objective: solution.n_pieces() as u64,
        status: None,
    };
    if let Some(path) = solution_path {
        let output = SheetOutput {
            solution: export_sheet_solution(&solution, &instance, *EPOCH),
            instance: ext_instance,
        };
        io::write_json(&output, path)?;
    }
    Ok(summary)
}
