#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use binstock::error::SolveError;
    use binstock::solvers::SolverKind;
    use binstock_cli::config::DriverConfig;
    use binstock_cli::driver;
    use binstock_cli::samplers::synthetic::{self, SizeDistribution, SyntheticConfig};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small_config() -> DriverConfig {
        let mut config = DriverConfig::default();
        config.synthetic = SyntheticConfig {
            n_items: 12,
            n_types: 4,
            max_demand: 2,
            n_pieces: 5,
            sheet_width: 30,
            sheet_height: 30,
            ..Default::default()
        };
        config.milp.time_limit_ms = Some(10_000);
        config.ga.population_size = 20;
        config.ga.generations = 20;
        config
    }

    fn temp_folder(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("binstock_{name}_{}", std::process::id()))
    }

    #[test_case(SolverKind::Milp; "milp")]
    #[test_case(SolverKind::SubsetSumDp; "subset sum")]
    #[test_case(SolverKind::BranchAndBound; "branch and bound")]
    #[test_case(SolverKind::ColumnGeneration; "column generation")]
    #[test_case(SolverKind::FirstFitDecreasing; "first fit decreasing")]
    #[test_case(SolverKind::Genetic; "genetic")]
    #[test_case(SolverKind::Knapsack2D; "2d knapsack")]
    fn synthetic_run_is_reproducible(solver: SolverKind) {
        init_logger();
        let config = small_config();
        let run = || {
            let mut rng = SmallRng::seed_from_u64(0);
            driver::run(solver, None, &config, &mut rng, None).map_err(|e| e.to_string())
        };
        let first = run();
        //a synthetic subset-sum instance may have no exact fill
        if solver != SolverKind::SubsetSumDp {
            assert!(first.is_ok());
        }
        if let Ok(summary) = &first {
            assert_eq!(summary.instance_name, format!("synthetic_{solver}"));
        }
        assert_eq!(first, run());
    }

    #[test]
    fn solution_file_contains_instance_and_solution() {
        init_logger();
        let folder = temp_folder("ffd");
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(0);
        let summary = driver::run(
            SolverKind::FirstFitDecreasing,
            None,
            &config,
            &mut rng,
            Some(folder.as_path()),
        )
        .unwrap();

        let path = folder.join("sol_synthetic_first-fit-decreasing.json");
        let json: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "synthetic_first-fit-decreasing");
        assert_eq!(json["items"].as_array().unwrap().len(), 12);
        assert_eq!(json["solution"]["n_bins"], summary.objective);
        assert_eq!(json["solver"], "first-fit-decreasing");

        // the written instance can be fed back to the driver
        let mut rng = SmallRng::seed_from_u64(1);
        let rerun = driver::run(
            SolverKind::FirstFitDecreasing,
            Some(path.as_path()),
            &config,
            &mut rng,
            None,
        )
        .unwrap();
        assert_eq!(rerun.objective, summary.objective);

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[test]
    fn missing_input_file() {
        init_logger();
        let mut rng = SmallRng::seed_from_u64(0);
        let missing = PathBuf::from("does/not/exist.json");
        assert!(
            driver::run(
                SolverKind::FirstFitDecreasing,
                Some(missing.as_path()),
                &small_config(),
                &mut rng,
                None
            )
            .is_err()
        );
    }

    #[test]
    fn unreachable_capacity_is_infeasible() {
        init_logger();
        let folder = temp_folder("dp");
        std::fs::create_dir_all(&folder).unwrap();
        let input = folder.join("unreachable.json");
        let json = r#"{"name": "unreachable", "capacity": 7, "items": [{"id": 0, "size": 3}, {"id": 1, "size": 5}]}"#;
        std::fs::write(&input, json).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let err = driver::run(
            SolverKind::SubsetSumDp,
            Some(input.as_path()),
            &small_config(),
            &mut rng,
            Some(folder.as_path()),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolveError>(),
            Some(SolveError::Infeasible(_))
        ));

        let written: serde_json::Value = serde_json::from_reader(
            std::fs::File::open(folder.join("sol_unreachable.json")).unwrap(),
        )
        .unwrap();
        assert!(written["min_items"].is_null());
        assert_eq!(written["max_reachable"], 5);

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let json = r#"{"prng_seed": 3, "ga": {"generations": 5}}"#;
        let config: DriverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.prng_seed, Some(3));
        assert_eq!(config.ga.generations, 5);
        assert_eq!(config.ga.population_size, 100);
        assert_eq!(config.synthetic, SyntheticConfig::default());
    }

    #[test]
    fn normal_distribution_from_json() {
        let json = r#"{"size_distribution": {"type": "clipped_normal", "mean": 0.5, "std_dev": 0.1}}"#;
        let config: SyntheticConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.size_distribution,
            SizeDistribution::ClippedNormal {
                mean: 0.5,
                std_dev: 0.1
            }
        );
    }

    #[test]
    fn synthetic_sizes_are_in_range() {
        let config = SyntheticConfig::default();
        let mut rng = SmallRng::seed_from_u64(0);

        let bp = synthetic::bp_instance(&config, &mut rng).unwrap();
        assert_eq!(bp.n_items(), config.n_items);
        assert!(bp.sizes().all(|s| (1..=config.max_item_size).contains(&s)));

        let cs = synthetic::cs_instance(&config, &mut rng).unwrap();
        assert!(cs.demands().all(|d| (1..=config.max_demand).contains(&d)));
        assert!(cs.validate().is_ok());

        let sheet = synthetic::sheet_instance(&config, &mut rng).unwrap();
        assert!(
            sheet
                .pieces
                .iter()
                .all(|p| p.width <= config.max_piece_side && p.height <= config.max_piece_side)
        );
    }
}
