use std::time::Instant;

use itertools::Itertools;

use crate::entities::{
    BPInstance, BPSolution, CSInstance, CSSolution, SheetInstance, SheetSolution,
};
use crate::io::ext_repr::{
    ExtBPInstance, ExtBPSolution, ExtBin, ExtCSInstance, ExtCSSolution, ExtDemandItem, ExtItem,
    ExtPattern, ExtPiece, ExtPlacement, ExtSheetInstance, ExtSheetSolution,
};

/// Exports a Bin Packing solution out of the library
pub fn export_bp_solution(
    solution: &BPSolution,
    instance: &BPInstance,
    epoch: Instant,
) -> ExtBPSolution {
    ExtBPSolution {
        n_bins: solution.n_bins(),
        lower_bound: instance.lower_bound(),
        bins: solution
            .bins
            .iter()
            .map(|b| ExtBin {
                item_ids: b.item_ids.clone(),
                load: b.load,
            })
            .collect(),
        density: solution.density(instance),
        status: solution.status,
        run_time_sec: solution.time_stamp.duration_since(epoch).as_secs_f64(),
    }
}

/// Exports a Cutting Stock solution out of the library
pub fn export_cs_solution(
    solution: &CSSolution,
    instance: &CSInstance,
    epoch: Instant,
) -> ExtCSSolution {
    ExtCSSolution {
        total_rolls: solution.total_rolls(),
        lp_bound: solution.lp_bound,
        patterns: solution
            .patterns
            .iter()
            .map(|(pattern, usage)| ExtPattern {
                counts: pattern.counts.clone(),
                usage: *usage,
                waste: pattern.waste(instance),
            })
            .collect(),
        waste: solution.waste(instance),
        status: solution.status,
        run_time_sec: solution.time_stamp.duration_since(epoch).as_secs_f64(),
    }
}

/// Exports a sheet cutting solution out of the library
pub fn export_sheet_solution(
    solution: &SheetSolution,
    instance: &SheetInstance,
    epoch: Instant,
) -> ExtSheetSolution {
    ExtSheetSolution {
        n_pieces: solution.n_pieces(),
        placements: solution
            .placements
            .iter()
            .map(|p| ExtPlacement {
                piece_id: p.piece_id,
                x: p.x,
                y: p.y,
            })
            .collect(),
        density: solution.density(instance),
        run_time_sec: solution.time_stamp.duration_since(epoch).as_secs_f64(),
    }
}

/// Exports a Bin Packing instance, e.g. one that was generated, so it can be reused
pub fn export_bp_instance(instance: &BPInstance, name: &str) -> ExtBPInstance {
    ExtBPInstance {
        name: name.to_string(),
        capacity: instance.capacity as i64,
        items: instance
            .items
            .iter()
            .map(|item| ExtItem {
                id: item.id as u64,
                size: item.size as i64,
            })
            .collect_vec(),
    }
}

/// Exports a Cutting Stock instance
pub fn export_cs_instance(instance: &CSInstance, name: &str) -> ExtCSInstance {
    ExtCSInstance {
        name: name.to_string(),
        stock_length: instance.stock_length as i64,
        items: instance
            .items
            .iter()
            .map(|(item, demand)| ExtDemandItem {
                id: item.id as u64,
                length: item.size as i64,
                demand: *demand,
            })
            .collect_vec(),
    }
}

/// Exports a sheet cutting instance
pub fn export_sheet_instance(instance: &SheetInstance, name: &str) -> ExtSheetInstance {
    ExtSheetInstance {
        name: name.to_string(),
        width: instance.width as i64,
        height: instance.height as i64,
        pieces: instance
            .pieces
            .iter()
            .map(|p| ExtPiece {
                id: p.id as u64,
                width: p.width as i64,
                height: p.height as i64,
            })
            .collect_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bin, Pattern, SolveStatus};
    use crate::io::import::{import_bp_instance, import_cs_instance};

    #[test]
    fn generated_instance_can_be_imported_again() {
        let instance = CSInstance::new(&[45, 36], &[4, 0], 100).unwrap();
        let ext = export_cs_instance(&instance, "generated");
        let json = serde_json::to_string(&ext).unwrap();
        let reimported = import_cs_instance(&serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(reimported.items, instance.items);
        assert_eq!(reimported.stock_length, 100);
    }

    #[test]
    fn bin_packing_solution_statistics() {
        let instance = import_bp_instance(&export_bp_instance(
            &BPInstance::new([60, 40, 50], 100),
            "bp",
        ))
        .unwrap();
        let bins = vec![
            Bin {
                item_ids: vec![0, 1],
                load: 100,
            },
            Bin::with_item(2, 50),
        ];
        let epoch = Instant::now();
        let ext = export_bp_solution(
            &BPSolution::new(bins, SolveStatus::Optimal),
            &instance,
            epoch,
        );
        assert_eq!(ext.n_bins, 2);
        assert_eq!(ext.lower_bound, 2);
        assert_eq!(ext.bins[0].load, 100);
        assert!((ext.density - 0.75).abs() < 1e-6);
    }

    #[test]
    fn cutting_stock_waste() {
        let instance = CSInstance::new(&[45, 30], &[2, 3], 100).unwrap();
        let solution = CSSolution::new(
            [(Pattern::new(vec![2, 0]), 1), (Pattern::new(vec![0, 3]), 1)],
            None,
            SolveStatus::Optimal,
        );
        let ext = export_cs_solution(&solution, &instance, Instant::now());
        assert_eq!(ext.total_rolls, 2);
        assert_eq!(ext.waste, 10 + 10);
        assert_eq!(ext.patterns[0].waste, 10);
        assert!(ext.lp_bound.is_none());
    }
}
