//! Dynamic program cutting pieces out of a single rectangular sheet.
//!
//! `dp[w][h]` is the number of pieces cut from a `w x h` sheet when every cut piece is placed in
//! the top-right corner of what remains, leaving a `(w - pw) x (h - ph)` sheet in the bottom-left corner:
//!
//! ```text
//! dp[w][h] = max(dp[w][h], dp[w - pw][h - ph] + 1)    for every piece with pw <= w and ph <= h
//! ```
//!
//! The placements of a solution therefore form a diagonal staircase and can never overlap.
//! Pieces can be cut any number of times.

use std::time::Instant;

use log::info;
use ndarray::Array2;

use crate::entities::{SheetInstance, SheetPlacement, SheetSolution};
use crate::error::{Result, SolveError};
use crate::util::assertions::sheet_placements_valid;

/// Largest table (in cells) that is allocated
const MAX_CELLS: u64 = 1 << 26;

pub fn solve(instance: &SheetInstance) -> Result<SheetSolution> {
    instance.validate()?;
    let start = Instant::now();

    let cells = (instance.width + 1).saturating_mul(instance.height + 1);
    if cells > MAX_CELLS {
        return Err(SolveError::InvalidInstance(format!(
            "a {}x{} sheet needs {cells} table cells, at most {MAX_CELLS} are supported",
            instance.width, instance.height
        )));
    }
    let (width, height) = (instance.width as usize, instance.height as usize);

    let mut dp = Array2::<u64>::zeros((width + 1, height + 1));
    let mut choice = Array2::<Option<usize>>::default((width + 1, height + 1));

    for w in 1..=width {
        for h in 1..=height {
            for piece in &instance.pieces {
                let (pw, ph) = (piece.width as usize, piece.height as usize);
                if pw > w || ph > h {
                    continue;
                }
                let candidate = dp[[w - pw, h - ph]] + 1;
                if candidate > dp[[w, h]] {
                    dp[[w, h]] = candidate;
                    choice[[w, h]] = Some(piece.id);
                }
            }
        }
    }

    let mut placements = vec![];
    let (mut w, mut h) = (width, height);
    while let Some(piece_id) = choice[[w, h]] {
        let piece = &instance.pieces[piece_id];
        w -= piece.width as usize;
        h -= piece.height as usize;
        placements.push(SheetPlacement {
            piece_id,
            x: w as u64,
            y: h as u64,
        });
    }
    debug_assert_eq!(placements.len() as u64, dp[[width, height]]);
    debug_assert!(sheet_placements_valid(instance, &placements));

    let solution = SheetSolution::new(placements);
    info!(
        "[K2D] {} pieces cut from a {}x{} sheet (density: {:.3}%) in {:.3}ms",
        solution.n_pieces(),
        instance.width,
        instance.height,
        solution.density(instance) * 100.0,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[(2, 2)], 10, 10 => 5; "squares on the diagonal")]
    #[test_case(&[(4, 4), (1, 1)], 6, 6 => 6; "small piece preferred")]
    #[test_case(&[(3, 1), (1, 3)], 4, 4 => 2; "alternating orientations")]
    #[test_case(&[(5, 5)], 5, 5 => 1; "piece equals sheet")]
    #[test_case(&[], 3, 3 => 0; "no pieces")]
    fn pieces_cut(dims: &[(u64, u64)], width: u64, height: u64) -> usize {
        let instance = SheetInstance::new(dims.iter().copied(), width, height);
        let sol = solve(&instance).unwrap();
        assert!(sheet_placements_valid(&instance, &sol.placements));
        sol.n_pieces()
    }

    #[test]
    fn staircase_coordinates() {
        let instance = SheetInstance::new([(2, 3)], 4, 6);
        let sol = solve(&instance).unwrap();
        let corners = sol.placements.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
        assert_eq!(corners, vec![(2, 3), (0, 0)]);
    }

    #[test]
    fn oversized_piece() {
        let instance = SheetInstance::new([(1, 1), (5, 1)], 4, 4);
        assert_eq!(
            solve(&instance).unwrap_err(),
            SolveError::ItemExceedsCapacity {
                id: 1,
                size: 5,
                capacity: 4
            }
        );
    }
}
