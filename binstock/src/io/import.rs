use itertools::Itertools;

use crate::entities::{BPInstance, CSInstance, SheetInstance};
use crate::error::{Result, SolveError};
use crate::io::ext_repr::{ExtBPInstance, ExtCSInstance, ExtSheetInstance};

/// Imports a Bin Packing instance into the library
pub fn import_bp_instance(ext_instance: &ExtBPInstance) -> Result<BPInstance> {
    let capacity = import_capacity(ext_instance.capacity)?;
    let items = sorted_by_id(&ext_instance.items, |i| i.id)?;
    let sizes = items
        .iter()
        .map(|ext_item| import_size(ext_item.id, ext_item.size))
        .collect::<Result<Vec<_>>>()?;
    Ok(BPInstance::new(sizes, capacity))
}

/// Imports a Cutting Stock instance into the library
pub fn import_cs_instance(ext_instance: &ExtCSInstance) -> Result<CSInstance> {
    let stock_length = import_capacity(ext_instance.stock_length)?;
    let items = sorted_by_id(&ext_instance.items, |i| i.id)?;
    let lengths = items
        .iter()
        .map(|ext_item| import_size(ext_item.id, ext_item.length))
        .collect::<Result<Vec<_>>>()?;
    let demands = items.iter().map(|ext_item| ext_item.demand).collect_vec();
    CSInstance::new(&lengths, &demands, stock_length)
}

/// Imports a sheet cutting instance into the library
pub fn import_sheet_instance(ext_instance: &ExtSheetInstance) -> Result<SheetInstance> {
    let width = import_capacity(ext_instance.width)?;
    let height = import_capacity(ext_instance.height)?;
    let pieces = sorted_by_id(&ext_instance.pieces, |p| p.id)?;
    let dims = pieces
        .iter()
        .map(|p| Ok((import_size(p.id, p.width)?, import_size(p.id, p.height)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(SheetInstance::new(dims, width, height))
}

fn import_capacity(capacity: i64) -> Result<u64> {
    u64::try_from(capacity)
        .ok()
        .filter(|&c| c > 0)
        .ok_or(SolveError::InvalidCapacity(capacity))
}

fn import_size(id: u64, size: i64) -> Result<u64> {
    u64::try_from(size)
        .ok()
        .filter(|&s| s > 0)
        .ok_or(SolveError::InvalidItem {
            id: id as usize,
            size,
        })
}

/// Sorts external entities by id, they should be consecutive starting from 0.
fn sorted_by_id<T>(entities: &[T], id: impl Fn(&T) -> u64) -> Result<Vec<&T>> {
    let sorted = entities.iter().sorted_by_key(|e| id(e)).collect_vec();
    if !sorted.iter().enumerate().all(|(i, e)| id(e) == i as u64) {
        return Err(SolveError::InvalidInstance(format!(
            "ids should be consecutive starting from 0, got: {:?}",
            sorted.iter().map(|e| id(e)).collect_vec()
        )));
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ext_repr::{ExtItem, ExtPiece};

    fn ext_bp(capacity: i64, sizes: &[(u64, i64)]) -> ExtBPInstance {
        ExtBPInstance {
            name: "test".into(),
            capacity,
            items: sizes
                .iter()
                .map(|&(id, size)| ExtItem { id, size })
                .collect(),
        }
    }

    #[test]
    fn items_are_ordered_by_id() {
        let instance = import_bp_instance(&ext_bp(10, &[(1, 7), (0, 3)])).unwrap();
        assert_eq!(instance.sizes().collect_vec(), vec![3, 7]);
    }

    #[test]
    fn negative_size_is_invalid() {
        assert_eq!(
            import_bp_instance(&ext_bp(10, &[(0, 3), (1, -4)])).unwrap_err(),
            SolveError::InvalidItem { id: 1, size: -4 }
        );
    }

    #[test]
    fn negative_capacity_is_invalid() {
        assert_eq!(
            import_bp_instance(&ext_bp(-10, &[(0, 3)])).unwrap_err(),
            SolveError::InvalidCapacity(-10)
        );
    }

    #[test]
    fn gap_in_ids() {
        assert!(matches!(
            import_bp_instance(&ext_bp(10, &[(0, 3), (2, 4)])),
            Err(SolveError::InvalidInstance(_))
        ));
    }

    #[test]
    fn cutting_stock_from_json() {
        let json = r#"{
            "name": "small",
            "stock_length": 100,
            "items": [
                {"id": 0, "length": 45, "demand": 3},
                {"id": 1, "length": 30, "demand": 0}
            ]
        }"#;
        let ext: ExtCSInstance = serde_json::from_str(json).unwrap();
        let instance = import_cs_instance(&ext).unwrap();
        assert_eq!(instance.demands().collect_vec(), vec![3, 0]);
        assert_eq!(instance.length(0), 45);
    }

    #[test]
    fn zero_height_piece() {
        let ext = ExtSheetInstance {
            name: "sheet".into(),
            width: 10,
            height: 10,
            pieces: vec![ExtPiece {
                id: 0,
                width: 3,
                height: 0,
            }],
        };
        assert_eq!(
            import_sheet_instance(&ext).unwrap_err(),
            SolveError::InvalidItem { id: 0, size: 0 }
        );
    }
}
