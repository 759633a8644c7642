use serde::{Deserialize, Serialize};

/// Item to be produced, characterised by a single size (a length or a weight).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: usize,
    pub size: u64,
}

impl Item {
    pub fn new(id: usize, size: u64) -> Self {
        Self { id, size }
    }
}

/// Rectangular piece to be cut from a sheet. Pieces are never rotated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: usize,
    pub width: u64,
    pub height: u64,
}

impl Piece {
    pub fn new(id: usize, width: u64, height: u64) -> Self {
        Self { id, width, height }
    }

    pub fn area(&self) -> u64 {
        self.width * self.height
    }
}
