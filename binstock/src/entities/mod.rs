mod instance;
mod item;
mod pattern;
mod solution;

#[doc(inline)]
pub use instance::BPInstance;
#[doc(inline)]
pub use instance::CSInstance;
#[doc(inline)]
pub use instance::SheetInstance;
#[doc(inline)]
pub use item::Item;
#[doc(inline)]
pub use item::Piece;
#[doc(inline)]
pub use pattern::Pattern;
#[doc(inline)]
pub use solution::BPSolution;
#[doc(inline)]
pub use solution::Bin;
#[doc(inline)]
pub use solution::CSSolution;
#[doc(inline)]
pub use solution::SheetPlacement;
#[doc(inline)]
pub use solution::SheetSolution;
#[doc(inline)]
pub use solution::SolveStatus;
