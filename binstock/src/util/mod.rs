/// Set of functions used throughout to assure the correctness of the library.
pub mod assertions;

mod budget;
mod config;

#[doc(inline)]
pub use budget::Budget;
#[doc(inline)]
pub use config::BnBConfig;
#[doc(inline)]
pub use config::ColGenConfig;
#[doc(inline)]
pub use config::GAConfig;
#[doc(inline)]
pub use config::MilpConfig;
#[doc(inline)]
pub use config::Rounding;
