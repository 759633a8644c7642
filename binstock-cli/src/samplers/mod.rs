/// Random instance generation
pub mod synthetic;
