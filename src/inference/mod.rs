pub mod interface;
pub mod python_model;

pub use interface::*;
pub use python_model::*;
