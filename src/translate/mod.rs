pub mod interface;
pub mod languages;
pub mod python_translator;

pub use interface::*;
pub use languages::*;
pub use python_translator::*;
