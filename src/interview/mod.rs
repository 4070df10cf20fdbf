pub mod questions;
pub mod script;
pub mod turn;

pub use questions::*;
pub use script::*;
pub use turn::*;
