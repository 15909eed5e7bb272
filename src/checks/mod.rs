pub mod checker;
pub mod cost;
