pub mod input;
pub mod runtime;
