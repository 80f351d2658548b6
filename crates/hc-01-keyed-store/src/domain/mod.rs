pub mod errors;
pub mod keys;
