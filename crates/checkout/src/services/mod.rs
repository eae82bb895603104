//! External service seams used during placement.

pub mod buyers;
