// ABOUTME: Configuration constants shared by the PC Builder crates
// ABOUTME: Environment variable names and their default values

pub mod constants;

pub use constants::*;
