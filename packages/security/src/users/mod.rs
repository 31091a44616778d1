// ABOUTME: User accounts module
// ABOUTME: Account types, credential checks and SQLite-backed storage

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use types::*;
