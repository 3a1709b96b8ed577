//! Compile, run and verify a solution against scraped sample tests

mod capture;
pub mod client;
pub mod compiler;
pub mod engine;
pub mod evaluator;
pub mod executor;
pub mod input;
pub mod report;


pub use executor::{SessionOutcome, TestSession};
