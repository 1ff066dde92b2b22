//! BDD step definitions for the homework bot

pub mod engine_steps;
