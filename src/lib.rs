// src/lib.rs
pub mod matching;
pub mod models;
pub mod resolver;
pub mod utils;
