// src/core/mod.rs

pub mod converter;
pub mod document;
pub mod engine;
pub mod resolver;
pub mod tokenizer;
pub mod types;
