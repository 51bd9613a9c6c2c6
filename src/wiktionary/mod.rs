// src/wiktionary/mod.rs
pub mod client;

pub use client::{DocumentFetcher, WiktionaryClient};
