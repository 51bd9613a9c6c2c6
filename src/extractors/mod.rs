// src/extractors/mod.rs
pub mod dom;
pub mod section;
pub mod label;
pub mod proximity;
pub mod fields;
pub mod record;
pub mod assembler;

// Re-export key extraction types for convenience
pub use assembler::lookup_character;
pub use record::CharacterRecord;
