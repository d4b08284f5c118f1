// lib.rs - Library interface for the bencode codec

pub mod bencode;
pub mod config;
pub mod engine;

// Re-export commonly used types for easier use
pub use bencode::{decode, encode, to_bytes, BValue, BencodeError};
pub use config::Config;
