pub mod error;
pub mod input;
pub mod packer;
pub mod render;
pub mod types;
