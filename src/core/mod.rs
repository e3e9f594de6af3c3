// Core types shared by every backend: errors and the encode argument model.
pub mod encoding;
pub mod error;
