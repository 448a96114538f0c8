// Prism shared type definitions
// Each submodule defines types used across the application.

pub mod bookmark;
pub mod errors;
pub mod privacy;
pub mod settings;
pub mod tab;
pub mod theme;
