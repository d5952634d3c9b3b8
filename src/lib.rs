pub mod config;
pub mod corpus;
pub mod error;
pub mod geometry;
pub mod keymap;
pub mod layouts;
pub mod optimizer;
pub mod scorer;
// cmd and reports belong to the binary crate (see main.rs).
