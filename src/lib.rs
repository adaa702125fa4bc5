pub mod catalog;
pub mod commands;
pub mod detect;
pub mod generate;
pub mod preflight;
pub mod project;
pub mod report;
pub mod settings;
pub mod utils;
