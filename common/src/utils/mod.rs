pub mod config;
pub mod graph_templates;
