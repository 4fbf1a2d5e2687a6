pub mod github_client;
pub mod metadata_block;
