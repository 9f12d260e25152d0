pub mod auth0;
pub mod cli;
pub mod load_config;
pub mod serve;
