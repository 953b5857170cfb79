pub mod host;
pub mod integrations;
pub mod main;
