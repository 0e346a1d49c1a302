pub mod credential;
pub mod error;
pub mod models;
pub mod ports;
pub mod prompt;
pub mod submission;
