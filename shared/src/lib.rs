pub mod prompts;
pub mod telemetry;
pub mod types;
pub mod utils;
