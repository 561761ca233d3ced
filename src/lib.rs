// gemrelay - relay system/user prompts to Gemini with a server-held API key
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod server;
pub mod utils;
