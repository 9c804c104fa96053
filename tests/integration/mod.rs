//! Integration tests for dirsnap

mod blake3_verification;
mod cli_commands;
mod config_integration;
mod content_id_sensitivity;
mod test_utils;
