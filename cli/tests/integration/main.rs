//! Integration tests for dodocker CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Provider calls go to a local wiremock server, never to DigitalOcean.

mod cli_tests;
mod config_command;
mod provider_commands;
