//! Integration tests for sd-cmd
//!
//! These tests run the compiled binary against a local stub of the
//! Screwdriver API and Store.

mod exec_command;
