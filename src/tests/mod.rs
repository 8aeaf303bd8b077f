// Test modules

pub mod common;
mod diagnose_handler_test;
