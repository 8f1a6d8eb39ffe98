// ABOUTME: Command implementations for valbind CLI
// ABOUTME: Submodules for check, split, parse-clear, and rules commands

pub mod check;
pub mod parse_clear;
pub mod rules;
pub mod split;
