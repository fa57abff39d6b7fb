// ABOUTME: Environment variable names and defaults for Figstory
// ABOUTME: Shared by the server binary and the client constructors

pub mod constants;
pub mod defaults;
