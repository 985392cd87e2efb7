// Here's the list of the commands implemented
pub mod cd;
pub mod dir;
pub mod download;
pub mod pwd;

// Request parsing and the error types shared by the handlers
pub mod command;
pub mod error;
