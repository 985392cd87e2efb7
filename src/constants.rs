// src/constants.rs

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 50001;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

#[cfg(target_os = "windows")]
pub const DEFAULT_CONFIG_PATH: &str = "etc\\rouillebrowsed.conf";
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rouillebrowsed.conf";

// Here's the list of the tokens sent over the wire
pub const GREETING: &str = "HELLO";
pub const EMPTY_LISTING: &str = "EMPTY";
pub const DIRECTORY_DOES_NOT_EXIST: &str = "DDNE";
pub const PERMISSION_DENIED: &str = "PD";
pub const FILE_NOT_FOUND: &str = "FNF";
pub const READY: &str = "READY";
pub const REQUEST_ERROR: &str = "Client Request Error.";

// Directory listing layout
pub const LISTING_DELIMITER: char = '#';
pub const FOLDER_SIZE_PLACEHOLDER: &str = "-";
pub const PARENT_DIR_MARKER: &str = "..";
