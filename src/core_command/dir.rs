use crate::constants::{EMPTY_LISTING, FOLDER_SIZE_PLACEHOLDER, LISTING_DELIMITER};
use crate::helpers::send_line;
use crate::session::Session;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use tokio::io::AsyncWrite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Folder => "Folder",
        }
    }
}

/// One child of a listed directory. `size` is only meaningful for files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub kind: EntryKind,
    pub size: u64,
    pub name: String,
}

impl DirectoryEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            kind: EntryKind::File,
            size,
            name: name.into(),
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Folder,
            size: 0,
            name: name.into(),
        }
    }

    fn encode_into(&self, out: &mut String) {
        out.push_str(self.kind.label());
        out.push(LISTING_DELIMITER);
        match self.kind {
            EntryKind::File => out.push_str(&self.size.to_string()),
            EntryKind::Folder => out.push_str(FOLDER_SIZE_PLACEHOLDER),
        }
        out.push(LISTING_DELIMITER);
        out.push_str(&self.name);
        out.push(LISTING_DELIMITER);
    }
}

/// Takes a one-level snapshot of `path`, in the order the OS enumerates it.
///
/// Returns `None` when the directory cannot be read. Children that are
/// neither files nor directories after following symlinks are skipped, as
/// are names holding a line break or the listing delimiter.
pub fn read_entries(path: &Path) -> Option<Vec<DirectoryEntry>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error reading directory {:?}: {}", path, e);
            return None;
        }
    };

    let mut listing = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read directory entry: {}", e);
                continue;
            }
        };

        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {:?}: {}", entry.path(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_listable_name(&name) {
            warn!("Skipping {:?}: name cannot be encoded in a listing", entry.path());
            continue;
        }
        if metadata.is_file() {
            listing.push(DirectoryEntry::file(name, metadata.len()));
        } else if metadata.is_dir() {
            listing.push(DirectoryEntry::folder(name));
        }
    }

    Some(listing)
}

// A listing is one line of delimited fields.
fn is_listable_name(name: &str) -> bool {
    !name.contains(|c: char| c == '\n' || c == '\r' || c == LISTING_DELIMITER)
}

/// Encodes a snapshot as `Kind#size#name#` records, files first, folders
/// last. A missing or empty snapshot encodes as `EMPTY`.
pub fn encode_listing(entries: Option<&[DirectoryEntry]>) -> String {
    let mut files = String::new();
    let mut folders = String::new();

    for entry in entries.unwrap_or_default() {
        match entry.kind {
            EntryKind::File => entry.encode_into(&mut files),
            EntryKind::Folder => entry.encode_into(&mut folders),
        }
    }

    if files.is_empty() && folders.is_empty() {
        return EMPTY_LISTING.to_string();
    }

    files.push_str(&folders);
    files
}

pub fn describe_directory(path: &Path) -> String {
    encode_listing(read_entries(path).as_deref())
}

/// Handles the `DIR` command: one listing line for the current directory,
/// `EMPTY` when it holds nothing listable or cannot be read.
pub async fn handle_dir_command<W>(writer: &mut W, session: &Session) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    info!("{}: DIR {:?}", session.peer, session.current_dir);
    let listing = describe_directory(&session.current_dir);
    send_line(writer, &listing).await
}
