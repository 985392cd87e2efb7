use crate::constants::PARENT_DIR_MARKER;
use crate::core_command::error::NavigationError;
use crate::helpers::send_line;
use crate::session::Session;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tokio::io::AsyncWrite;

/// Resolves a `CD` target against the current directory.
///
/// Rules are tried in order: `..` goes to the parent, anything containing a
/// path separator is taken as a path on its own, everything else is a
/// single segment below `current_dir`. Because of that order `../music` or
/// `./..` are plain paths and never mean "go up". A relative path in the
/// second rule is resolved against the process working directory.
///
/// On success the canonical form of the candidate is returned.
pub fn resolve_target(current_dir: &Path, target: &str) -> Result<PathBuf, NavigationError> {
    let candidate = if target == PARENT_DIR_MARKER {
        current_dir
            .parent()
            .ok_or(NavigationError::DirectoryDoesNotExist)?
            .to_path_buf()
    } else if target.contains(MAIN_SEPARATOR) {
        PathBuf::from(target)
    } else {
        current_dir.join(target)
    };

    validate_directory(&candidate)
}

fn validate_directory(candidate: &Path) -> Result<PathBuf, NavigationError> {
    match fs::metadata(candidate) {
        Ok(metadata) if metadata.is_dir() => {}
        _ => return Err(NavigationError::DirectoryDoesNotExist),
    }

    // Readable means listable.
    if let Err(e) = fs::read_dir(candidate) {
        debug!("Directory {:?} is not readable: {}", candidate, e);
        return Err(NavigationError::PermissionDenied);
    }

    candidate
        .canonicalize()
        .map_err(|_| NavigationError::DirectoryDoesNotExist)
}

/// Handles the `CD` command.
///
/// Resolves `target` against the session's current directory and, on
/// success, moves the session there and echoes the new absolute path.
/// Failures answer `DDNE` or `PD` and leave the session where it was.
///
/// # Arguments
///
/// * `writer` - The write half of the client connection.
/// * `session` - The session whose current directory is changed.
/// * `target` - Everything after the `CD` keyword, already trimmed.
/// * `restrict_to_root` - Refuse directories outside the start directory.
///
/// # Returns
///
/// Result<(), std::io::Error>, failing only when the response cannot be written.
pub async fn handle_cd_command<W>(
    writer: &mut W,
    session: &mut Session,
    target: &str,
    restrict_to_root: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    info!("{}: CD {}", session.peer, target);

    let result = resolve_target(&session.current_dir, target).and_then(|new_dir| {
        if restrict_to_root && !session.is_within_root(&new_dir) {
            warn!("{}: CD outside of the root directory: {:?}", session.peer, new_dir);
            return Err(NavigationError::PermissionDenied);
        }
        Ok(new_dir)
    });

    match result {
        Ok(new_dir) => {
            let response = new_dir.display().to_string();
            info!("{}: Directory successfully changed to: {}", session.peer, response);
            session.change_dir(new_dir);
            send_line(writer, &response).await
        }
        Err(e) => {
            warn!("{}: Failed to change directory to {:?}: {}", session.peer, target, e);
            send_line(writer, e.to_response()).await
        }
    }
}
