use std::path::{Path, PathBuf};

/// Per-connection navigation state. Owned by the task serving the
/// connection, never shared.
#[derive(Debug)]
pub struct Session {
    pub peer: String,
    pub current_dir: PathBuf,
    pub root_dir: PathBuf, // Directory the session started in
    pub is_active: bool,
    pub commands_handled: u64,
}

impl Session {
    pub fn new(peer: impl Into<String>, root_dir: PathBuf) -> Self {
        Self {
            peer: peer.into(),
            current_dir: root_dir.clone(),
            root_dir,
            is_active: true,
            commands_handled: 0,
        }
    }

    pub fn change_dir(&mut self, new_dir: PathBuf) {
        self.current_dir = new_dir;
    }

    pub fn terminate(&mut self) {
        self.is_active = false;
    }

    /// Returns true when the canonical `path` lies inside the root directory.
    pub fn is_within_root(&self, path: &Path) -> bool {
        let root = self
            .root_dir
            .canonicalize()
            .unwrap_or_else(|_| self.root_dir.clone());
        path.starts_with(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("127.0.0.1:4000", PathBuf::from("/srv"));
        assert_eq!(session.peer, "127.0.0.1:4000");
        assert_eq!(session.current_dir, PathBuf::from("/srv"));
        assert!(session.is_active);
        assert_eq!(session.commands_handled, 0);
    }

    #[test]
    fn test_change_dir_and_terminate() {
        let mut session = Session::new("peer", PathBuf::from("/srv"));
        session.change_dir(PathBuf::from("/srv/music"));
        assert_eq!(session.current_dir, PathBuf::from("/srv/music"));
        assert_eq!(session.root_dir, PathBuf::from("/srv"));

        session.terminate();
        assert!(!session.is_active);
    }

    #[test]
    fn test_is_within_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let session = Session::new("peer", root.clone());

        assert!(session.is_within_root(&root));
        assert!(session.is_within_root(&root.join("nested/file.txt")));
        assert!(!session.is_within_root(root.parent().unwrap()));
    }
}
