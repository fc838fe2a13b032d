use std::path::{Path, PathBuf};

/// Back/forward navigation history of visited directories.
///
/// Visiting a new directory after going back drops the forward tail, the way
/// browser history does.
#[derive(Clone, Debug, Default)]
pub struct DirHistory {
    stack: Vec<PathBuf>,
    position: usize,
}

impl DirHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory at the current position.
    pub fn current(&self) -> Option<&Path> {
        self.stack.get(self.position).map(PathBuf::as_path)
    }

    /// Record a visit. Revisiting the current directory is a no-op.
    pub fn push(&mut self, dir: PathBuf) {
        if self.current() == Some(dir.as_path()) {
            return;
        }
        if !self.stack.is_empty() {
            self.stack.truncate(self.position + 1);
        }
        self.stack.push(dir);
        self.position = self.stack.len() - 1;
    }

    /// Whether [`DirHistory::back`] would move.
    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    /// Whether [`DirHistory::forward`] would move.
    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.stack.len()
    }

    /// Step back and return the directory now current.
    pub fn back(&mut self) -> Option<PathBuf> {
        if !self.can_go_back() {
            return None;
        }
        self.position -= 1;
        self.current().map(Path::to_path_buf)
    }

    /// Step forward and return the directory now current.
    pub fn forward(&mut self) -> Option<PathBuf> {
        if !self.can_go_forward() {
            return None;
        }
        self.position += 1;
        self.current().map(Path::to_path_buf)
    }

    /// Number of recorded directories.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing was visited yet.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
