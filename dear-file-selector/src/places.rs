use std::path::{Path, PathBuf};

/// Kind of a well-known folder, used to pick a label and an icon name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceKind {
    /// The user's home directory
    Home,
    /// Desktop folder
    Desktop,
    /// Documents folder
    Documents,
    /// Downloads folder
    Downloads,
    /// Music folder
    Music,
    /// Pictures folder
    Pictures,
    /// Videos folder
    Videos,
    /// Filesystem root
    Root,
    /// Any other folder
    Folder,
}

impl PlaceKind {
    /// Freedesktop icon name for this kind of folder.
    pub fn icon_name(self) -> &'static str {
        match self {
            PlaceKind::Home => "user-home",
            PlaceKind::Desktop => "user-desktop",
            PlaceKind::Documents => "folder-documents",
            PlaceKind::Downloads => "folder-download",
            PlaceKind::Music => "folder-music",
            PlaceKind::Pictures => "folder-pictures",
            PlaceKind::Videos => "folder-videos",
            PlaceKind::Root => "drive-harddisk",
            PlaceKind::Folder => "folder",
        }
    }

    fn default_label(self) -> Option<&'static str> {
        Some(match self {
            PlaceKind::Home => "Home",
            PlaceKind::Desktop => "Desktop",
            PlaceKind::Documents => "Documents",
            PlaceKind::Downloads => "Downloads",
            PlaceKind::Music => "Music",
            PlaceKind::Pictures => "Pictures",
            PlaceKind::Videos => "Videos",
            PlaceKind::Root => "Computer",
            PlaceKind::Folder => return None,
        })
    }
}

/// A single entry of the places pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    /// Display name shown in UI.
    pub label: String,
    /// Target directory path.
    pub path: PathBuf,
    /// Folder kind.
    pub kind: PlaceKind,
}

impl Place {
    /// Creates a place, deriving the label from the path.
    pub fn new(path: PathBuf) -> Self {
        let kind = folder_kind(&path);
        Self {
            label: folder_label(&path),
            path,
            kind,
        }
    }

    /// Creates a place with an explicit label.
    pub fn with_label(label: impl Into<String>, path: PathBuf) -> Self {
        let kind = folder_kind(&path);
        Self {
            label: label.into(),
            path,
            kind,
        }
    }
}

/// Ordered list of places shown next to the directory listing.
#[derive(Clone, Debug, Default)]
pub struct Places {
    entries: Vec<Place>,
}

impl Places {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Home, the user directories that exist on this machine, then the root.
    ///
    /// Best-effort: missing user directories are skipped.
    pub fn discover() -> Self {
        let mut places = Places::new();
        for (kind, dir) in special_dirs() {
            if let Some(dir) = dir
                && dir.is_dir()
            {
                places.add(Place {
                    label: kind.default_label().unwrap_or_default().to_string(),
                    path: dir,
                    kind,
                });
            }
        }
        places.add(Place {
            label: "Computer".to_string(),
            path: PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
            kind: PlaceKind::Root,
        });
        places
    }

    /// Adds a place unless its path is already listed.
    pub fn add(&mut self, place: Place) {
        if self.entries.iter().any(|p| p.path == place.path) {
            return;
        }
        self.entries.push(place);
    }

    /// Removes the place with this path. Returns whether one was removed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p.path != path);
        self.entries.len() != before
    }

    /// Places in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.entries.iter()
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn special_dirs() -> [(PlaceKind, Option<PathBuf>); 7] {
    [
        (PlaceKind::Home, dirs::home_dir()),
        (PlaceKind::Desktop, dirs::desktop_dir()),
        (PlaceKind::Documents, dirs::document_dir()),
        (PlaceKind::Downloads, dirs::download_dir()),
        (PlaceKind::Music, dirs::audio_dir()),
        (PlaceKind::Pictures, dirs::picture_dir()),
        (PlaceKind::Videos, dirs::video_dir()),
    ]
}

/// Classifies a folder as one of the well-known user directories.
pub fn folder_kind(path: &Path) -> PlaceKind {
    if path.parent().is_none() && path.has_root() {
        return PlaceKind::Root;
    }
    special_dirs()
        .into_iter()
        .find(|(_, dir)| dir.as_deref() == Some(path))
        .map_or(PlaceKind::Folder, |(kind, _)| kind)
}

/// Human-readable name for a folder: "Home" for the home directory, the
/// well-known name for user directories, the base name otherwise.
pub fn folder_label(path: &Path) -> String {
    if let Some(label) = folder_kind(path).default_label() {
        return label.to_string();
    }
    path.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
