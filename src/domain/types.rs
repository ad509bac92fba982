use std::path::PathBuf;
use std::time::SystemTime;

/// How a [`ResolvedPath`] was obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathOrigin {
    /// Read back from the path mapping store. Not re-checked on disk.
    Mapped,
    /// Found on disk by the naive decode or the segmentation search.
    Verified,
    /// Naive decode that does not exist on disk. Never cached.
    Guessed,
}

impl PathOrigin {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::Verified => "verified",
            Self::Guessed => "guessed",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
    pub path: String,
    pub origin: PathOrigin,
}

impl ResolvedPath {
    pub fn mapped(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: PathOrigin::Mapped,
        }
    }

    pub fn verified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: PathOrigin::Verified,
        }
    }

    pub fn guessed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: PathOrigin::Guessed,
        }
    }

    pub fn is_guess(&self) -> bool {
        self.origin == PathOrigin::Guessed
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub id: String,
    pub log_path: PathBuf,
    pub modified: SystemTime,
    pub size_bytes: u64,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub folder_name: String,
    pub folder_path: PathBuf,
    pub resolved: Option<ResolvedPath>,
    /// Newest first.
    pub sessions: Vec<Session>,
}

impl Project {
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn last_activity(&self) -> Option<SystemTime> {
        self.sessions.first().map(|session| session.modified)
    }

    pub fn resolved_path(&self) -> Option<&str> {
        self.resolved.as_ref().map(|resolved| resolved.path.as_str())
    }
}
