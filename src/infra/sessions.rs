use crate::domain::{Session, sort_sessions, summary_from_first_line};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

pub const SESSION_LOG_EXTENSION: &str = "jsonl";

/// Session logs directly inside `project_dir`, newest first.
///
/// A missing or unreadable directory yields no sessions.
pub fn index_sessions(project_dir: &Path) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();

    let walker = WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::debug!(dir = %project_dir.display(), "skipping entry: {error}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some(SESSION_LOG_EXTENSION) {
            continue;
        }

        if let Some(session) = index_session_file(entry.path()) {
            sessions.push(session);
        }
    }

    sort_sessions(&mut sessions);
    sessions
}

fn index_session_file(path: &Path) -> Option<Session> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(error) => {
            tracing::debug!(path = %path.display(), "cannot stat session log: {error}");
            return None;
        }
    };
    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(error) => {
            tracing::debug!(path = %path.display(), "no modification time: {error}");
            return None;
        }
    };

    let id = path.file_stem()?.to_string_lossy().to_string();
    Some(Session {
        id,
        log_path: path.to_path_buf(),
        modified,
        size_bytes: metadata.len(),
        summary: read_first_line(path).and_then(|line| summary_from_first_line(&line)),
    })
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(error) => {
            tracing::debug!(path = %path.display(), "cannot read first line: {error}");
            None
        }
    }
}
