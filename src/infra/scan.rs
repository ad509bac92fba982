use crate::domain::{Project, rank_projects};
use crate::infra::{DirProbe, PathCodec, index_sessions};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveProjectsDirError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

pub fn resolve_claude_projects_dir() -> Result<PathBuf, ResolveProjectsDirError> {
    if let Some(override_dir) = std::env::var_os("CLAUDE_PROJECTS_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = home_dir() else {
        return Err(ResolveProjectsDirError::HomeDirNotFound);
    };

    Ok(home.join(".claude").join("projects"))
}

/// One project per subdirectory of `projects_dir` that holds at least one
/// session log, in directory listing order.
pub fn scan_projects_dir<P: DirProbe>(
    projects_dir: &Path,
    codec: &PathCodec<P>,
) -> Vec<Project> {
    let entries = match fs::read_dir(projects_dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(dir = %projects_dir.display(), "projects dir not readable: {error}");
            return Vec::new();
        }
    };

    let mut projects: Vec<Project> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(dir = %projects_dir.display(), "skipping entry: {error}");
                continue;
            }
        };

        let folder_path = entry.path();
        if !folder_path.is_dir() {
            continue;
        }

        let sessions = index_sessions(&folder_path);
        if sessions.is_empty() {
            continue;
        }

        let folder_name = entry.file_name().to_string_lossy().to_string();
        let resolved = codec.decode(&folder_name);
        projects.push(Project {
            folder_name,
            folder_path,
            resolved,
            sessions,
        });
    }

    projects
}

pub fn load_ranked_projects<P: DirProbe>(
    projects_dir: &Path,
    codec: &PathCodec<P>,
) -> Vec<Project> {
    rank_projects(scan_projects_dir(projects_dir, codec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PathOrigin, ResolvedPath};
    use crate::infra::PathMappingStore;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    struct Disk(&'static [&'static str]);

    impl DirProbe for Disk {
        fn is_dir(&self, path: &str) -> bool {
            self.0.contains(&path)
        }
    }

    fn write_log(path: &Path, first_line: &str, modified: SystemTime) {
        fs::write(path, format!("{first_line}\n")).expect("write");
        File::options()
            .write(true)
            .open(path)
            .and_then(|file| file.set_modified(modified))
            .expect("set mtime");
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn missing_root_yields_no_projects() {
        let dir = tempdir().expect("tempdir");
        let codec = PathCodec::with_probe(
            PathMappingStore::new(dir.path().join("paths.json")),
            Disk(&[]),
        );
        assert!(scan_projects_dir(&dir.path().join("missing"), &codec).is_empty());
    }

    #[test]
    fn directories_without_sessions_are_not_projects() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("projects");
        fs::create_dir_all(root.join("C--empty")).expect("mkdir");
        fs::create_dir_all(root.join("C--only-notes")).expect("mkdir");
        fs::write(root.join("C--only-notes").join("notes.txt"), "x").expect("write");
        fs::create_dir_all(root.join("C--real")).expect("mkdir");
        write_log(&root.join("C--real").join("s.jsonl"), "{}", at(5));
        fs::write(root.join("stray.jsonl"), "{}").expect("write");

        let codec = PathCodec::with_probe(
            PathMappingStore::new(dir.path().join("paths.json")),
            Disk(&[]),
        );
        let projects = scan_projects_dir(&root, &codec);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].folder_name, "C--real");
        assert_eq!(projects[0].session_count(), 1);
        assert_eq!(projects[0].last_activity(), Some(at(5)));
    }

    #[test]
    fn unmatched_names_are_kept_without_a_path() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("projects");
        fs::create_dir_all(root.join("-home-me-demo")).expect("mkdir");
        write_log(&root.join("-home-me-demo").join("s.jsonl"), "{}", at(5));

        let codec = PathCodec::with_probe(
            PathMappingStore::new(dir.path().join("paths.json")),
            Disk(&[]),
        );
        let projects = scan_projects_dir(&root, &codec);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].resolved, None);
    }

    #[test]
    fn scan_and_rank_resolve_and_cache_the_demo_project() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("projects");
        let project_dir = root.join("C--Users-me-demo");
        fs::create_dir_all(&project_dir).expect("mkdir");
        write_log(
            &project_dir.join("abc.jsonl"),
            r#"{"message": "hello world, this is a very long test message exceeding fifty chars"}"#,
            at(1_700_000_000),
        );
        let other_dir = root.join("D--old");
        fs::create_dir_all(&other_dir).expect("mkdir");
        write_log(&other_dir.join("old.jsonl"), "{}", at(1_600_000_000));

        let store_path = dir.path().join("paths.json");
        let codec = PathCodec::with_probe(
            PathMappingStore::new(&store_path),
            Disk(&[r"C:\Users\me\demo"]),
        );
        let projects = load_ranked_projects(&root, &codec);

        assert_eq!(projects.len(), 2);
        let demo = &projects[0];
        assert_eq!(demo.folder_name, "C--Users-me-demo");
        assert_eq!(demo.folder_path, project_dir);
        assert_eq!(
            demo.resolved,
            Some(ResolvedPath::verified(r"C:\Users\me\demo"))
        );
        assert_eq!(demo.session_count(), 1);
        assert_eq!(demo.last_activity(), Some(at(1_700_000_000)));
        assert_eq!(demo.sessions[0].id, "abc");
        assert_eq!(
            demo.sessions[0].summary.as_deref(),
            Some("hello world, this is a very long test message exce...")
        );

        let old = &projects[1];
        assert_eq!(old.folder_name, "D--old");
        assert_eq!(old.resolved.as_ref().map(|r| r.origin), Some(PathOrigin::Guessed));

        let raw = fs::read_to_string(&store_path).expect("read store");
        let stored: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(
            stored,
            serde_json::json!({ "C--Users-me-demo": "C:\\Users\\me\\demo" })
        );
    }
}
