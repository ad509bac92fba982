use crate::domain::{Project, encode_project_path};
use crate::infra::{PathCodec, PathMappingStore, SavePathMappingsError, load_ranked_projects};
use humansize::{DECIMAL, format_size};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Command(CliCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Projects,
    Sessions {
        project: String,
        offset: usize,
        limit: usize,
    },
    Resolve {
        folder_name: String,
    },
    Map {
        folder_name: String,
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("cannot resolve folder name: {0}")]
    Unresolved(String),

    #[error("not an existing directory: {0}")]
    NotADirectory(String),

    #[error("failed to read current directory: {0}")]
    CurrentDir(String),

    #[error(transparent)]
    SaveMapping(#[from] SavePathMappingsError),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1);
    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Command(CliCommand::Projects));
    };

    match subcommand.as_str() {
        "projects" => {
            if let Some(arg) = iter.next() {
                return Err(unexpected(arg));
            }
            Ok(CliInvocation::Command(CliCommand::Projects))
        }
        "sessions" => {
            let mut project: Option<String> = None;
            let mut offset = 0usize;
            let mut limit = DEFAULT_LIMIT;

            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--limit" | "-l" => {
                        let value = iter.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--limit".to_string())
                        })?;
                        limit = parse_usize_flag("--limit", value)?;
                    }
                    "--offset" | "-o" => {
                        let value = iter.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--offset".to_string())
                        })?;
                        offset = parse_usize_flag("--offset", value)?;
                    }
                    _ if project.is_none() && !is_flag(arg) => {
                        project = Some(arg.to_string());
                    }
                    _ => return Err(unexpected(arg)),
                }
            }

            Ok(CliInvocation::Command(CliCommand::Sessions {
                project: project.ok_or(CliParseError::MissingArgument("project"))?,
                offset,
                limit,
            }))
        }
        "resolve" => {
            let folder_name = positional(iter.next(), "folder-name")?;
            if let Some(arg) = iter.next() {
                return Err(unexpected(arg));
            }
            Ok(CliInvocation::Command(CliCommand::Resolve { folder_name }))
        }
        "map" => {
            let folder_name = positional(iter.next(), "folder-name")?;
            let path = positional(iter.next(), "path")?;
            if let Some(arg) = iter.next() {
                return Err(unexpected(arg));
            }
            Ok(CliInvocation::Command(CliCommand::Map {
                folder_name,
                path: PathBuf::from(path),
            }))
        }
        other if is_flag(other) => Err(CliParseError::UnknownFlag(other.to_string())),
        other => Err(CliParseError::UnknownSubcommand(other.to_string())),
    }
}

pub fn run(
    command: CliCommand,
    projects_dir: &Path,
    store: PathMappingStore,
) -> Result<(), CliRunError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut err = io::BufWriter::new(stderr.lock());

    match command {
        CliCommand::Projects => {
            let codec = PathCodec::new(store);
            let projects = load_ranked_projects(projects_dir, &codec);
            for project in &projects {
                if !write_line(&mut out, &project_line(project))? {
                    return Ok(());
                }
            }
            let total: usize = projects.iter().map(Project::session_count).sum();
            let _ = write_line(
                &mut err,
                &format!("{} projects, {total} sessions", projects.len()),
            )?;
            Ok(())
        }
        CliCommand::Sessions {
            project,
            offset,
            limit,
        } => {
            let codec = PathCodec::new(store);
            let projects = load_ranked_projects(projects_dir, &codec);
            let base_dir = current_dir()?;
            let project = select_project(projects, &project, &base_dir)?;
            for session in project.sessions.iter().skip(offset).take(limit) {
                let line = format!(
                    "{}\t{}\t{}\t{}\t{}",
                    format_timestamp(session.modified),
                    session.id,
                    format_size(session.size_bytes, DECIMAL),
                    session.summary.as_deref().unwrap_or("-"),
                    session.log_path.display(),
                );
                if !write_line(&mut out, &line)? {
                    return Ok(());
                }
            }
            Ok(())
        }
        CliCommand::Resolve { folder_name } => {
            let codec = PathCodec::new(store);
            let resolved = codec
                .decode(&folder_name)
                .ok_or(CliRunError::Unresolved(folder_name))?;
            let _ = write_line(
                &mut out,
                &format!("{}\t{}", resolved.path, resolved.origin.label()),
            )?;
            if resolved.is_guess() {
                let _ = write_line(&mut err, "no candidate exists on disk; path is a guess")?;
            }
            Ok(())
        }
        CliCommand::Map { folder_name, path } => {
            let path = absolute_path(&path, &current_dir()?);
            if !path.is_dir() {
                return Err(CliRunError::NotADirectory(path.display().to_string()));
            }
            let path = path.to_string_lossy().to_string();
            store.try_put(&folder_name, &path)?;
            let _ = write_line(&mut out, &format!("{folder_name}\t{path}"))?;
            Ok(())
        }
    }
}

fn project_line(project: &Project) -> String {
    let (path, origin) = match project.resolved.as_ref() {
        Some(resolved) => (resolved.path.as_str(), resolved.origin.label()),
        None => ("-", "absent"),
    };
    let last_activity = project
        .last_activity()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{path}\t{origin}\t{}\t{last_activity}",
        project.folder_name,
        project.session_count()
    )
}

/// Matches by folder name, then by real path: the path as typed, then made
/// absolute against `base_dir`, each compared by encoding and by resolved path.
fn select_project(
    mut projects: Vec<Project>,
    requested: &str,
    base_dir: &Path,
) -> Result<Project, CliRunError> {
    let absolute = absolute_path(Path::new(requested), base_dir)
        .to_string_lossy()
        .to_string();
    let mut candidates = vec![requested.trim_end_matches(['\\', '/']).to_string()];
    if absolute != candidates[0] {
        candidates.push(absolute);
    }

    let position = projects
        .iter()
        .position(|project| project.folder_name == requested)
        .or_else(|| {
            candidates.iter().find_map(|candidate| {
                let encoded = encode_project_path(candidate);
                projects.iter().position(|project| {
                    project.folder_name == encoded
                        || project.resolved_path() == Some(candidate.as_str())
                })
            })
        });

    match position {
        Some(idx) => Ok(projects.swap_remove(idx)),
        None => Err(CliRunError::ProjectNotFound(requested.to_string())),
    }
}

/// RFC 3339, UTC.
fn format_timestamp(value: SystemTime) -> String {
    OffsetDateTime::from(value)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "-".to_string())
}

fn current_dir() -> Result<PathBuf, CliRunError> {
    std::env::current_dir().map_err(|error| CliRunError::CurrentDir(error.to_string()))
}

/// Joins relative paths onto `base_dir` and drops `.` components.
fn absolute_path(path: &Path, base_dir: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    joined
        .components()
        .filter(|component| *component != Component::CurDir)
        .collect()
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}

// Folder names may start with a single `-`, so only `--` marks a flag.
fn is_flag(arg: &str) -> bool {
    arg.starts_with("--")
}

fn unexpected(arg: &str) -> CliParseError {
    if is_flag(arg) {
        CliParseError::UnknownFlag(arg.to_string())
    } else {
        CliParseError::UnexpectedArgument(arg.to_string())
    }
}

fn positional(arg: Option<&String>, name: &'static str) -> Result<String, CliParseError> {
    arg.cloned().ok_or(CliParseError::MissingArgument(name))
}

fn parse_usize_flag(flag: &str, value: &str) -> Result<usize, CliParseError> {
    value
        .parse::<usize>()
        .map_err(|_| CliParseError::InvalidFlagValue {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}
