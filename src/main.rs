mod cli;
mod domain;
mod infra;

use crate::cli::CliInvocation;
use crate::infra::{
    PathMappingStore, ResolvePathMappingsFileError, ResolveProjectsDirError,
    resolve_claude_projects_dir, resolve_path_mappings_file,
};
use std::io::{self, Write};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    ProjectsDir(#[from] ResolveProjectsDirError),

    #[error(transparent)]
    MappingsFile(#[from] ResolvePathMappingsFileError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    init_logging();

    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Command(command) => {
            let projects_dir = resolve_claude_projects_dir()?;
            let store = PathMappingStore::new(resolve_path_mappings_file()?);
            tracing::debug!(
                projects_dir = %projects_dir.display(),
                mappings = %store.path().display(),
                "resolved locations"
            );
            crate::cli::run(command, &projects_dir, store)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} - find Claude projects and the folders they were recorded in\n\nUSAGE:\n  {name} [projects]                        List projects, most recent first\n  {name} sessions <folder-name|path> [--limit N] [--offset N]\n                                           List sessions of one project, newest first\n  {name} resolve <folder-name>             Decode a folder name into a real path\n  {name} map <folder-name> <path>          Remember the real path of a folder name\n  {name} --help | --version\n\nOUTPUT:\n  projects: folder_name<TAB>path<TAB>origin<TAB>session_count<TAB>last_activity\n  sessions: modified<TAB>session_id<TAB>size<TAB>summary<TAB>log_path\n  resolve:  path<TAB>origin   (origin: mapped|verified|guessed)\n  Times are UTC.\n\nENV:\n  CLAUDE_PROJECTS_DIR       Override Claude projects dir (default: ~/.claude/projects)\n  CCLAUNCHER_PATHS_CONFIG   Override path mapping file (default: claude_paths_config.json next to the executable)\n  RUST_LOG                  Log filter (default: warn)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}
