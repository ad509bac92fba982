use crate::domain::{Project, Session};
use std::cmp::Reverse;

/// Newest activity first. Projects without activity go last; ties keep their
/// input order.
pub fn rank_projects(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by_key(|project| Reverse(project.last_activity()));
    projects
}

/// Newest first; ties keep their input order.
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by_key(|session| Reverse(session.modified));
}
