//! Claude folder-name encoding.
//!
//! A project folder is named after the working directory it was recorded in,
//! with the drive colon, path separators and spaces all collapsed into `-`:
//! `C:\Users\me\project one` becomes `C--Users-me-project-one`. The mapping is
//! lossy, so decoding produces an ordered list of candidates that the caller
//! checks against the filesystem.

const DELIMITER: char = '-';
const DRIVE_MARKER: &str = "--";
const SEPARATOR: char = '\\';

/// A folder name that matches `^[A-Za-z]--(.+)$`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodedName<'a> {
    /// Uppercased drive letter.
    pub drive: char,
    pub rest: &'a str,
}

impl<'a> EncodedName<'a> {
    pub fn parse(name: &'a str) -> Option<Self> {
        let mut chars = name.chars();
        let drive = chars.next().filter(|ch| ch.is_ascii_alphabetic())?;
        let rest = chars.as_str().strip_prefix(DRIVE_MARKER)?;
        if rest.is_empty() || rest.contains('\n') {
            return None;
        }
        Some(Self {
            drive: drive.to_ascii_uppercase(),
            rest,
        })
    }

    fn root(&self) -> String {
        format!("{}:{SEPARATOR}", self.drive)
    }

    fn tokens(&self) -> Vec<&'a str> {
        self.rest.split(DELIMITER).collect()
    }

    /// Every delimiter read as a path separator.
    pub fn naive_candidate(&self) -> String {
        let mut out = self.root();
        out.push_str(&self.rest.replace(DELIMITER, &SEPARATOR.to_string()));
        out
    }

    /// Candidates for the segmentation search, in probe order.
    ///
    /// Candidate `i` keeps tokens `[0, i)` as directory levels and joins
    /// tokens `[i, end)` with spaces into one final segment. A single trailing
    /// token is the naive candidate, so that split is left out.
    pub fn segmentation_candidates(&self) -> Vec<String> {
        let tokens = self.tokens();
        let sep = SEPARATOR.to_string();
        (0..tokens.len().saturating_sub(1))
            .map(|split| {
                let mut out = self.root();
                if split > 0 {
                    out.push_str(&tokens[..split].join(&sep));
                    out.push(SEPARATOR);
                }
                out.push_str(&tokens[split..].join(" "));
                out
            })
            .collect()
    }
}

/// First candidate the predicate accepts. Probes stop at the first hit.
pub fn first_existing<I, F>(candidates: I, mut is_dir: F) -> Option<String>
where
    I: IntoIterator<Item = String>,
    F: FnMut(&str) -> bool,
{
    candidates
        .into_iter()
        .find(|candidate| is_dir(candidate.as_str()))
}

/// Forward direction of the encoding, for a drive-rooted path.
pub fn encode_project_path(path: &str) -> String {
    path.chars()
        .map(|ch| match ch {
            ':' | '\\' | '/' | ' ' => DELIMITER,
            other => other,
        })
        .collect()
}
