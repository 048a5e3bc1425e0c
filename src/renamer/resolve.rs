use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::RenameError;
use crate::renamer::digits::decimal_value;
use crate::renamer::lookup::LookupTable;

pub const ID_WIDTH: usize = 8;
pub const MAX_COLLISION_ATTEMPTS: usize = 10_000;

/// How a taken candidate name is turned into a free one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// `<id>_<project>_1.<ext>`, `_2`, ... until free.
    Suffix,
    /// Legacy docx behaviour: rebuild the name from the 8-char segments of the
    /// joined identifier string that already appear in the candidate.
    Segment,
}

impl CollisionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Segment => "segment",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suffix" | "simple" => Ok(Self::Suffix),
            "segment" | "legacy" => Ok(Self::Segment),
            other => Err(format!("unknown collision policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub id: u64,
    pub project: String,
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoIdentifier,
    ParseError { joined: String },
    NoProjectMatch { id: u64 },
    Target(RenamePlan),
}

/// Parses the leading identifier out of the joined token string.
///
/// Decimal digits of any script count. `None` when fewer than 8 characters are
/// present or one of them has no decimal value (e.g. a superscript digit).
pub fn leading_id(joined: &str) -> Option<u64> {
    let mut chars = joined.chars();
    let mut id = 0u64;
    for _ in 0..ID_WIDTH {
        let digit = decimal_value(chars.next()?)?;
        id = id * 10 + u64::from(digit);
    }
    Some(id)
}

fn file_name_safe(project: &str) -> String {
    project
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}

fn candidate_name(id: &str, project: &str, counter: Option<usize>, ext: &str) -> String {
    match counter {
        Some(n) => format!("{id}_{project}_{n}.{ext}"),
        None => format!("{id}_{project}.{ext}"),
    }
}

pub fn resolve(
    tokens: &[String],
    table: &LookupTable,
    extension: &str,
    folder: &Path,
    policy: CollisionPolicy,
    exists: impl Fn(&Path) -> bool,
) -> Result<Resolution, RenameError> {
    let joined = tokens.concat();
    if joined.is_empty() {
        return Ok(Resolution::NoIdentifier);
    }
    let Some(id) = leading_id(&joined) else {
        return Ok(Resolution::ParseError { joined });
    };

    let project = table.projects_for(id);
    if project.is_empty() {
        return Ok(Resolution::NoProjectMatch { id });
    }
    let project = file_name_safe(&project);

    let file_name = match policy {
        CollisionPolicy::Suffix => suffix_policy(id, &project, extension, folder, &exists)?,
        CollisionPolicy::Segment => {
            segment_policy(id, &joined, &project, extension, folder, &exists)?
        }
    };

    Ok(Resolution::Target(RenamePlan {
        id,
        path: folder.join(&file_name),
        project,
        file_name,
    }))
}

fn suffix_policy(
    id: u64,
    project: &str,
    ext: &str,
    folder: &Path,
    exists: &impl Fn(&Path) -> bool,
) -> Result<String, RenameError> {
    let id = id.to_string();
    let mut name = candidate_name(&id, project, None, ext);
    let mut counter = 1;
    while exists(&folder.join(&name)) {
        if counter > MAX_COLLISION_ATTEMPTS {
            return Err(RenameError::CollisionUnresolved {
                stem: format!("{id}_{project}"),
                attempts: MAX_COLLISION_ATTEMPTS,
            });
        }
        name = candidate_name(&id, project, Some(counter), ext);
        counter += 1;
    }
    Ok(name)
}

/// Splits `joined` into consecutive 8-char segments (the last may be shorter).
fn segments(joined: &str) -> Vec<String> {
    let chars: Vec<char> = joined.chars().collect();
    chars
        .chunks(ID_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn segment_policy(
    id: u64,
    joined: &str,
    project: &str,
    ext: &str,
    folder: &Path,
    exists: &impl Fn(&Path) -> bool,
) -> Result<String, RenameError> {
    let id = id.to_string();
    let segments = segments(joined);
    let mut name = candidate_name(&id, project, None, ext);
    let mut counter = 1;
    let mut first_pass = true;
    let mut attempts = 0;

    while exists(&folder.join(&name)) {
        attempts += 1;
        if attempts > MAX_COLLISION_ATTEMPTS {
            return Err(RenameError::CollisionUnresolved {
                stem: format!("{id}_{project}"),
                attempts: MAX_COLLISION_ATTEMPTS,
            });
        }

        let matched = segments
            .iter()
            .take_while(|segment| name.contains(segment.as_str()))
            .last()
            .cloned();

        name = match (matched, first_pass) {
            (Some(segment), true) => candidate_name(&segment, project, None, ext),
            (Some(segment), false) => {
                let next = candidate_name(&segment, project, Some(counter), ext);
                counter += 1;
                next
            }
            // Nothing from the token string survives in the name (e.g. a
            // leading zero was dropped from the id); number the id instead.
            (None, _) => {
                let next = candidate_name(&id, project, Some(counter), ext);
                counter += 1;
                next
            }
        };
        first_pass = false;
    }
    Ok(name)
}
