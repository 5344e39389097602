//! Parser for the subparts mini-language.
//!
//! A subparts spec is a `;`-separated list of groups, each `part:sub1,sub2,...`,
//! e.g. `a:i,ii,iii;c:i,ii`. Part names are matched case-insensitively against
//! the owning question's declared parts. The same parser backs both the
//! validator (which reports the errors) and the generator (which needs the
//! mapping), so the two can never disagree about what a spec means.

use std::fmt;

use crate::util::split_list;

/// A problem found in one group of a subparts spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubpartError {
    /// The group has no `:` between part and subparts.
    MissingSeparator,
    /// The group names a part the question does not declare.
    UnknownPart(String),
    /// The group lists no subparts after trimming blanks.
    NoSubparts(String),
}

impl fmt::Display for SubpartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => {
                write!(f, "Invalid subparts format. Use 'part:sub1,sub2' format")
            }
            Self::UnknownPart(part) => write!(f, "Subpart references invalid part '{part}'"),
            Self::NoSubparts(part) => write!(f, "Part '{part}' has no subparts specified"),
        }
    }
}

/// Subparts declared for one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpartGroup {
    /// The part label as declared in the question's parts list.
    pub part: String,
    /// The part name as it was written in the subparts spec.
    pub written_as: String,
    /// Subpart labels in declared order; the position is the file index.
    pub subparts: Vec<String>,
}

/// Parsed subparts, keyed by declared part label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubpartMap {
    groups: Vec<SubpartGroup>,
}

impl SubpartMap {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Subpart labels for a declared part, if it has any.
    pub fn get(&self, part: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.part == part)
            .map(|g| g.subparts.as_slice())
    }

    pub fn groups(&self) -> impl Iterator<Item = &SubpartGroup> {
        self.groups.iter()
    }

    // A later group for the same part replaces the earlier one.
    fn insert(&mut self, group: SubpartGroup) {
        match self.groups.iter_mut().find(|g| g.part == group.part) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }
}

/// Parses `spec` against the owning question's declared `parts`.
///
/// Blank input yields an empty map. Otherwise every group is checked and all
/// problems are returned together; a map is only returned when there are none.
pub fn parse_subparts(spec: &str, parts: &[String]) -> Result<SubpartMap, Vec<SubpartError>> {
    let mut map = SubpartMap::default();
    if spec.trim().is_empty() {
        return Ok(map);
    }

    let mut errors = Vec::new();

    for group in spec.split(';') {
        let Some((name, rest)) = group.split_once(':') else {
            errors.push(SubpartError::MissingSeparator);
            continue;
        };

        let written_as = name.trim();
        let normalized = written_as.to_lowercase();
        let declared = parts.iter().find(|p| p.to_lowercase() == normalized);
        if declared.is_none() {
            errors.push(SubpartError::UnknownPart(written_as.to_string()));
        }

        let subparts = split_list(rest, ',');
        if subparts.is_empty() {
            errors.push(SubpartError::NoSubparts(written_as.to_string()));
            continue;
        }

        if let Some(part) = declared {
            map.insert(SubpartGroup {
                part: part.clone(),
                written_as: written_as.to_string(),
                subparts,
            });
        }
    }

    if errors.is_empty() {
        Ok(map)
    } else {
        Err(errors)
    }
}
