//! Hierarchical item identifiers.
//!
//! An [`ItemId`] is a family letter followed by one to three dot-separated
//! numbers: `D3` (milestone), `D3.1` (task), `D3.1.2` (subtask). The level of an
//! id is implied by how many numbers it carries, and its parent is always the
//! id with the deepest number dropped.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Depth of an id in the milestone → task → subtask hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Milestone,
    Task,
    Subtask,
}

impl Level {
    /// Numeric depth: 0 for milestones, 1 for tasks, 2 for subtasks.
    pub fn depth(&self) -> u8 {
        match self {
            Self::Milestone => 0,
            Self::Task => 1,
            Self::Subtask => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Task => "task",
            Self::Subtask => "subtask",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed hierarchical identifier.
///
/// The derived ordering is the natural one: family, then milestone, task and
/// subtask numerically, with a parent sorting before its children
/// (`D2 < D2.1 < D2.1.1 < D2.2 < D10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId {
    family: char,
    milestone: u32,
    task: Option<u32>,
    subtask: Option<u32>,
}

impl ItemId {
    /// Build a milestone id. `family` must be an ASCII letter.
    pub fn milestone(family: char, milestone: u32) -> Result<Self> {
        if !family.is_ascii_alphabetic() {
            return Err(Error::malformed(
                &format!("{family}{milestone}"),
                format!("family must be alphabetic: {family}"),
            ));
        }
        Ok(Self {
            family,
            milestone,
            task: None,
            subtask: None,
        })
    }

    /// The id one level down with the given number, or `None` below a subtask.
    pub fn child(&self, number: u32) -> Option<Self> {
        match (self.task, self.subtask) {
            (None, _) => Some(Self {
                task: Some(number),
                ..*self
            }),
            (Some(_), None) => Some(Self {
                subtask: Some(number),
                ..*self
            }),
            (Some(_), Some(_)) => None,
        }
    }

    /// Parse text into an id. See [`FromStr`] for the grammar.
    pub fn parse(text: &str) -> Result<Self> {
        text.parse()
    }

    pub fn family(&self) -> char {
        self.family
    }

    pub fn milestone_number(&self) -> u32 {
        self.milestone
    }

    pub fn task_number(&self) -> Option<u32> {
        self.task
    }

    pub fn subtask_number(&self) -> Option<u32> {
        self.subtask
    }

    pub fn level(&self) -> Level {
        match (self.task, self.subtask) {
            (None, _) => Level::Milestone,
            (Some(_), None) => Level::Task,
            (Some(_), Some(_)) => Level::Subtask,
        }
    }

    /// Strip the deepest component. Milestones have no parent.
    pub fn parent(&self) -> Option<Self> {
        match self.level() {
            Level::Milestone => None,
            Level::Task => Some(Self { task: None, ..*self }),
            Level::Subtask => Some(Self {
                subtask: None,
                ..*self
            }),
        }
    }

    /// The milestone this id belongs to (itself for a milestone).
    pub fn root(&self) -> Self {
        Self {
            task: None,
            subtask: None,
            ..*self
        }
    }

    /// The id wrapped for a commit message prefix: `[D3.1]`.
    pub fn commit_tag(&self) -> String {
        format!("[{self}]")
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family, self.milestone)?;
        if let Some(task) = self.task {
            write!(f, ".{task}")?;
        }
        if let Some(subtask) = self.subtask {
            write!(f, ".{subtask}")?;
        }
        Ok(())
    }
}

impl FromStr for ItemId {
    type Err = Error;

    /// One leading ASCII letter followed by 1–3 dot-separated non-negative
    /// integers.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::malformed(s, "empty ID"));
        }
        if s.len() < 2 {
            return Err(Error::malformed(s, "too short"));
        }

        let family = s.chars().next().unwrap_or_default();
        if !family.is_ascii_alphabetic() {
            return Err(Error::malformed(
                s,
                format!("family must be alphabetic: {family}"),
            ));
        }

        let parts: Vec<&str> = s[1..].split('.').collect();
        if parts.len() > 3 {
            return Err(Error::malformed(s, "more than three numeric segments"));
        }

        let mut numbers = [None; 3];
        for (slot, (part, name)) in numbers
            .iter_mut()
            .zip(parts.iter().zip(["milestone", "task", "subtask"]))
        {
            *slot = Some(parse_number(s, part, name)?);
        }

        let [milestone, task, subtask] = numbers;
        Ok(Self {
            family,
            milestone: milestone.unwrap_or_default(),
            task,
            subtask,
        })
    }
}

fn parse_number(input: &str, part: &str, name: &str) -> Result<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(input, format!("invalid {name} number: '{part}'")));
    }
    part.parse()
        .map_err(|_| Error::malformed(input, format!("{name} number out of range: {part}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::parse(s).expect("valid id")
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!(id("D3").level(), Level::Milestone);
        assert_eq!(id("D3.1").level(), Level::Task);
        assert_eq!(id("D3.1.2").level(), Level::Subtask);
        assert_eq!(id("D3.1.2").level().depth(), 2);
    }

    #[test]
    fn test_parse_components() {
        let parsed = id("E12.4.7");
        assert_eq!(parsed.family(), 'E');
        assert_eq!(parsed.milestone_number(), 12);
        assert_eq!(parsed.task_number(), Some(4));
        assert_eq!(parsed.subtask_number(), Some(7));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "D", "3", "1.2", "D3.1.2.4", "Dx", "D3.", "D.1", "D3..1", "D-1", "D+1", "é3"] {
            let err = ItemId::parse(bad).expect_err(bad);
            assert!(
                matches!(err, Error::MalformedId { .. }),
                "{bad}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn test_format_round_trips() {
        for text in ["D1", "D3.1", "D3.1.2", "a10.20.30", "Z0"] {
            let parsed = id(text);
            assert_eq!(parsed.to_string(), text);
            assert_eq!(ItemId::parse(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn test_parent_strips_deepest_component() {
        assert_eq!(id("D3.1.2").parent(), Some(id("D3.1")));
        assert_eq!(id("D3.1").parent(), Some(id("D3")));
        assert_eq!(id("D3").parent(), None);
    }

    #[test]
    fn test_child_and_root() {
        assert_eq!(id("D3").child(4), Some(id("D3.4")));
        assert_eq!(id("D3.4").child(1), Some(id("D3.4.1")));
        assert_eq!(id("D3.4.1").child(1), None);
        assert_eq!(id("D3.4.1").root(), id("D3"));
    }

    #[test]
    fn test_natural_ordering() {
        let mut ids = vec![id("D10"), id("D2.1"), id("D2"), id("C9"), id("D2.1.1"), id("D2.10")];
        ids.sort();
        let text: Vec<String> = ids.iter().map(ItemId::to_string).collect();
        assert_eq!(text, ["C9", "D2", "D2.1", "D2.1.1", "D2.10", "D10"]);
    }

    #[test]
    fn test_commit_tag() {
        assert_eq!(id("D3.1").commit_tag(), "[D3.1]");
    }

    #[test]
    fn test_milestone_constructor_rejects_non_letter() {
        assert!(ItemId::milestone('7', 1).is_err());
        assert_eq!(ItemId::milestone('F', 2).unwrap(), id("F2"));
    }
}
