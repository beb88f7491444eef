//! Commit message tags linking commits to roadmap items.
//!
//! The core only builds and recognises tag strings; running version control
//! is left to the caller.

use crate::id::ItemId;

/// `[<id>] <message>`
pub fn format_commit_message(id: &ItemId, message: &str) -> String {
    format!("{} {}", id.commit_tag(), message)
}

/// Split a leading `[<id>]` tag off a commit message.
///
/// Returns the id and the rest of the message with one leading space
/// removed, or `None` if the message does not start with a valid tag.
pub fn parse_commit_message(message: &str) -> Option<(ItemId, &str)> {
    let rest = message.strip_prefix('[')?;
    let close = rest.find(']')?;
    let id = ItemId::parse(&rest[..close]).ok()?;
    let remainder = &rest[close + 1..];
    Some((id, remainder.strip_prefix(' ').unwrap_or(remainder)))
}
