use swc_core::common::{
    comments::{Comment, CommentKind, Comments},
    DUMMY_SP,
};

use crate::tree::Tree;

pub const DIAGNOSTIC_PREFIX: &str = "TODO: (@hypermod)";

/// Body of the block comment for `message`, spaces included.
pub fn comment_text(message: &str) -> String {
    format!(" {DIAGNOSTIC_PREFIX} {message} ")
}

/// Insert `/* TODO: (@hypermod) <message> */` at the top of the file.
///
/// The comment goes after diagnostics already at the top and before any
/// other leading comment (license headers etc). An identical diagnostic is
/// never added twice. Returns whether a comment was inserted.
pub fn report(tree: &Tree, message: &str) -> bool {
    let pos = tree.start_pos();
    let text = comment_text(message);

    let exists = tree
        .comments
        .with_leading(pos, |cs| cs.iter().any(|c| c.text.as_ref() == text));
    if exists {
        return false;
    }

    let existing = tree.comments.take_leading(pos).unwrap_or_default();
    let split = existing
        .iter()
        .take_while(|c| c.text.trim_start().starts_with(DIAGNOSTIC_PREFIX))
        .count();

    let mut ordered = Vec::with_capacity(existing.len() + 1);
    let mut existing = existing.into_iter();
    ordered.extend(existing.by_ref().take(split));
    ordered.push(Comment {
        kind: CommentKind::Block,
        span: DUMMY_SP,
        text: text.into(),
    });
    ordered.extend(existing);
    tree.comments.add_leading_comments(pos, ordered);
    true
}

/// Insert diagnostic comments into source text at the top of the file.
///
/// A `#!` line stays first, and diagnostics already at the top stay ahead of
/// the new ones. Everything else is left byte for byte.
pub fn prepend_to_text(source: &str, messages: &[String]) -> String {
    let header: String = messages
        .iter()
        .map(|m| format!("/*{}*/\n", comment_text(m)))
        .collect();

    let mut split = if source.starts_with("#!") {
        source.find('\n').map(|i| i + 1).unwrap_or(source.len())
    } else {
        0
    };
    while let Some(body) = source[split..].strip_prefix("/*") {
        if !body.trim_start().starts_with(DIAGNOSTIC_PREFIX) {
            break;
        }
        let Some(end) = body.find("*/") else {
            break;
        };
        split += 2 + end + 2;
        if source[split..].starts_with('\n') {
            split += 1;
        }
    }

    let (head, rest) = source.split_at(split);
    let mut out = String::with_capacity(source.len() + header.len() + 1);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&header);
    out.push_str(rest);
    out
}
