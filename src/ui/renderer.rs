//! Plain-text rendering of view models for the CLI.

use super::viewmodel::{CommentRow, FeedViewModel, PostCard, ProfileViewModel, UserRow};
use std::fmt::{self, Write};

/// Renders the feed as plain text.
#[must_use]
pub fn render_feed(vm: &FeedViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_feed(&mut out, vm);
    out
}

/// Renders a bare comment list.
#[must_use]
pub fn render_comments(rows: &[CommentRow]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("no comments\n");
    }
    for row in rows {
        let _ = write_comment(&mut out, row);
    }
    out
}

/// Renders the user directory as plain text.
#[must_use]
pub fn render_profile(vm: &ProfileViewModel) -> String {
    let mut out = String::new();
    let _ = write_profile(&mut out, vm);
    out
}

fn write_feed(out: &mut impl Write, vm: &FeedViewModel) -> fmt::Result {
    if vm.loading {
        writeln!(out, "Loading...")?;
    }
    if let Some(error) = &vm.error {
        writeln!(out, "error: {error}")?;
    }
    if let Some(empty) = &vm.empty_state {
        writeln!(out, "{}", empty.message)?;
        return writeln!(out, "  {}", empty.subtitle);
    }

    for (i, card) in vm.cards.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_card(out, card)?;
    }
    Ok(())
}

fn write_card(out: &mut impl Write, card: &PostCard) -> fmt::Result {
    write!(out, "#{} {}", card.post_id, card.author)?;
    if let Some(posted) = &card.posted {
        write!(out, " · {posted}")?;
    }
    if card.editing {
        write!(out, " (editing)")?;
    }
    writeln!(out)?;

    for line in card.body.lines() {
        writeln!(out, "  {line}")?;
    }
    if card.truncated {
        writeln!(out, "  [see more: --expand {}]", card.post_id)?;
    }
    if let Some(image) = &card.image_url {
        writeln!(out, "  image: {image}")?;
    }
    writeln!(out, "  {} comment(s)", card.comments_count)?;

    if let Some(comments) = &card.comments {
        if comments.is_empty() {
            writeln!(out, "    no comments")?;
        }
        for comment in comments {
            write_comment(out, comment)?;
        }
    }
    if let Some(draft) = &card.comment_input {
        writeln!(out, "    > {draft}")?;
    }
    Ok(())
}

fn write_comment(out: &mut impl Write, row: &CommentRow) -> fmt::Result {
    write!(out, "    [{}] {}", row.comment_id, row.author)?;
    if let Some(posted) = &row.posted {
        write!(out, " · {posted}")?;
    }
    writeln!(out, ": {}", row.body)
}

fn write_profile(out: &mut impl Write, vm: &ProfileViewModel) -> fmt::Result {
    if let Some(message) = &vm.message {
        writeln!(out, "{message}")?;
    }
    if let Some(error) = &vm.error {
        writeln!(out, "error: {error}")?;
    }
    if vm.users.is_empty() {
        return if vm.filter.is_empty() {
            writeln!(out, "No users")
        } else {
            writeln!(out, "No users match \"{}\"", vm.filter)
        };
    }

    writeln!(out, "{:<8} {:<28} {:<10} ADDRESS", "ID", "NAME", "TYPE")?;
    for user in &vm.users {
        write_user(out, user)?;
    }
    Ok(())
}

fn write_user(out: &mut impl Write, user: &UserRow) -> fmt::Result {
    let marker = if user.editable { " (you)" } else { "" };
    writeln!(
        out,
        "{:<8} {:<28} {:<10} {}{marker}",
        user.user_id.as_str(),
        user.name,
        user.user_type,
        user.address
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PostId, UserId};
    use crate::ui::viewmodel::EmptyState;

    fn card() -> PostCard {
        PostCard {
            post_id: PostId::from("42"),
            author: "Ada".into(),
            avatar_url: None,
            posted: Some("5m ago".into()),
            body: "hello".into(),
            truncated: true,
            image_url: None,
            comments_count: 2,
            editing: false,
            comments: None,
            comment_input: None,
        }
    }

    #[test]
    fn feed_shows_author_time_and_expand_hint() {
        let vm = FeedViewModel { cards: vec![card()], loading: false, error: None, empty_state: None };
        let text = render_feed(&vm);
        assert!(text.starts_with("#42 Ada · 5m ago\n"));
        assert!(text.contains("--expand 42"));
        assert!(text.contains("2 comment(s)"));
    }

    #[test]
    fn empty_feed_shows_empty_state() {
        let vm = FeedViewModel {
            cards: vec![],
            loading: false,
            error: Some("Failed to fetch posts".into()),
            empty_state: Some(EmptyState { message: "No posts yet".into(), subtitle: "hint".into() }),
        };
        let text = render_feed(&vm);
        assert!(text.contains("error: Failed to fetch posts"));
        assert!(text.contains("No posts yet"));
    }

    #[test]
    fn profile_marks_own_row() {
        let vm = ProfileViewModel {
            users: vec![UserRow {
                user_id: UserId::from("1"),
                name: "Ada".into(),
                address: "London".into(),
                user_type: "Patient".into(),
                image: None,
                editable: true,
            }],
            filter: String::new(),
            message: None,
            error: None,
            loading: false,
        };
        assert!(render_profile(&vm).contains("London (you)"));
    }

    #[test]
    fn unmatched_filter_is_reported() {
        let vm = ProfileViewModel {
            users: vec![],
            filter: "zz".into(),
            message: None,
            error: None,
            loading: false,
        };
        assert_eq!(render_profile(&vm), "No users match \"zz\"\n");
    }
}
