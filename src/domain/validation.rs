//! Client-side validation performed before an operation is dispatched.
//!
//! A failed check never reaches the network and never touches slice state; the
//! caller surfaces the message inline instead.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Longest post body accepted, counted in characters after trimming.
pub const MAX_POST_CHARS: usize = 1000;

const PASSWORD_MIN_CHARS: usize = 8;

const PASSWORD_SPECIALS: &str = "#?!@$%^&*-";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Post content should be less than 1000 characters.")]
    PostTooLong,

    #[error("Post content cannot be empty")]
    EmptyPost,

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("User not logged in")]
    NotLoggedIn,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password must be 8+ chars, include upper, lower, number & special char")]
    WeakPassword,

    #[error("{0} is required")]
    Required(&'static str),
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Content for a new post: may be empty (image-only posts), but not too long.
pub fn new_post_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.chars().count() > MAX_POST_CHARS {
        return Err(ValidationError::PostTooLong);
    }
    Ok(trimmed.to_string())
}

/// Content for an edited post: required and bounded.
pub fn edited_post_content(content: &str) -> Result<String, ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyPost);
    }
    new_post_content(content)
}

pub fn comment_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(trimmed.to_string())
}

pub fn email(address: &str) -> Result<(), ValidationError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    if email_regex().is_some_and(|re| re.is_match(address)) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Password strength rule shared by login and registration.
pub fn password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    let strong = password.chars().count() >= PASSWORD_MIN_CHARS
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if strong {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_length_is_measured_after_trimming() {
        let padded = format!("  {}  ", "a".repeat(MAX_POST_CHARS));
        assert_eq!(new_post_content(&padded).unwrap().len(), MAX_POST_CHARS);

        let too_long = "a".repeat(MAX_POST_CHARS + 1);
        assert_eq!(new_post_content(&too_long), Err(ValidationError::PostTooLong));
    }

    #[test]
    fn edited_post_must_not_be_blank() {
        assert_eq!(edited_post_content("   "), Err(ValidationError::EmptyPost));
        assert_eq!(edited_post_content(" fixed ").unwrap(), "fixed");
    }

    #[test]
    fn comment_must_not_be_blank() {
        assert_eq!(comment_content("\n\t"), Err(ValidationError::EmptyComment));
        assert_eq!(
            ValidationError::EmptyComment.to_string(),
            "Comment cannot be empty"
        );
    }

    #[test]
    fn password_needs_every_character_class() {
        assert!(password("Str0ng!pw").is_ok());
        assert_eq!(password("weakpass"), Err(ValidationError::WeakPassword));
        assert_eq!(password("NoDigits!!"), Err(ValidationError::WeakPassword));
        assert_eq!(password("Sh0r!t"), Err(ValidationError::WeakPassword));
        assert_eq!(password(""), Err(ValidationError::Required("Password")));
    }

    #[test]
    fn email_shape() {
        assert!(email("user@example.com").is_ok());
        assert_eq!(email("user@"), Err(ValidationError::InvalidEmail));
        assert_eq!(email(" "), Err(ValidationError::Required("Email")));
    }
}
