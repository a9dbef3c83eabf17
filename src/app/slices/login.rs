//! Login session state.

use super::{Slice, SliceStatus};
use crate::domain::{Secret, User};
use crate::worker::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub user: Option<User>,
    pub token: Option<Secret>,
    pub status: SliceStatus,
}

impl LoginState {
    /// Synchronous sign-out: drops the user, the token and any error.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.status.error = None;
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

impl Slice for LoginState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }

    fn on_fulfilled(&mut self, outcome: &Outcome) {
        if let Outcome::LoggedIn { token, user } = outcome {
            self.token = Some(Secret::new(token.clone()));
            self.user = Some(user.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::slices::RequestId;
    use crate::domain::{UserId, UserType};
    use crate::worker::{LoginForm, Operation};

    fn login_op() -> Operation {
        Operation::LoginUser(LoginForm {
            email: "a@b.co".to_string(),
            password: Secret::new("Passw0rd!"),
        })
    }

    fn user() -> User {
        User {
            id: UserId::new("17"),
            name: "Omar".to_string(),
            email: None,
            address: String::new(),
            image: None,
            user_type: UserType::Patient,
        }
    }

    #[test]
    fn login_then_logout() {
        let mut state = LoginState::default();
        state.pending(RequestId(1), &login_op());
        state.fulfilled(
            RequestId(1),
            &Outcome::LoggedIn {
                token: "tok".to_string(),
                user: user(),
            },
        );
        assert!(state.is_logged_in());
        assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("Omar"));

        state.logout();
        assert!(!state.is_logged_in());
        assert_eq!(state.user, None);
    }

    #[test]
    fn failed_login_keeps_session_empty() {
        let mut state = LoginState::default();
        state.pending(RequestId(1), &login_op());
        state.rejected(RequestId(1), &login_op(), "Invalid credentials");

        assert!(!state.status.loading);
        assert_eq!(state.status.error.as_deref(), Some("Invalid credentials"));
        assert!(!state.is_logged_in());

        state.logout();
        assert_eq!(state.status.error, None);
    }
}
