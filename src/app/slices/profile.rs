//! User directory and profile maintenance.

use super::{Slice, SliceStatus};
use crate::domain::User;
use crate::worker::{Operation, Outcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub users: Vec<User>,
    /// Confirmation from the last token save or password change.
    pub message: Option<String>,
    pub status: SliceStatus,
}

impl Slice for ProfileState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }

    fn on_pending(&mut self, operation: &Operation) {
        if matches!(
            operation,
            Operation::SaveToken | Operation::ChangePassword { .. }
        ) {
            self.message = None;
        }
    }

    fn on_fulfilled(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Users(users) => self.users.clone_from(users),
            Outcome::ProfileUpdated(Some(user)) => {
                match self.users.iter_mut().find(|u| u.id == user.id) {
                    Some(slot) => *slot = user.clone(),
                    None => self.users.push(user.clone()),
                }
            }
            Outcome::TokenSaved { message } | Outcome::PasswordChanged { message } => {
                self.message = Some(message.clone());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::slices::RequestId;
    use crate::domain::{Secret, UserId, UserType};

    fn user(id: &str, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: None,
            address: "Giza".to_string(),
            image: None,
            user_type: UserType::Patient,
        }
    }

    #[test]
    fn profile_update_upserts() {
        let mut state = ProfileState::default();
        state.fulfilled(RequestId(1), &Outcome::Users(vec![user("1", "A"), user("2", "B")]));

        state.fulfilled(RequestId(2), &Outcome::ProfileUpdated(Some(user("2", "Bee"))));
        assert_eq!(state.users.len(), 2);
        assert_eq!(state.users[1].name, "Bee");

        state.fulfilled(RequestId(3), &Outcome::ProfileUpdated(Some(user("3", "C"))));
        assert_eq!(state.users.len(), 3);
    }

    #[test]
    fn message_is_reset_when_a_new_request_starts() {
        let mut state = ProfileState::default();
        let change = Operation::ChangePassword {
            old_password: Secret::new("old"),
            new_password: Secret::new("new"),
        };

        state.pending(RequestId(1), &change);
        state.fulfilled(
            RequestId(1),
            &Outcome::PasswordChanged {
                message: "Password changed successfully".to_string(),
            },
        );
        assert_eq!(state.message.as_deref(), Some("Password changed successfully"));

        state.pending(RequestId(2), &Operation::SaveToken);
        assert_eq!(state.message, None);

        state.pending(RequestId(3), &Operation::FetchUsers);
        state.rejected(RequestId(3), &Operation::FetchUsers, "Missing token");
        assert_eq!(state.status.error.as_deref(), Some("Missing token"));
    }
}
