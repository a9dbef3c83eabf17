//! Registration and email confirmation.

use super::{Slice, SliceStatus};
use crate::domain::User;
use crate::worker::{Operation, Outcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Account returned by the last successful registration.
    pub user: Option<User>,
    pub email_confirmed: bool,
    pub email_resent: bool,
    pub status: SliceStatus,
}

impl Slice for AuthState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }

    fn on_pending(&mut self, operation: &Operation) {
        match operation {
            Operation::ConfirmEmail { .. } => self.email_confirmed = false,
            Operation::ResendConfirmEmail { .. } => self.email_resent = false,
            _ => {}
        }
    }

    fn on_fulfilled(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Registered(user) => self.user.clone_from(user),
            Outcome::EmailConfirmed => self.email_confirmed = true,
            Outcome::ConfirmationResent => self.email_resent = true,
            _ => {}
        }
    }

    fn on_rejected(&mut self, operation: &Operation) {
        self.on_pending(operation);
    }
}
