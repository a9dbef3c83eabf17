//! Route table and the authentication guard.
//!
//! Public routes render without a session. Every other route sits behind a
//! [`RouteGuard`], which starts undetermined, settles once the credential
//! cache has been read, and re-evaluates only when credential presence
//! actually changes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    ChangePassword,
    ResendEmail,
    ConfirmEmail,
    Home,
    CreatePost,
    Profile,
    About,
}

const ROUTES: [Route; 9] = [
    Route::Login,
    Route::Register,
    Route::ChangePassword,
    Route::ResendEmail,
    Route::ConfirmEmail,
    Route::Home,
    Route::CreatePost,
    Route::Profile,
    Route::About,
];

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ChangePassword => "/changepassword",
            Self::ResendEmail => "/resendemail",
            Self::ConfirmEmail => "/confirmemail",
            Self::Home => "/home",
            Self::CreatePost => "/createPost",
            Self::Profile => "/profile",
            Self::About => "/about",
        }
    }

    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        ROUTES.into_iter().find(|route| route.path() == path)
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(
            self,
            Self::Login
                | Self::Register
                | Self::ChangePassword
                | Self::ResendEmail
                | Self::ConfirmEmail
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// `true` only for the public routes; unknown paths are protected.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    Route::parse(path).is_some_and(Route::is_public)
}

/// Page chrome for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub show_navbar: bool,
    pub guarded: bool,
}

#[must_use]
pub fn resolve_layout(path: &str) -> Layout {
    let public = is_public_path(path);
    Layout {
        show_navbar: !public,
        guarded: !public,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Undetermined,
    Authorized,
    Unauthorized,
}

/// What a guarded page should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render nothing yet.
    Hold,
    Render,
    Redirect(Route),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    state: GuardState,
    present: Option<bool>,
}

impl RouteGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    #[must_use]
    pub const fn decision(&self) -> GuardDecision {
        match self.state {
            GuardState::Undetermined => GuardDecision::Hold,
            GuardState::Authorized => GuardDecision::Render,
            GuardState::Unauthorized => GuardDecision::Redirect(Route::Login),
        }
    }

    /// Settles the guard from the credential cache when the page mounts.
    pub fn mount(&mut self, credential_present: bool) -> GuardDecision {
        self.settle(credential_present);
        self.decision()
    }

    /// Re-evaluates after a credential-relevant change.
    ///
    /// Returns `None` when presence did not change, so callers can skip the
    /// re-render.
    pub fn credential_changed(&mut self, credential_present: bool) -> Option<GuardDecision> {
        if self.present == Some(credential_present) {
            return None;
        }
        self.settle(credential_present);
        Some(self.decision())
    }

    fn settle(&mut self, credential_present: bool) {
        self.present = Some(credential_present);
        self.state = if credential_present {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        };
        tracing::debug!(state = ?self.state, "route guard settled");
    }
}
