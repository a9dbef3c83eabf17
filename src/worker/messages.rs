//! Operation protocol between the store and the worker.
//!
//! An [`Operation`] names one remote action and carries its input; the worker
//! answers with an [`Outcome`] (the fulfilled payload) or a normalized
//! [`crate::api::ApiError`]. Operations are validated client-side before they
//! are handed over.

use crate::api::ImageUpload;
use crate::domain::validation::{self, ValidationError};
use crate::domain::{Comment, CommentId, Credential, Post, PostId, Secret, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: Secret,
    pub full_name: String,
    pub address: String,
    pub user_type: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: Secret,
}

/// Body and optional image of a post being created or edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDraft {
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl PostDraft {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub address: String,
    pub image: Option<ImageUpload>,
}

/// A named asynchronous action against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    RegisterUser(RegisterForm),
    ConfirmEmail { email: String, otp: String },
    ResendConfirmEmail { email: String },

    LoginUser(LoginForm),

    FetchPosts,
    CreatePost(PostDraft),
    UpdatePost { post_id: PostId, draft: PostDraft },
    DeletePost { post_id: PostId },

    FetchComments { post_id: PostId },
    CreateComment { post_id: PostId, content: String },
    EditComment { post_id: PostId, comment_id: CommentId, content: String },
    DeleteComment { post_id: PostId, comment_id: CommentId },

    SaveToken,
    FetchUsers,
    UpdateProfile(ProfileForm),
    ChangePassword { old_password: Secret, new_password: Secret },
}

impl Operation {
    /// Stable `slice/action` name used in logs and request tracking.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser(_) => "auth/registerUser",
            Self::ConfirmEmail { .. } => "auth/confirmEmail",
            Self::ResendConfirmEmail { .. } => "auth/resendConfirmEmail",
            Self::LoginUser(_) => "login/loginUser",
            Self::FetchPosts => "posts/getAll",
            Self::CreatePost(_) => "posts/create",
            Self::UpdatePost { .. } => "posts/update",
            Self::DeletePost { .. } => "posts/delete",
            Self::FetchComments { .. } => "comments/get",
            Self::CreateComment { .. } => "comments/create",
            Self::EditComment { .. } => "comments/edit",
            Self::DeleteComment { .. } => "comments/delete",
            Self::SaveToken => "profile/addToken",
            Self::FetchUsers => "profile/getUsers",
            Self::UpdateProfile(_) => "profile/updateProfile",
            Self::ChangePassword { .. } => "profile/changePassword",
        }
    }

    /// Applies the client-side checks and returns the normalized operation.
    ///
    /// Text fields that are trimmed before submission come back trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first failed check. A failed operation must not be
    /// dispatched.
    pub fn validated(self, credential: Option<&Credential>) -> Result<Self, ValidationError> {
        match self {
            Self::RegisterUser(form) => {
                validation::email(&form.email)?;
                validation::password(form.password.expose())?;
                validation::required("Full Name", &form.full_name)?;
                validation::required("Address", &form.address)?;
                validation::required("User Type", &form.user_type)?;
                Ok(Self::RegisterUser(RegisterForm {
                    email: form.email.trim().to_string(),
                    ..form
                }))
            }
            Self::ConfirmEmail { email, otp } => {
                validation::email(&email)?;
                validation::required("OTP", &otp)?;
                Ok(Self::ConfirmEmail {
                    email: email.trim().to_string(),
                    otp: otp.trim().to_string(),
                })
            }
            Self::ResendConfirmEmail { email } => {
                validation::email(&email)?;
                Ok(Self::ResendConfirmEmail {
                    email: email.trim().to_string(),
                })
            }
            Self::LoginUser(form) => {
                validation::email(&form.email)?;
                validation::password(form.password.expose())?;
                Ok(Self::LoginUser(LoginForm {
                    email: form.email.trim().to_string(),
                    password: form.password,
                }))
            }
            Self::CreatePost(draft) => Ok(Self::CreatePost(PostDraft {
                content: validation::new_post_content(&draft.content)?,
                image: draft.image,
            })),
            Self::UpdatePost { post_id, draft } => Ok(Self::UpdatePost {
                post_id,
                draft: PostDraft {
                    content: validation::edited_post_content(&draft.content)?,
                    image: draft.image,
                },
            }),
            Self::CreateComment { post_id, content } => {
                let content = validation::comment_content(&content)?;
                if credential.is_none() {
                    return Err(ValidationError::NotLoggedIn);
                }
                Ok(Self::CreateComment { post_id, content })
            }
            Self::EditComment {
                post_id,
                comment_id,
                content,
            } => Ok(Self::EditComment {
                post_id,
                comment_id,
                content: validation::comment_content(&content)?,
            }),
            Self::UpdateProfile(form) => {
                validation::required("Name", &form.name)?;
                validation::required("Address", &form.address)?;
                Ok(Self::UpdateProfile(form))
            }
            Self::ChangePassword {
                old_password,
                new_password,
            } => {
                validation::required("Old password", old_password.expose())?;
                validation::required("New password", new_password.expose())?;
                Ok(Self::ChangePassword {
                    old_password,
                    new_password,
                })
            }
            other => Ok(other),
        }
    }
}

/// Result of a post update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostUpdate {
    /// The backend returned the updated post.
    Replaced(Post),
    /// The backend acknowledged without a usable body; patch the local copy.
    Patched { post_id: PostId, content: String },
}

/// Result of a comment edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentUpdate {
    Replaced(Comment),
    /// Acknowledged without a usable body; patch the local copy.
    Patched { comment_id: CommentId, content: String },
}

/// Fulfilled payload of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered(Option<User>),
    EmailConfirmed,
    ConfirmationResent,

    LoggedIn { token: String, user: User },

    Posts(Vec<Post>),
    PostCreated(Post),
    PostUpdated(PostUpdate),
    PostDeleted(PostId),

    Comments { post_id: PostId, comments: Vec<Comment> },
    /// `comment` is `None` when the backend acknowledged without echoing it.
    CommentCreated { post_id: PostId, comment: Option<Comment> },
    CommentEdited { post_id: PostId, edit: CommentUpdate },
    CommentDeleted { post_id: PostId, comment_id: CommentId },

    TokenSaved { message: String },
    Users(Vec<User>),
    ProfileUpdated(Option<User>),
    PasswordChanged { message: String },
}
