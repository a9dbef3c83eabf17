//! Remote execution of operations.
//!
//! [`Worker`] turns an [`Operation`] into one HTTP call through the
//! [`ApiClient`] and decodes the response into the matching [`Outcome`]. It
//! never touches application state; the store applies the result.

use crate::api::{Acknowledgement, ApiClient, ApiError, ApiRequest, Auth, MultipartBody, Page};
use crate::domain::{Comment, CommentId, Credential, Post, PostId, Secret, User, UserId};
use crate::worker::messages::{
    CommentUpdate, LoginForm, Operation, Outcome, PostDraft, PostUpdate, ProfileForm,
    RegisterForm,
};
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;

const REGISTER_FAILED: &str = "Registration failed";
const CONFIRM_FAILED: &str = "Email confirmation failed";
const RESEND_FAILED: &str = "Resend email failed";
const LOGIN_FAILED: &str = "Login failed";
const FETCH_POSTS_FAILED: &str = "Failed to fetch posts";
const CREATE_POST_FAILED: &str = "Failed to create post";
const UPDATE_POST_FAILED: &str = "Failed to update post";
const DELETE_POST_FAILED: &str = "Failed to delete post";
const FETCH_COMMENTS_FAILED: &str = "Failed to fetch comments";
const CREATE_COMMENT_FAILED: &str = "Failed to create comment";
const EDIT_COMMENT_FAILED: &str = "Failed to edit comment";
const DELETE_COMMENT_FAILED: &str = "Failed to delete comment";
const SAVE_TOKEN_FAILED: &str = "Something went wrong";
const FETCH_USERS_FAILED: &str = "Failed to fetch users";
const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
const CHANGE_PASSWORD_FAILED: &str = "Failed to change password";

const MISSING_TOKEN: &str = "Missing token";
const MISSING_TOKEN_OR_USER: &str = "Missing token or userId";

const TOKEN_SAVED: &str = "Token saved successfully";
const PASSWORD_CHANGED: &str = "Password changed successfully";

/// Where the post update endpoint expects the post id.
///
/// The backend has exposed both shapes; see the configuration docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostUpdateRoute {
    /// `PUT /post/{id}`
    #[default]
    PathId,
    /// `PUT /post`, id only in the multipart body.
    BodyId,
}

impl PostUpdateRoute {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "path" | "path_id" => Some(Self::PathId),
            "body" | "body_id" => Some(Self::BodyId),
            _ => None,
        }
    }
}

/// Request parameters that come from configuration rather than user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub page_number: u32,
    pub page_size: u32,
    pub post_update_route: PostUpdateRoute,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
            post_update_route: PostUpdateRoute::default(),
        }
    }
}

/// Login response: the token next to the flattened user record.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
    #[serde(flatten)]
    user: User,
}

/// Comment as sent by the backend, which sometimes omits the owning post.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentWire {
    id: CommentId,
    #[serde(default)]
    post_id: Option<PostId>,
    #[serde(default)]
    user_id: Option<UserId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_image_url: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    time: Option<String>,
}

impl CommentWire {
    fn into_comment(self, requested: &PostId) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id.unwrap_or_else(|| requested.clone()),
            user_id: self.user_id,
            name: self.name,
            user_image_url: self.user_image_url,
            content: self.content,
            time: self.time,
        }
    }
}

/// Executes operations against the backend.
#[derive(Debug, Clone)]
pub struct Worker {
    client: ApiClient,
    settings: WorkerSettings,
}

impl Worker {
    #[must_use]
    pub const fn new(client: ApiClient, settings: WorkerSettings) -> Self {
        Self { client, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// Performs the remote call for `operation`.
    ///
    /// `credential` is the session snapshot taken at dispatch time; operations
    /// that require one fail with "Missing token" when it is absent.
    ///
    /// # Errors
    ///
    /// Returns the normalized error of the call.
    pub async fn execute(
        &self,
        operation: &Operation,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let span = tracing::debug_span!("worker_execute", operation = operation.name());
        self.execute_inner(operation, credential)
            .instrument(span)
            .await
    }

    async fn execute_inner(
        &self,
        operation: &Operation,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        match operation {
            Operation::RegisterUser(form) => self.handle_register(form).await,
            Operation::ConfirmEmail { email, otp } => self.handle_confirm_email(email, otp).await,
            Operation::ResendConfirmEmail { email } => self.handle_resend_confirmation(email).await,
            Operation::LoginUser(form) => self.handle_login(form).await,
            Operation::FetchPosts => self.handle_fetch_posts(credential).await,
            Operation::CreatePost(draft) => self.handle_create_post(draft, credential).await,
            Operation::UpdatePost { post_id, draft } => {
                self.handle_update_post(post_id, draft, credential).await
            }
            Operation::DeletePost { post_id } => self.handle_delete_post(post_id, credential).await,
            Operation::FetchComments { post_id } => self.handle_fetch_comments(post_id).await,
            Operation::CreateComment { post_id, content } => {
                self.handle_create_comment(post_id, content, credential).await
            }
            Operation::EditComment {
                post_id,
                comment_id,
                content,
            } => self.handle_edit_comment(post_id, comment_id, content).await,
            Operation::DeleteComment {
                post_id,
                comment_id,
            } => self.handle_delete_comment(post_id, comment_id).await,
            Operation::SaveToken => self.handle_save_token(credential).await,
            Operation::FetchUsers => self.handle_fetch_users(credential).await,
            Operation::UpdateProfile(form) => self.handle_update_profile(form, credential).await,
            Operation::ChangePassword {
                old_password,
                new_password,
            } => {
                self.handle_change_password(old_password, new_password, credential)
                    .await
            }
        }
    }

    async fn handle_register(&self, form: &RegisterForm) -> Result<Outcome, ApiError> {
        let body = MultipartBody::new()
            .text("Email", &form.email)
            .text("Password", form.password.expose())
            .text("FullName", &form.full_name)
            .text("Address", &form.address)
            .text("UserType", &form.user_type)
            .file("Image", form.image.as_ref());
        let request = ApiRequest::post("auth/register", REGISTER_FAILED).multipart(body);

        let user = self.client.call_optional::<User>(request).await?;
        tracing::debug!(returned_user = user.is_some(), "registration accepted");
        Ok(Outcome::Registered(user))
    }

    async fn handle_confirm_email(&self, email: &str, otp: &str) -> Result<Outcome, ApiError> {
        let request = ApiRequest::post("auth/confirm-email", CONFIRM_FAILED)
            .json(json!({ "email": email, "otp": otp }));
        self.client.call_unit(request).await?;
        Ok(Outcome::EmailConfirmed)
    }

    async fn handle_resend_confirmation(&self, email: &str) -> Result<Outcome, ApiError> {
        let request = ApiRequest::post("auth/resend-Confirm-email", RESEND_FAILED)
            .json(json!({ "email": email }));
        self.client.call_unit(request).await?;
        Ok(Outcome::ConfirmationResent)
    }

    async fn handle_login(&self, form: &LoginForm) -> Result<Outcome, ApiError> {
        let request = ApiRequest::post("auth/login", LOGIN_FAILED)
            .json(json!({ "email": form.email, "password": form.password.expose() }));

        let response = self.client.call::<LoginResponse>(request).await?;
        if response.token.is_empty() {
            tracing::warn!("login response carried no token");
            return Err(ApiError::new(LOGIN_FAILED));
        }

        tracing::debug!(user_id = %response.user.id, user_type = %response.user.user_type, "logged in");
        Ok(Outcome::LoggedIn {
            token: response.token,
            user: response.user,
        })
    }

    async fn handle_fetch_posts(&self, credential: Option<&Credential>) -> Result<Outcome, ApiError> {
        let mut request = ApiRequest::get("post", FETCH_POSTS_FAILED)
            .query("PageNumber", self.settings.page_number.to_string())
            .query("PageSize", self.settings.page_size.to_string());
        if let Some(credential) = credential {
            request = request.auth(Auth::TokenHeader(credential.token.clone()));
        }

        let page = self.client.call::<Page<Post>>(request).await?;
        tracing::debug!(count = page.data.len(), "posts fetched");
        Ok(Outcome::Posts(page.data))
    }

    async fn handle_create_post(
        &self,
        draft: &PostDraft,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let mut body = MultipartBody::new()
            .text("Content", &draft.content)
            .file("Image", draft.image.as_ref());
        if let Some(credential) = credential {
            body = body.text("UserId", credential.user_id.as_str());
        }
        let request = ApiRequest::post("post", CREATE_POST_FAILED)
            .multipart(body)
            .auth(bearer(credential));

        let post = self.client.call::<Post>(request).await?;
        tracing::debug!(post_id = %post.id, "post created");
        Ok(Outcome::PostCreated(post))
    }

    async fn handle_update_post(
        &self,
        post_id: &PostId,
        draft: &PostDraft,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let user_id = credential.map_or("", |c| c.user_id.as_str());
        let body = MultipartBody::new()
            .text("Id", post_id.as_str())
            .text("UserId", user_id)
            .text("Content", &draft.content)
            .file("Image", draft.image.as_ref());

        let request = match self.settings.post_update_route {
            PostUpdateRoute::PathId => {
                ApiRequest::put("post", UPDATE_POST_FAILED).segment(post_id.as_str())
            }
            PostUpdateRoute::BodyId => ApiRequest::put("post", UPDATE_POST_FAILED),
        }
        .multipart(body)
        .auth(bearer(credential));

        let update = match self.client.call_optional::<Post>(request).await? {
            Some(post) => PostUpdate::Replaced(post),
            None => {
                tracing::debug!(post_id = %post_id, "update acknowledged without body, patching locally");
                PostUpdate::Patched {
                    post_id: post_id.clone(),
                    content: draft.content.clone(),
                }
            }
        };
        Ok(Outcome::PostUpdated(update))
    }

    async fn handle_delete_post(
        &self,
        post_id: &PostId,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let request = ApiRequest::delete("post", DELETE_POST_FAILED)
            .segment(post_id.as_str())
            .auth(bearer(credential));
        self.client.call_unit(request).await?;
        Ok(Outcome::PostDeleted(post_id.clone()))
    }

    async fn handle_fetch_comments(&self, post_id: &PostId) -> Result<Outcome, ApiError> {
        let request = ApiRequest::get("Comments", FETCH_COMMENTS_FAILED).segment(post_id.as_str());
        let comments = self
            .client
            .call::<Vec<CommentWire>>(request)
            .await?
            .into_iter()
            .map(|wire| wire.into_comment(post_id))
            .collect::<Vec<_>>();

        tracing::debug!(post_id = %post_id, count = comments.len(), "comments fetched");
        Ok(Outcome::Comments {
            post_id: post_id.clone(),
            comments,
        })
    }

    async fn handle_create_comment(
        &self,
        post_id: &PostId,
        content: &str,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let user_id = credential.map(|c| c.user_id.clone());
        let request = ApiRequest::post("Comments", CREATE_COMMENT_FAILED).json(json!({
            "PostId": post_id,
            "UserId": user_id,
            "Content": content,
        }));

        let comment = self
            .client
            .call_optional::<CommentWire>(request)
            .await?
            .map(|wire| wire.into_comment(post_id));
        if comment.is_none() {
            tracing::debug!(post_id = %post_id, "comment accepted without body");
        }
        Ok(Outcome::CommentCreated {
            post_id: post_id.clone(),
            comment,
        })
    }

    async fn handle_edit_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        content: &str,
    ) -> Result<Outcome, ApiError> {
        let request = ApiRequest::put("Comments", EDIT_COMMENT_FAILED).json(json!({
            "postId": post_id,
            "commentId": comment_id,
            "content": content,
        }));

        let edit = match self.client.call_optional::<CommentWire>(request).await? {
            Some(wire) => CommentUpdate::Replaced(wire.into_comment(post_id)),
            None => {
                tracing::debug!(comment_id = %comment_id, "edit acknowledged without body, patching locally");
                CommentUpdate::Patched {
                    comment_id: comment_id.clone(),
                    content: content.to_string(),
                }
            }
        };
        Ok(Outcome::CommentEdited {
            post_id: post_id.clone(),
            edit,
        })
    }

    async fn handle_delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<Outcome, ApiError> {
        let request = ApiRequest::delete("Comments", DELETE_COMMENT_FAILED)
            .segment(post_id.as_str())
            .segment(comment_id.as_str());
        self.client.call_unit(request).await?;
        Ok(Outcome::CommentDeleted {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
        })
    }

    async fn handle_save_token(&self, credential: Option<&Credential>) -> Result<Outcome, ApiError> {
        let credential = credential.ok_or_else(|| ApiError::new(MISSING_TOKEN_OR_USER))?;
        let request = ApiRequest::post("User/save-token", SAVE_TOKEN_FAILED)
            .json(json!({ "token": credential.token, "userId": credential.user_id }))
            .auth(Auth::Bearer(credential.token.clone()));

        let ack = self.client.call_optional::<Acknowledgement>(request).await?;
        Ok(Outcome::TokenSaved {
            message: acknowledgement_message(ack, TOKEN_SAVED),
        })
    }

    async fn handle_fetch_users(&self, credential: Option<&Credential>) -> Result<Outcome, ApiError> {
        let credential = credential.ok_or_else(|| ApiError::new(MISSING_TOKEN))?;
        let request = ApiRequest::get("User/GetUsers", FETCH_USERS_FAILED)
            .query("userType", credential.user_type.as_str())
            .auth(Auth::Bearer(credential.token.clone()));

        let users = self.client.call::<Vec<User>>(request).await?;
        tracing::debug!(count = users.len(), user_type = %credential.user_type, "users fetched");
        Ok(Outcome::Users(users))
    }

    async fn handle_update_profile(
        &self,
        form: &ProfileForm,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let credential = credential.ok_or_else(|| ApiError::new(MISSING_TOKEN))?;
        let body = MultipartBody::new()
            .text("Name", &form.name)
            .text("Address", &form.address)
            .file("ImageFile", form.image.as_ref());
        let request = ApiRequest::put("User/EditUserProfile", UPDATE_PROFILE_FAILED)
            .multipart(body)
            .auth(Auth::Bearer(credential.token.clone()));

        let user = self.client.call_optional::<User>(request).await?;
        Ok(Outcome::ProfileUpdated(user))
    }

    async fn handle_change_password(
        &self,
        old_password: &Secret,
        new_password: &Secret,
        credential: Option<&Credential>,
    ) -> Result<Outcome, ApiError> {
        let credential = credential.ok_or_else(|| ApiError::new(MISSING_TOKEN))?;
        let request = ApiRequest::post("User/ChangePassword", CHANGE_PASSWORD_FAILED)
            .json(json!({
                "oldPassword": old_password.expose(),
                "newPassword": new_password.expose(),
            }))
            .auth(Auth::Bearer(credential.token.clone()));

        let ack = self.client.call_optional::<Acknowledgement>(request).await?;
        Ok(Outcome::PasswordChanged {
            message: acknowledgement_message(ack, PASSWORD_CHANGED),
        })
    }
}

fn bearer(credential: Option<&Credential>) -> Auth {
    credential.map_or(Auth::None, |c| Auth::Bearer(c.token.clone()))
}

fn acknowledgement_message(ack: Option<Acknowledgement>, fallback: &str) -> String {
    ack.and_then(|ack| ack.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
