//! `cancapp` command-line front end.
//!
//! A thin shell over the library: each command maps to page events or
//! operations, which run through [`handle_event`] and the [`Store`] exactly as
//! a graphical front end would drive them. Actions coming back from the
//! handler are executed here: follow-up dispatches are queued, navigation is
//! printed, and alerts go to stderr and fail the command.
//!
//! ```text
//! clap command ──→ Work queue ──→ Store::dispatch ──→ Event::Settled
//!                     ↑                                    │
//!                     └──────── handle_event → actions ←───┘
//! ```
//!
//! Protected commands pass the route guard first; without a cached credential
//! they print the redirect to `/login` and exit non-zero.

#![allow(clippy::multiple_crate_versions)]

use cancapp::api::ImageUpload;
use cancapp::app::{GuardDecision, ViewState};
use cancapp::domain::{CommentId, PostId, Secret};
use cancapp::ui::{self, FeedViewModel, ProfileViewModel};
use cancapp::worker::{LoginForm, Operation, PostDraft, ProfileForm, RegisterForm};
use cancapp::{handle_event, Action, Config, DispatchError, Event, Route, RouteGuard, Store};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Instrument;

#[derive(Debug, Parser)]
#[command(name = "cancapp", version, about = "CancApp feed client")]
struct Cli {
    /// Config file (default: <data dir>/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API root, e.g. https://cancapp.runasp.net/api
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory for the session cache and trace file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "cancapp=trace".
    #[arg(long, global = true)]
    trace_level: Option<String>,

    /// Also export spans as OTLP JSON into the data directory.
    #[arg(long, global = true)]
    trace_file: bool,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and cache the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the cached session.
    Logout,
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "Patient")]
        user_type: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Confirm an email address with the emailed code.
    ConfirmEmail {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Send the confirmation code again.
    ResendEmail {
        #[arg(long)]
        email: String,
    },
    /// Show the feed.
    Feed {
        /// Show the full text of these posts.
        #[arg(long)]
        expand: Vec<String>,
        /// Show the comments of these posts.
        #[arg(long)]
        comments: Vec<String>,
    },
    /// Create, edit or delete posts.
    Post {
        #[command(subcommand)]
        action: PostCommand,
    },
    /// List, add, edit or delete comments.
    Comment {
        #[command(subcommand)]
        action: CommentCommand,
    },
    /// Show the user directory.
    Users {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Update your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
    /// Register the session token with the backend.
    SaveToken,
    /// Show the cached session.
    Whoami,
}

#[derive(Debug, Subcommand)]
enum PostCommand {
    Create {
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Edit {
        id: String,
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum CommentCommand {
    List {
        post_id: String,
    },
    Add {
        post_id: String,
        content: String,
    },
    Edit {
        post_id: String,
        comment_id: String,
        content: String,
    },
    Delete {
        post_id: String,
        comment_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

impl Command {
    const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Register { .. } => "register",
            Self::ConfirmEmail { .. } => "confirm-email",
            Self::ResendEmail { .. } => "resend-email",
            Self::Feed { .. } => "feed",
            Self::Post { .. } => "post",
            Self::Comment { .. } => "comment",
            Self::Users { .. } => "users",
            Self::Profile { .. } => "profile",
            Self::ChangePassword { .. } => "change-password",
            Self::SaveToken => "save-token",
            Self::Whoami => "whoami",
        }
    }

    /// Page the command belongs to; `None` for commands outside any page.
    const fn route(&self) -> Option<Route> {
        match self {
            Self::Login { .. } => Some(Route::Login),
            Self::Logout => None,
            Self::Register { .. } => Some(Route::Register),
            Self::ConfirmEmail { .. } => Some(Route::ConfirmEmail),
            Self::ResendEmail { .. } => Some(Route::ResendEmail),
            Self::ChangePassword { .. } => Some(Route::ChangePassword),
            Self::Post {
                action: PostCommand::Create { .. },
            } => Some(Route::CreatePost),
            Self::Feed { .. } | Self::Post { .. } | Self::Comment { .. } => Some(Route::Home),
            Self::Users { .. } | Self::Profile { .. } | Self::SaveToken | Self::Whoami => {
                Some(Route::Profile)
            }
        }
    }
}

/// One unit of work for the shell loop.
enum Work {
    Event(Event),
    Dispatch(Operation),
}

struct Shell {
    store: Store,
    view: ViewState,
    guard: RouteGuard,
    failed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cancapp::observability::init_tracing(&config);

    let store = match cancapp::initialize(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "initialization failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut changes = store.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            tracing::trace!(busy = changes.borrow().is_busy(), "state changed");
        }
    });

    let span = tracing::debug_span!("command", name = cli.command.name());
    let mut shell = Shell {
        store,
        view: ViewState::new(),
        guard: RouteGuard::new(),
        failed: false,
    };
    shell.run(cli.command).instrument(span).await
}

fn load_config(cli: &Cli) -> cancapp::Result<Config> {
    let mut config = Config::load(cli.config.as_deref(), cli.data_dir.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(level) = &cli.trace_level {
        config.trace_level = Some(level.clone());
    }
    if cli.trace_file {
        config.trace_file = true;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = Some(secs);
    }
    Ok(config)
}

fn read_image(path: Option<&Path>) -> cancapp::Result<Option<ImageUpload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(Some(ImageUpload::new(file_name, bytes)))
}

impl Shell {
    async fn run(&mut self, command: Command) -> ExitCode {
        if let Some(route) = command.route() {
            if !self.admit(route) {
                return ExitCode::FAILURE;
            }
        }

        if let Err(e) = self.execute(command).await {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }

        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Runs the route guard for `route`; public routes always pass.
    fn admit(&mut self, route: Route) -> bool {
        let layout = cancapp::app::resolve_layout(route.path());
        if !layout.guarded {
            return true;
        }
        match self.guard.mount(self.store.is_authenticated()) {
            GuardDecision::Render => true,
            GuardDecision::Redirect(to) => {
                eprintln!("not signed in; redirecting to {to}");
                false
            }
            GuardDecision::Hold => false,
        }
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&mut self, command: Command) -> cancapp::Result<()> {
        match command {
            Command::Login { email, password } => {
                self.drive(Work::Dispatch(Operation::LoginUser(LoginForm {
                    email,
                    password: Secret::new(password),
                })))
                .await;
                if let Some(user) = self.store.snapshot().login.user {
                    println!("Logged in as {}", user.name);
                }
            }
            Command::Logout => {
                self.store.logout()?;
                if let Some(GuardDecision::Redirect(to)) = self.guard.credential_changed(false) {
                    println!("-> {to}");
                }
                println!("Logged out");
            }
            Command::Register {
                email,
                password,
                full_name,
                address,
                user_type,
                image,
            } => {
                let image = read_image(image.as_deref())?;
                self.drive(Work::Dispatch(Operation::RegisterUser(RegisterForm {
                    email,
                    password: Secret::new(password),
                    full_name,
                    address,
                    user_type,
                    image,
                })))
                .await;
            }
            Command::ConfirmEmail { email, otp } => {
                self.drive(Work::Dispatch(Operation::ConfirmEmail { email, otp }))
                    .await;
            }
            Command::ResendEmail { email } => {
                self.drive(Work::Dispatch(Operation::ResendConfirmEmail { email }))
                    .await;
                if self.store.snapshot().auth.email_resent {
                    println!("Confirmation email sent");
                }
            }
            Command::Feed { expand, comments } => {
                self.drive(Work::Dispatch(Operation::FetchPosts)).await;
                for id in expand {
                    self.drive(Work::Event(Event::ToggleExpanded(PostId::from(id))))
                        .await;
                }
                for id in comments {
                    self.drive(Work::Event(Event::ToggleComments(PostId::from(id))))
                        .await;
                }
                let vm = FeedViewModel::compute(&self.store.snapshot(), &self.view, Utc::now());
                print!("{}", ui::render_feed(&vm));
            }
            Command::Post { action } => self.post(action).await?,
            Command::Comment { action } => self.comment(action).await,
            Command::Users { filter } => {
                self.drive(Work::Dispatch(Operation::FetchUsers)).await;
                if let Some(filter) = filter {
                    self.drive(Work::Event(Event::FilterUsers(filter))).await;
                }
                let own = self.store.credential().map(|c| c.user_id);
                let vm = ProfileViewModel::compute(&self.store.snapshot(), &self.view, own.as_ref());
                print!("{}", ui::render_profile(&vm));
            }
            Command::Profile {
                action: ProfileCommand::Update {
                    name,
                    address,
                    image,
                },
            } => {
                let image = read_image(image.as_deref())?;
                self.drive(Work::Dispatch(Operation::UpdateProfile(ProfileForm {
                    name,
                    address,
                    image,
                })))
                .await;
                if !self.failed {
                    println!("Profile updated");
                }
            }
            Command::ChangePassword {
                old_password,
                new_password,
            } => {
                self.drive(Work::Dispatch(Operation::ChangePassword {
                    old_password: Secret::new(old_password),
                    new_password: Secret::new(new_password),
                }))
                .await;
                self.print_profile_message();
            }
            Command::SaveToken => {
                self.drive(Work::Dispatch(Operation::SaveToken)).await;
                self.print_profile_message();
            }
            Command::Whoami => match self.store.credential() {
                Some(credential) => {
                    println!("user {} ({})", credential.user_id, credential.user_type);
                }
                None => println!("not signed in"),
            },
        }
        Ok(())
    }

    async fn post(&mut self, action: PostCommand) -> cancapp::Result<()> {
        match action {
            PostCommand::Create { content, image } => {
                let image = read_image(image.as_deref())?;
                self.drive(Work::Event(Event::DraftInput(content))).await;
                self.drive(Work::Event(Event::DraftImage(image))).await;
                self.drive(Work::Event(Event::SubmitDraft)).await;
                if let Some(post) = self.store.snapshot().posts.all_posts.first() {
                    if !self.failed {
                        println!("Created post {}", post.id);
                    }
                }
            }
            PostCommand::Edit { id, content, image } => {
                let image = read_image(image.as_deref())?;
                self.drive(Work::Dispatch(Operation::UpdatePost {
                    post_id: PostId::from(id),
                    draft: PostDraft { content, image },
                }))
                .await;
            }
            PostCommand::Delete { id } => {
                self.drive(Work::Event(Event::DeletePost(PostId::from(id))))
                    .await;
            }
        }
        Ok(())
    }

    async fn comment(&mut self, action: CommentCommand) {
        match action {
            CommentCommand::List { post_id } => {
                let post_id = PostId::from(post_id);
                self.drive(Work::Event(Event::ToggleComments(post_id.clone())))
                    .await;
                let rows = ui::comment_rows(&self.store.snapshot(), &self.view, &post_id, Utc::now());
                print!("{}", ui::render_comments(&rows));
            }
            CommentCommand::Add { post_id, content } => {
                let post_id = PostId::from(post_id);
                self.drive(Work::Event(Event::CommentInput {
                    post_id: post_id.clone(),
                    text: content,
                }))
                .await;
                self.drive(Work::Event(Event::SubmitComment(post_id))).await;
            }
            CommentCommand::Edit {
                post_id,
                comment_id,
                content,
            } => {
                self.drive(Work::Dispatch(Operation::EditComment {
                    post_id: PostId::from(post_id),
                    comment_id: CommentId::from(comment_id),
                    content,
                }))
                .await;
            }
            CommentCommand::Delete {
                post_id,
                comment_id,
            } => {
                self.drive(Work::Event(Event::DeleteComment {
                    post_id: PostId::from(post_id),
                    comment_id: CommentId::from(comment_id),
                }))
                .await;
            }
        }
    }

    /// Runs `first` and everything it triggers until the queue drains.
    async fn drive(&mut self, first: Work) {
        let mut queue = VecDeque::from([first]);

        while let Some(work) = queue.pop_front() {
            match work {
                Work::Dispatch(operation) => {
                    let result = self.store.dispatch(operation.clone()).await;
                    match result {
                        Ok(outcome) => queue.push_back(Work::Event(Event::Settled {
                            operation,
                            result: Ok(outcome),
                        })),
                        Err(DispatchError::Validation(e)) => {
                            eprintln!("{e}");
                            self.failed = true;
                        }
                        Err(DispatchError::Rejected(message)) => {
                            eprintln!("error: {message}");
                            self.failed = true;
                            queue.push_back(Work::Event(Event::Settled {
                                operation,
                                result: Err(message),
                            }));
                        }
                    }
                }
                Work::Event(event) => {
                    let root = self.store.snapshot();
                    let (_, actions) = handle_event(&mut self.view, &root, &event);
                    for action in actions {
                        self.execute_action(action, &mut queue);
                    }
                }
            }
        }
    }

    fn execute_action(&mut self, action: Action, queue: &mut VecDeque<Work>) {
        tracing::debug!(action = ?action, "executing action");
        match action {
            Action::Dispatch(operation) => queue.push_back(Work::Dispatch(operation)),
            Action::Navigate(route) => println!("-> {route}"),
            Action::Alert(message) => {
                eprintln!("alert: {message}");
                self.failed = true;
            }
        }
    }

    fn print_profile_message(&self) {
        if let Some(message) = self.store.snapshot().profile.message {
            println!("{message}");
        }
    }
}
