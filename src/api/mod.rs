//! Remote API access.
//!
//! - [`client`]: `reqwest`-backed client wrapper
//! - [`request`]: request descriptions, multipart bodies and auth schemes
//! - [`envelope`]: response envelopes
//! - [`error`]: normalized error

pub mod client;
pub mod envelope;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use envelope::{Acknowledgement, Envelope, Page};
pub use error::ApiError;
pub use request::{ApiRequest, Auth, ImageUpload, MultipartBody};
