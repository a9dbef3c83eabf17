//! Request descriptions handed to [`super::ApiClient`].
//!
//! An [`ApiRequest`] is a plain value: method, path segments relative to the
//! base URL, query, body and auth. Multipart bodies are kept as owned parts and
//! only turned into a `reqwest` form when the request is sent.

use reqwest::Method;

/// An image picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guesses the MIME type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = match file_name
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Self {
            file_name,
            mime: mime.to_string(),
            bytes,
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(ImageUpload),
}

/// Ordered multipart fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, FormValue)>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), FormValue::Text(value.into())));
        self
    }

    /// Appends a file part when one was picked.
    #[must_use]
    pub fn file(mut self, name: &str, upload: Option<&ImageUpload>) -> Self {
        if let Some(upload) = upload {
            self.fields.push((name.to_string(), FormValue::File(upload.clone())));
        }
        self
    }

    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(field, value)| match value {
            FormValue::Text(text) if field == name => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// How the cached credential is presented to the backend.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// Raw `token: <token>` header, used by the post listing.
    TokenHeader(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::TokenHeader(_) => f.write_str("TokenHeader(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub auth: Auth,
    /// Message used when the failure carries no usable `message`.
    pub fallback: &'static str,
}

impl ApiRequest {
    /// Starts a request to `path`, given relative to the base URL (`"post/42"`).
    #[must_use]
    pub fn new(method: Method, path: &str, fallback: &'static str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: Auth::None,
            fallback,
        }
    }

    #[must_use]
    pub fn get(path: &str, fallback: &'static str) -> Self {
        Self::new(Method::GET, path, fallback)
    }

    #[must_use]
    pub fn post(path: &str, fallback: &'static str) -> Self {
        Self::new(Method::POST, path, fallback)
    }

    #[must_use]
    pub fn put(path: &str, fallback: &'static str) -> Self {
        Self::new(Method::PUT, path, fallback)
    }

    #[must_use]
    pub fn delete(path: &str, fallback: &'static str) -> Self {
        Self::new(Method::DELETE, path, fallback)
    }

    /// Appends one path segment; the client percent-encodes it.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn multipart(mut self, form: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Path relative to the base URL, for logging.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_segments_from_path_and_ids() {
        let request = ApiRequest::delete("Comments", "Failed to delete comment")
            .segment("42")
            .segment("7");
        assert_eq!(request.path(), "/Comments/42/7");
    }

    #[test]
    fn file_part_only_when_picked() {
        let form = MultipartBody::new()
            .text("Content", "hello")
            .file("Image", None);
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.text_value("Content"), Some("hello"));
    }

    #[test]
    fn mime_guessed_from_extension() {
        assert_eq!(ImageUpload::new("cat.JPG", vec![]).mime, "image/jpeg");
        assert_eq!(ImageUpload::new("blob", vec![]).mime, "application/octet-stream");
    }
}
