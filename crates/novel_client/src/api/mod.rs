//! Typed wrappers over the backend endpoints.
//!
//! Every call resolves to an [`ApiResponse`]; failures arrive as
//! `success: false` with a displayable message, never as `Err`.
mod auth;
mod author;
mod comments;
mod folders;
mod novels;
mod users;

pub use auth::{AuthApi, RegisterForm};
pub use author::{AuthorApi, ChapterDraft, NovelDraft};
pub use comments::CommentsApi;
pub use folders::FoldersApi;
pub use novels::{novel_records, NovelListQuery, NovelsApi};
pub use users::{ProfileUpdate, UsersApi};

use novel_core::ApiResponse;
use novel_logging::novel_warn;
use reqwest::Method;
use serde::Serialize;

use crate::{ApiClient, RequestOptions};

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn novels(&self) -> NovelsApi<'_> {
        NovelsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn author(&self) -> AuthorApi<'_> {
        AuthorApi::new(self)
    }

    pub fn comments(&self) -> CommentsApi<'_> {
        CommentsApi::new(self)
    }

    pub fn folders(&self) -> FoldersApi<'_> {
        FoldersApi::new(self)
    }

    pub(crate) async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> ApiResponse {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.call(method, path, Some(&value), &RequestOptions::default())
                    .await
            }
            Err(err) => {
                novel_warn!("Could not encode body for {}: {}", path, err);
                ApiResponse::failure(err.to_string())
            }
        }
    }
}

/// Percent-encodes a caller-supplied id for use as one path segment.
pub(crate) fn segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
