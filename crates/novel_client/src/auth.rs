//! Which endpoints get a bearer token, and which are exempt from token refresh.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Segment marking the author namespace. Paths containing it always carry
    /// the token, even when they also look like public reads.
    pub author_segment: String,
    /// Endpoints where a 401 means bad credentials, not an expired token.
    pub auth_flow_paths: Vec<String>,
    pub refresh_path: String,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            author_segment: "author".to_string(),
            auth_flow_paths: vec![
                "/auth/login".to_string(),
                "/auth/register".to_string(),
                "/auth/verify-email".to_string(),
                "/auth/refresh-token".to_string(),
            ],
            refresh_path: "/auth/refresh-token".to_string(),
        }
    }
}

impl AuthPolicy {
    /// Assuming a token is stored: should it be sent to `path`?
    pub fn should_attach_bearer(&self, path: &str) -> bool {
        self.is_author_path(path) || !is_public_read(path)
    }

    pub fn is_author_path(&self, path: &str) -> bool {
        segments(path).any(|s| s == self.author_segment)
    }

    pub fn is_auth_flow(&self, path: &str) -> bool {
        let path = strip_query(path).trim_end_matches('/');
        self.auth_flow_paths
            .iter()
            .any(|flow| path.ends_with(flow.trim_end_matches('/')))
    }
}

/// Novel detail (`…/novels/{id}`) and chapter content
/// (`…/novels/{id}/chapters/{chapter}` or `…/chapters/{chapter}`).
pub fn is_public_read(path: &str) -> bool {
    let segs: Vec<&str> = segments(path).collect();
    match segs.as_slice() {
        [.., "novels", id] => is_resource_id(id),
        [.., "novels", id, "chapters", chapter] => is_resource_id(id) && is_resource_id(chapter),
        [.., "chapters", chapter] => is_resource_id(chapter),
        _ => false,
    }
}

// Numeric ids and hex object ids both contain a digit; named routes such as
// `popular` or `search` do not.
fn is_resource_id(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    strip_query(path).split('/').filter(|s| !s.is_empty())
}
