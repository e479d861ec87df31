//! Per-request decision input

/// The request-scoped data the engine evaluates
///
/// The adapter builds one per request; the engine adds nothing to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// HTTP method, e.g. `GET`
    pub method: String,
    /// Request path, e.g. `/api/users`
    pub path: String,
}

impl RequestContext {
    /// Build a context from method and path
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_builds_context() {
        let ctx = RequestContext::new("GET", "/api/users");
        assert_eq!(ctx.method, "GET");
        assert_eq!(ctx.path, "/api/users");
    }
}
