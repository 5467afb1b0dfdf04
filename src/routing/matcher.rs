//! Allow-list matching logic.
//!
//! # Responsibilities
//! - Match the request path against a set of exact paths
//! - Match the request method against a set of exact method names
//!
//! # Design Decisions
//! - Both matchers are case-sensitive
//! - Path matching ignores the query string
//! - Paths are compared as received, without percent-decoding
//! - Empty set = matches nothing

use std::collections::HashSet;

use axum::body::Body;
use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request path exactly.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    paths: HashSet<String>,
}

impl PathMatcher {
    pub fn new(paths: HashSet<String>) -> Self {
        Self { paths }
    }

    pub fn allows(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.allows(req.uri().path())
    }
}

/// Matches the request method exactly, as received.
#[derive(Debug, Clone, Default)]
pub struct MethodMatcher {
    methods: HashSet<String>,
}

impl MethodMatcher {
    pub fn new(methods: HashSet<String>) -> Self {
        Self { methods }
    }

    pub fn allows(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.allows(req.method().as_str())
    }
}
