//! Per-request allow-list enforcement.

use std::collections::HashSet;

use axum::body::Body;
use axum::http::Request;

use crate::routing::matcher::{Matcher, MethodMatcher, PathMatcher};

/// Which allow-list rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Path,
    Method,
}

/// Admits requests whose path and method are both allow-listed.
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    paths: PathMatcher,
    methods: MethodMatcher,
}

impl Gatekeeper {
    pub fn new(allowed_paths: HashSet<String>, allowed_methods: HashSet<String>) -> Self {
        Self {
            paths: PathMatcher::new(allowed_paths),
            methods: MethodMatcher::new(allowed_methods),
        }
    }

    /// Check a request. The path is checked before the method.
    pub fn admit(&self, req: &Request<Body>) -> Result<(), Denial> {
        if !self.paths.matches(req) {
            tracing::warn!(method = %req.method(), path = %req.uri().path(), "Path not allowed");
            return Err(Denial::Path);
        }

        if !self.methods.matches(req) {
            tracing::warn!(method = %req.method(), path = %req.uri().path(), "Method not allowed");
            return Err(Denial::Method);
        }

        Ok(())
    }

    /// Returns true if at least one allow-list is empty, so nothing is admitted.
    pub fn denies_everything(&self) -> bool {
        self.paths.is_empty() || self.methods.is_empty()
    }
}
