//! Fresh resource URIs: the configured namespace followed by a random v4 UUID.
//!
//! There is no collision check against existing statements and no shared
//! counter; uniqueness rests on the UUID alone.

use uuid::Uuid;

/// Mints URIs under a fixed namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriGenerator {
    namespace: String,
}

impl UriGenerator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `namespace + uuid`, e.g. `http://example.org/6f1c…`.
    pub fn generate(&self) -> String {
        format!("{}{}", self.namespace, Uuid::new_v4())
    }
}
