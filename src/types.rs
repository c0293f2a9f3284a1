/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Write operations the dashboard issues against the backend
/// Used by the list controller and by notification messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    /// Past-tense verb used in success notifications ("Project created successfully")
    pub fn past_tense(self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }

    /// Infinitive used in generic failure messages ("Failed to create project")
    pub fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Mutation::Create => reqwest::Method::POST,
            Mutation::Update => reqwest::Method::PUT,
            Mutation::Delete => reqwest::Method::DELETE,
        }
    }
}
