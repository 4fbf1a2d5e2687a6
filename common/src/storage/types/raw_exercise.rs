use serde::{Deserialize, Serialize};

/// A value that may be written either as a single scalar or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// One prerequisite entry as written in a repository's metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDependency {
    Id(String),
    Alternatives(Vec<String>),
    OneOf {
        #[serde(rename = "oneOf", alias = "one_of")]
        one_of: Vec<String>,
    },
}

/// Exercise metadata embedded in a repository's README, stored verbatim per revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExerciseMetadata {
    #[serde(default, alias = "uuid", alias = "@id")]
    pub id: Option<String>,
    #[serde(default)]
    pub teaches: Option<OneOrMany<String>>,
    #[serde(default, alias = "dependsOn")]
    pub depends_on: Option<Vec<RawDependency>>,
    #[serde(default)]
    pub author: Option<OneOrMany<String>>,
    #[serde(default, alias = "publishedAt")]
    pub first_used: Option<String>,
    #[serde(default)]
    pub keywords: Option<OneOrMany<String>>,
}

impl RawExerciseMetadata {
    /// Records without an explicit identifier are named after their repository.
    #[must_use]
    pub fn with_fallback_id(mut self, repository: &str) -> Self {
        if self.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            self.id = Some(repository.to_string());
        }
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
