use axum::{
    http::{header::CONTENT_TYPE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    storage::types::{
        graph_metadata::Envelope, linked_data::LinkedDataGraph, node_link::NodeLinkGraph,
    },
    utils::graph_templates::GraphTemplates,
};
use graph_query::ExerciseGraph;
use serde::Deserialize;

pub const LINKED_DATA_CONTENT_TYPE: &str = "application/ld+json";
pub const NODE_LINK_CONTENT_TYPE: &str = "application/json";

/// Graph representation selected with `?format=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphFormat {
    Json,
    #[default]
    JsonLd,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: GraphFormat,
}

/// A graph result in the representation the caller asked for.
pub enum GraphResponse {
    LinkedData(LinkedDataGraph),
    NodeLink(Envelope<NodeLinkGraph>),
}

impl GraphResponse {
    /// Stamps metadata generated now; stored metadata is never echoed back.
    pub fn linked_data(mut graph: LinkedDataGraph, templates: &GraphTemplates) -> Self {
        graph.metadata = templates.fresh_metadata();
        Self::LinkedData(graph)
    }

    pub fn node_link(graph: NodeLinkGraph, templates: &GraphTemplates) -> Self {
        Self::NodeLink(Envelope::new(templates.fresh_metadata(), graph))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::LinkedData(graph) => graph.is_empty(),
            Self::NodeLink(envelope) => envelope.body.is_empty(),
        }
    }
}

impl IntoResponse for GraphResponse {
    fn into_response(self) -> Response {
        match self {
            Self::LinkedData(graph) => (
                [(CONTENT_TYPE, HeaderValue::from_static(LINKED_DATA_CONTENT_TYPE))],
                Json(graph),
            )
                .into_response(),
            Self::NodeLink(envelope) => (
                [(CONTENT_TYPE, HeaderValue::from_static(NODE_LINK_CONTENT_TYPE))],
                Json(envelope),
            )
                .into_response(),
        }
    }
}
