use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
};
use graph_query::{ExerciseGraph, MatchMode, TagField};
use serde::Deserialize;

use crate::{
    api_state::ApiState,
    error::ApiError,
    format::{FormatQuery, GraphFormat, GraphResponse},
};

/// Tag searches fold case on both sides.
const SEARCH_CASE_SENSITIVE: bool = false;

#[derive(Debug, Deserialize)]
pub struct TagSearchQuery {
    #[serde(default)]
    format: GraphFormat,
    #[serde(default, rename = "match")]
    match_mode: MatchMode,
}

/// A lookup that can miss, evaluated on whichever representation was asked for.
enum Lookup<'a> {
    Exercise(&'a str),
    PathTo(&'a str),
}

impl Lookup<'_> {
    fn run<G: ExerciseGraph>(&self, graph: &G) -> Option<G> {
        match *self {
            Self::Exercise(id) => graph_query::find_exercise(graph, id),
            Self::PathTo(id) => graph_query::dependency_path(graph, id),
        }
    }
}

/// A view that always yields a graph, possibly an empty one.
enum View<'a> {
    Tagged {
        field: TagField,
        term: &'a str,
        mode: MatchMode,
    },
    StartNodes,
    EndNodes,
    Whole,
}

impl View<'_> {
    fn run<G: ExerciseGraph + Clone>(&self, graph: &G) -> G {
        match *self {
            Self::Tagged { field, term, mode } => {
                graph_query::search_by_tag(graph, field, term, mode, SEARCH_CASE_SENSITIVE)
            }
            Self::StartNodes => graph_query::start_nodes(graph),
            Self::EndNodes => graph_query::end_nodes(graph),
            Self::Whole => graph.clone(),
        }
    }
}

async fn lookup(
    state: &ApiState,
    format: GraphFormat,
    wanted: Lookup<'_>,
) -> Option<GraphResponse> {
    let snapshot = state.graph_store.snapshot().await;
    match format {
        GraphFormat::JsonLd => wanted
            .run(&snapshot.linked_data)
            .map(|graph| GraphResponse::linked_data(graph, &state.templates)),
        GraphFormat::Json => wanted
            .run(&snapshot.node_link)
            .map(|graph| GraphResponse::node_link(graph, &state.templates)),
    }
}

async fn view(state: &ApiState, format: GraphFormat, wanted: View<'_>) -> GraphResponse {
    let snapshot = state.graph_store.snapshot().await;
    match format {
        GraphFormat::JsonLd => {
            GraphResponse::linked_data(wanted.run(&snapshot.linked_data), &state.templates)
        }
        GraphFormat::Json => {
            GraphResponse::node_link(wanted.run(&snapshot.node_link), &state.templates)
        }
    }
}

/// Tag search answered with 404 when nothing matches.
async fn tagged(
    state: &ApiState,
    field: TagField,
    term: &str,
    mode: MatchMode,
    format: GraphFormat,
) -> Result<GraphResponse, ApiError> {
    let response = view(state, format, View::Tagged { field, term, mode }).await;
    if response.is_empty() {
        return Err(ApiError::no_exercises_tagged(field, term));
    }
    Ok(response)
}

pub async fn exercise(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    lookup(&state, query.format, Lookup::Exercise(&id))
        .await
        .ok_or_else(|| ApiError::no_exercises("uuid", &id))
}

pub async fn exercises_by_author(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    query: Result<Query<TagSearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    tagged(&state, TagField::Author, &name, query.match_mode, query.format).await
}

pub async fn exercises_by_keyword(
    State(state): State<ApiState>,
    Path(keyword): Path<String>,
    query: Result<Query<TagSearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    tagged(
        &state,
        TagField::Keywords,
        &keyword,
        query.match_mode,
        query.format,
    )
    .await
}

/// Topics always match partially against `teaches`.
pub async fn exercises_by_topic(
    State(state): State<ApiState>,
    Path(topic): Path<String>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    tagged(
        &state,
        TagField::Teaches,
        &topic,
        MatchMode::Partial,
        query.format,
    )
    .await
}

pub async fn path_to_exercise(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    lookup(&state, query.format, Lookup::PathTo(&id))
        .await
        .ok_or_else(|| ApiError::no_exercises("uuid", &id))
}

pub async fn start_nodes(
    State(state): State<ApiState>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    Ok(view(&state, query.format, View::StartNodes).await)
}

pub async fn end_nodes(
    State(state): State<ApiState>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    Ok(view(&state, query.format, View::EndNodes).await)
}

/// The current snapshot with metadata regenerated for this response.
pub async fn whole_graph(
    State(state): State<ApiState>,
    query: Result<Query<FormatQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    Ok(view(&state, query.format, View::Whole).await)
}
