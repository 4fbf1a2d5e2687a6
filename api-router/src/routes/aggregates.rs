use std::collections::BTreeMap;

use axum::{extract::State, Json};
use common::storage::types::graph_metadata::Envelope;
use graph_query::{tag_count, tag_list, TagField};
use serde::Serialize;

use crate::api_state::ApiState;

#[derive(Serialize)]
pub struct Authors<T> {
    authors: T,
}

#[derive(Serialize)]
pub struct Keywords<T> {
    keywords: T,
}

type Counts = BTreeMap<String, usize>;

/// Author names keep their spelling; keywords are folded to lowercase.
const AUTHORS_CASE_SENSITIVE: bool = true;
const KEYWORDS_CASE_SENSITIVE: bool = false;

pub async fn author_count(State(state): State<ApiState>) -> Json<Envelope<Authors<Counts>>> {
    let snapshot = state.graph_store.snapshot().await;
    let authors = tag_count(
        &snapshot.linked_data,
        TagField::Author,
        AUTHORS_CASE_SENSITIVE,
    );

    Json(Envelope::new(state.templates.fresh_metadata(), Authors { authors }))
}

pub async fn author_list(State(state): State<ApiState>) -> Json<Envelope<Authors<Vec<String>>>> {
    let snapshot = state.graph_store.snapshot().await;
    let authors = tag_list(
        &snapshot.linked_data,
        TagField::Author,
        AUTHORS_CASE_SENSITIVE,
    );

    Json(Envelope::new(state.templates.fresh_metadata(), Authors { authors }))
}

pub async fn keyword_count(State(state): State<ApiState>) -> Json<Envelope<Keywords<Counts>>> {
    let snapshot = state.graph_store.snapshot().await;
    let keywords = tag_count(
        &snapshot.linked_data,
        TagField::Keywords,
        KEYWORDS_CASE_SENSITIVE,
    );

    Json(Envelope::new(state.templates.fresh_metadata(), Keywords { keywords }))
}

pub async fn keyword_list(State(state): State<ApiState>) -> Json<Envelope<Keywords<Vec<String>>>> {
    let snapshot = state.graph_store.snapshot().await;
    let keywords = tag_list(
        &snapshot.linked_data,
        TagField::Keywords,
        KEYWORDS_CASE_SENSITIVE,
    );

    Json(Envelope::new(state.templates.fresh_metadata(), Keywords { keywords }))
}
