use axum::{extract::State, Json};
use common::storage::types::graph_metadata::Envelope;
use graph_query::Statistics;

use crate::api_state::ApiState;

pub async fn statistics(State(state): State<ApiState>) -> Json<Envelope<Statistics>> {
    let snapshot = state.graph_store.snapshot().await;
    let stats = graph_query::statistics(&snapshot.linked_data);

    Json(Envelope::new(state.templates.fresh_metadata(), stats))
}
