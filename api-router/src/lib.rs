use api_state::ApiState;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use routes::{
    aggregates::{author_count, author_list, keyword_count, keyword_list},
    exercises::{
        end_nodes, exercise, exercises_by_author, exercises_by_keyword, exercises_by_topic,
        path_to_exercise, start_nodes, whole_graph,
    },
    liveness::live,
    refresh::refresh_database,
    root::greeting,
    statistics::statistics,
};

pub mod api_state;
pub mod error;
mod format;
mod routes;

/// Router for the exercise graph API
pub fn exercise_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Health
    let public = Router::new()
        .route("/", get(greeting))
        .route("/live", get(live));

    let queries = Router::new()
        .route("/getAuthorCount", get(author_count))
        .route("/getAuthorList", get(author_list))
        .route("/getKeywordCount", get(keyword_count))
        .route("/getKeywordList", get(keyword_list))
        .route("/getExercise/{id}", get(exercise))
        .route("/getExercisesByAuthor/{name}", get(exercises_by_author))
        .route("/getExercisesByKeyword/{keyword}", get(exercises_by_keyword))
        .route("/getExercisesByTopic/{topic}", get(exercises_by_topic))
        .route("/getPathToExercise/{id}", get(path_to_exercise))
        .route("/getStartNodes", get(start_nodes))
        .route("/getEndNodes", get(end_nodes))
        .route("/getStatistics", get(statistics))
        .route("/getWholeGraph", get(whole_graph));

    let refresh = Router::new().route("/refreshDatabase", post(refresh_database));

    public.merge(queries).merge(refresh)
}

#[cfg(test)]
mod test_support;
