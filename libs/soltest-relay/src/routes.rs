use axum::{routing::get, Router};

use crate::handlers::{read_question, write_question};
use crate::store::QuestionStore;

pub fn routes(store: QuestionStore) -> Router {
    Router::new()
        .route("/", get(read_question).post(write_question))
        .with_state(store)
}
