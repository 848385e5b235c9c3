use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use crate::{
    spotify::Authenticator,
    sync::{CallbackHandler, CallbackOutcome},
};

pub async fn callback<A: Authenticator>(
    Query(params): Query<HashMap<String, String>>,
    State(handler): State<Arc<CallbackHandler<A>>>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = handler
        .handle(
            params.get("code").map(String::as_str),
            params.get("state").map(String::as_str),
        )
        .await;

    match outcome {
        CallbackOutcome::Completed => (
            StatusCode::OK,
            Html("<h2>login process completed.</h2><p>Close browser window.</p>"),
        ),
        CallbackOutcome::ExchangeFailed => (
            StatusCode::FORBIDDEN,
            Html("<h4>Couldn't get token from Spotify.</h4>"),
        ),
        CallbackOutcome::StateMismatch => (StatusCode::NOT_FOUND, Html("<h4>Not found.</h4>")),
        CallbackOutcome::AlreadyCompleted => (
            StatusCode::CONFLICT,
            Html("<h4>Login was already completed.</h4>"),
        ),
    }
}
