use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html("This server is for handling callback request from Spotify authentication.")
}
