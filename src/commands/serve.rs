use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::controllers::paste;
use crate::types::api::CreateResponse;
use crate::App;

/// The manual for the program in man page form, served at the root.
const MAN_PAGE: &str = include_str!("../../assets/man.txt");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));
    info!("listening on {addr}");

    let app = router(app);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create", post(create_paste))
        .route("/get/:key", get(get_paste))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(app.config.limits.max_upload_size))
        .layer(TraceLayer::new_for_http())
        .route_layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(app)
}

async fn index() -> &'static str {
    MAN_PAGE
}

async fn create_paste(
    State(app): State<App>,
    headers: HeaderMap,
    body: Bytes,
) -> crate::AppResult<Json<CreateResponse>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let paste = paste::create(&app, content_type, body).await?;

    Ok(Json(CreateResponse {
        status: "success",
        key: paste.id,
    }))
}

async fn get_paste(
    State(app): State<App>,
    Path(key): Path<String>,
) -> crate::AppResult<impl IntoResponse> {
    let paste = paste::fetch(&app, &key).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        paste.content,
    ))
}
