use crate::templates::{self, render_template};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Form, Router,
};
use plainwiki_core::{escape_html, Error, Title, WikiService};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::error;

type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Clone)]
pub struct AppState {
    pub wiki: Arc<WikiService>,
    pub assets_dir: PathBuf,
}

/// The wiki's route table, built once per server.
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/view/:title", get(view_page))
        .route("/edit/:title", get(edit_page).post(save_page))
        .route("/history/:title", get(page_history))
        .nest_service("/assets", assets)
        .with_state(state)
}

fn to_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        Error::InvalidTitle(_) | Error::PathSecurityViolation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (status, err.to_string())
}

fn parse_title(raw: &str) -> ApiResult<Title> {
    Title::parse(raw).map_err(to_response)
}

async fn home() -> Redirect {
    Redirect::to("/view/Home")
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn view_page(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Response> {
    let title = parse_title(&title)?;

    match state.wiki.view(title.as_str()).map_err(to_response)? {
        Some(content) => {
            let escaped_title = escape_html(title.as_str());
            let page = render_template(
                templates::VIEW,
                &[("title", escaped_title.as_str()), ("content", content.as_str())],
            );
            Ok(Html(page).into_response())
        }
        None => Ok(Redirect::to(&format!("/edit/{title}")).into_response()),
    }
}

async fn edit_page(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Html<String>> {
    let title = parse_title(&title)?;
    let page = state.wiki.edit(title.as_str()).map_err(to_response)?;

    let escaped_title = escape_html(&page.title);
    let escaped_content = escape_html(&page.content);
    Ok(Html(render_template(
        templates::EDIT,
        &[("title", escaped_title.as_str()), ("content", escaped_content.as_str())],
    )))
}

#[derive(Deserialize)]
struct EditForm {
    #[serde(default)]
    content: String,
}

async fn save_page(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Form(form): Form<EditForm>,
) -> ApiResult<Redirect> {
    let title = parse_title(&title)?;
    state
        .wiki
        .save(title.as_str(), &form.content)
        .map_err(to_response)?;

    Ok(Redirect::to(&format!("/view/{title}")))
}

async fn page_history(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Html<String>> {
    let title = parse_title(&title)?;
    if state.wiki.load(title.as_str()).map_err(to_response)?.is_none() {
        return Err(to_response(Error::PageNotFound(title.to_string())));
    }

    let history = state.wiki.history(title.as_str()).map_err(to_response)?;
    let entries: Vec<String> = history.records().map(|r| r.to_html()).collect();

    let escaped_title = escape_html(title.as_str());
    let body = entries.join("\n");
    Ok(Html(render_template(
        templates::HISTORY,
        &[("title", escaped_title.as_str()), ("history", body.as_str())],
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use plainwiki_core::WikiConfig;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn router(dir: &TempDir) -> (Router, Arc<WikiService>) {
        let config = WikiConfig::default().with_root(dir.path().to_path_buf());
        let wiki = Arc::new(WikiService::from_config(&config).unwrap());
        let state = AppState {
            wiki: Arc::clone(&wiki),
            assets_dir: config.assets_path(),
        };
        (create_router(state), wiki)
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_home_redirects() {
        let dir = TempDir::new().unwrap();
        let (app, _) = router(&dir);

        let response = get(app, "/").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/Home");
    }

    #[tokio::test]
    async fn test_missing_page_redirects_to_edit() {
        let dir = TempDir::new().unwrap();
        let (app, _) = router(&dir);

        let response = get(app, "/view/NewPage").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/edit/NewPage");
    }

    #[tokio::test]
    async fn test_view_renders_markup() {
        let dir = TempDir::new().unwrap();
        let (app, wiki) = router(&dir);
        wiki.save("Home", "# Welcome\n<b>[OtherPage]</b>").unwrap();

        let response = get(app, "/view/Home").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>Welcome</h1>"));
        assert!(body.contains("&lt;b&gt;<a href=\"/view/OtherPage\">OtherPage</a>&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn test_edit_form_escapes_content() {
        let dir = TempDir::new().unwrap();
        let (app, wiki) = router(&dir);
        wiki.save("Home", "</textarea>").unwrap();

        let body = body_text(get(app, "/edit/Home").await).await;

        assert!(body.contains("&lt;/textarea&gt;</textarea>"));
    }

    #[tokio::test]
    async fn test_post_saves_and_redirects() {
        let dir = TempDir::new().unwrap();
        let (app, wiki) = router(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/edit/Home")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("content=Hello+%5BWorld%5D%0Abye"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/Home");
        let page = wiki.load("Home").unwrap().unwrap();
        assert_eq!(page.content, "Hello [World]\nbye");
        assert_eq!(wiki.history("Home").unwrap().entries().count(), 1);
    }

    #[tokio::test]
    async fn test_history_lists_revisions() {
        let dir = TempDir::new().unwrap();
        let (app, wiki) = router(&dir);
        wiki.save("Home", "one\n").unwrap();
        wiki.save("Home", "one\ntwo\n").unwrap();

        let response = get(app, "/history/Home").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert_eq!(body.matches("class=\"entry clearfix\"").count(), 2);
        assert!(body.contains("<div class=\"add\">+ two</div>"));
    }

    #[tokio::test]
    async fn test_history_of_missing_page_is_404() {
        let dir = TempDir::new().unwrap();
        let (app, _) = router(&dir);

        let response = get(app, "/history/Nowhere").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_title_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (app, _) = router(&dir);

        let view = get(app.clone(), "/view/lowercase").await;
        let history = get(app, "/history/bad_title").await;

        assert_eq!(view.status(), StatusCode::BAD_REQUEST);
        assert_eq!(history.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assets_are_served() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets").join("wiki.css"), "body {}").unwrap();
        let (app, _) = router(&dir);

        let response = get(app, "/assets/wiki.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "body {}");
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let (app, _) = router(&dir);

        let body = body_text(get(app, "/health").await).await;

        assert_eq!(body, "{\"status\":\"ok\"}");
    }
}
