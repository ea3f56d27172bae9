// file: src/server/router.rs
// description: http route table for the verifier web interface
// reference: https://docs.rs/axum/0.7/axum/struct.Router.html

use crate::server::handlers;
use crate::server::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

/// Slack on top of the file size limit for multipart framing and form fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/reports", post(handlers::download_report))
        .route("/reports/preview", post(handlers::preview_report))
        .route("/admin/users", post(handlers::add_user))
        .route("/admin/logs", get(handlers::upload_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, SchemaManager, UserStore};
    use crate::models::Role;
    use crate::session::SessionContext;
    use axum::body::Body;
    use axum::http::header::{
        AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE,
    };
    use axum::http::{Request, StatusCode};
    use calamine::{Reader, Xlsx};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::{TempDir, tempdir};
    use tower::ServiceExt;

    const BOUNDARY: &str = "co-verifier-test-boundary";

    struct TestApp {
        _dir: TempDir,
        state: AppState,
        faculty_token: String,
        admin_token: String,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let db = Database::at(dir.path().join("users.db")).unwrap();
            SchemaManager::new(&db).initialize().unwrap();

            let users = UserStore::new(&db);
            users.add_user("alice", "pw1", Role::Faculty).unwrap();
            users.add_user("root", "toor", Role::Admin).unwrap();

            let state = AppState::new(db, 1024 * 1024);
            let faculty_token = state
                .sessions
                .issue(SessionContext::new("alice", Role::Faculty));
            let admin_token = state.sessions.issue(SessionContext::new("root", Role::Admin));

            Self {
                _dir: dir,
                state,
                faculty_token,
                admin_token,
            }
        }

        async fn send(&self, req: Request<Body>) -> axum::response::Response {
            build_router(self.state.clone()).oneshot(req).await.unwrap()
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn form_request(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(t) = token {
            builder = builder.header(AUTHORIZATION, bearer(t));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn upload_request(uri: &str, token: Option<&str>, filename: &str, csv: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{BOUNDARY}--\r\n"
        );
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
        if let Some(t) = token {
            builder = builder.header(AUTHORIZATION, bearer(t));
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(t) = token {
            builder = builder.header(AUTHORIZATION, bearer(t));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_text(response: axum::response::Response) -> String {
        String::from_utf8(body_bytes(response).await).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn anonymous_index_renders_login() {
        let app = TestApp::new();
        let response = app.send(get_request("/", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Faculty Login"));
    }

    #[tokio::test]
    async fn login_sets_cookie_and_dashboard_follows() {
        let app = TestApp::new();
        let response = app
            .send(form_request("/login", None, "username=alice&password=pw1"))
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("co_session="));

        let session = cookie.split(';').next().unwrap().to_string();
        let req = Request::builder()
            .uri("/")
            .header(COOKIE, session)
            .body(Body::empty())
            .unwrap();
        let html = body_text(app.send(req).await).await;

        assert!(html.contains("Logged in as: alice (faculty)"));
        assert!(!html.contains("Admin Dashboard"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let app = TestApp::new();
        let before = app.state.sessions.len();
        let response = app
            .send(form_request("/login", None, "username=alice&password=nope"))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Invalid credentials"));
        assert_eq!(app.state.sessions.len(), before);
    }

    #[tokio::test]
    async fn admin_index_lists_uploads() {
        let app = TestApp::new();
        app.send(upload_request(
            "/reports/preview",
            Some(&app.faculty_token),
            "midterm.csv",
            "Question\nDefine a stack\n",
        ))
        .await;

        let html = body_text(app.send(get_request("/", Some(&app.admin_token))).await).await;
        assert!(html.contains("Admin Dashboard"));
        assert!(html.contains("<td>midterm.csv</td>"));
    }

    #[tokio::test]
    async fn report_requires_session() {
        let app = TestApp::new();
        let response = app
            .send(upload_request("/reports", None, "q.csv", "Question\nDefine x\n"))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn report_download_is_spreadsheet_and_logged() {
        let app = TestApp::new();
        let csv = "Question,Marks\nDefine a stack,2\nCompare BFS and DFS,5\n";
        let response = app
            .send(upload_request("/reports", Some(&app.faculty_token), "paper.csv", csv))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            handlers::XLSX_CONTENT_TYPE
        );
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"CO_Blooms_Report.xlsx\""
        );

        let bytes = body_bytes(response).await;
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["CO Report".to_string()]);
        let range = workbook.worksheet_range("CO Report").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.get((0, 2)).unwrap().to_string(), "Bloom's Level");
        assert_eq!(range.get((2, 2)).unwrap().to_string(), "Analyze");
        assert_eq!(range.get((2, 3)).unwrap().to_string(), "CO4");

        let logs = body_json(
            app.send(get_request("/admin/logs", Some(&app.admin_token)))
                .await,
        )
        .await;
        assert_eq!(logs.as_array().unwrap().len(), 1);
        assert_eq!(logs[0]["username"], "alice");
        assert_eq!(logs[0]["filename"], "paper.csv");
    }

    #[tokio::test]
    async fn oversized_question_still_downloads() {
        let app = TestApp::new();
        let csv = format!("Question\nDefine {}\n", "x".repeat(40_000));
        let response = app
            .send(upload_request("/reports", Some(&app.faculty_token), "long.csv", &csv))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body_bytes(response).await;
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("CO Report").unwrap();
        assert_eq!(
            range.get((1, 0)).unwrap().to_string().chars().count(),
            crate::exporter::xlsx::MAX_CELL_CHARS
        );
        assert_eq!(range.get((1, 1)).unwrap().to_string(), "Remember");
    }

    #[tokio::test]
    async fn missing_question_column_is_rejected_and_not_logged() {
        let app = TestApp::new();
        let response = app
            .send(upload_request(
                "/reports",
                Some(&app.faculty_token),
                "bad.csv",
                "Prompt\nDefine x\n",
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["message"],
            "CSV must contain a 'Question' column."
        );

        let logs = body_json(
            app.send(get_request("/admin/logs", Some(&app.admin_token)))
                .await,
        )
        .await;
        assert!(logs.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn preview_returns_table_json() {
        let app = TestApp::new();
        let response = app
            .send(upload_request(
                "/reports/preview",
                Some(&app.faculty_token),
                "quiz.csv",
                "Question\nDefine a stack\nWhat is entropy?\n",
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["headers"],
            serde_json::json!(["Question", "Bloom's Level", "Matched CO"])
        );
        assert_eq!(
            json["rows"][0],
            serde_json::json!(["Define a stack", "Remember", "CO1"])
        );
        assert_eq!(
            json["rows"][1],
            serde_json::json!(["What is entropy?", "Not Classified", "CO Not Found"])
        );
    }

    #[tokio::test]
    async fn non_csv_upload_is_rejected() {
        let app = TestApp::new();
        let response = app
            .send(upload_request(
                "/reports",
                Some(&app.faculty_token),
                "paper.xlsx",
                "Question\nDefine x\n",
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_routes_reject_faculty() {
        let app = TestApp::new();

        let response = app
            .send(get_request("/admin/logs", Some(&app.faculty_token)))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .send(form_request(
                "/admin/users",
                Some(&app.faculty_token),
                "username=mallory&password=x",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_adds_faculty_user() {
        let app = TestApp::new();

        for _ in 0..2 {
            let response = app
                .send(form_request(
                    "/admin/users",
                    Some(&app.admin_token),
                    "username=bob&password=secret",
                ))
                .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("User added."));
        }

        let response = app
            .send(form_request("/login", None, "username=bob&password=secret"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn admin_add_user_accepts_spaces_and_accents() {
        let app = TestApp::new();

        for body in ["username=dr+smith&password=pw", "username=jos%C3%A9&password=pw"] {
            let response = app
                .send(form_request("/admin/users", Some(&app.admin_token), body))
                .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("User added."));
        }

        let response = app
            .send(form_request("/login", None, "username=jos%C3%A9&password=pw"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn admin_add_user_rejection_renders_dashboard() {
        let app = TestApp::new();
        let response = app
            .send(form_request(
                "/admin/users",
                Some(&app.admin_token),
                "username=bad%09name&password=pw",
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = body_text(response).await;
        assert!(html.contains("Invalid username"));
        assert!(!html.contains("User added."));
    }

    #[tokio::test]
    async fn logout_revokes_session() {
        let app = TestApp::new();
        let req = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(AUTHORIZATION, bearer(&app.faculty_token))
            .body(Body::empty())
            .unwrap();
        let response = app.send(req).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let html = body_text(app.send(get_request("/", Some(&app.faculty_token))).await).await;
        assert!(html.contains("Faculty Login"));
    }

    #[tokio::test]
    async fn health_reports_database() {
        let app = TestApp::new();
        let response = app.send(get_request("/health", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["overall_status"], "Healthy");
        assert_eq!(json["checks"][0]["component"], "database");
    }
}
