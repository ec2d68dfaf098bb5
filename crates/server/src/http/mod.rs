use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{DeploymentImpl, routes};

pub mod auth;

pub fn router(deployment: DeploymentImpl) -> Router {
    let api_routes = Router::new()
        .merge(routes::workspaces::router(&deployment))
        .merge(routes::projects::router(&deployment))
        .merge(routes::tasks::router(&deployment))
        .merge(routes::ai::router())
        .layer(from_fn_with_state(
            deployment.clone(),
            auth::require_api_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(deployment)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use deployment::Deployment;
    use serde_json::{Value, json};
    use services::services::config::ApiToken;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{DeploymentImpl, test_support::TestEnvGuard};

    const TOKEN: &str = "sekrit";

    async fn setup_app() -> (TestEnvGuard, Router) {
        let temp_root = std::env::temp_dir().join(format!("taskdeck-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&temp_root).unwrap();

        let db_path = temp_root.join("db.sqlite");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());
        let env_guard = TestEnvGuard::new(&temp_root, db_url);

        let deployment = DeploymentImpl::new().await.unwrap();
        {
            let mut config = deployment.config().write().await;
            config.access_control.tokens.push(ApiToken {
                token: TOKEN.to_string(),
                user_id: "user-1".to_string(),
            });
        }

        (env_guard, super::router(deployment))
    }

    async fn send(
        app: &Router,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_env_guard, app) = setup_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn api_rejects_missing_and_unknown_tokens() {
        let (_env_guard, app) = setup_app().await;

        let (status, body) = send(&app, Method::GET, "/api/workspaces", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, Method::GET, "/api/workspaces", Some("wrong"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn workspace_creation_validates_and_attributes_owner() {
        let (_env_guard, app) = setup_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/workspaces",
            Some(TOKEN),
            Some(json!({"name": "Acme", "slug": "acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["owner_id"], "user-1");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/workspaces",
            Some(TOKEN),
            Some(json!({"name": "", "slug": "blank"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/api/workspaces", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_ids_yield_not_found() {
        let (_env_guard, app) = setup_app().await;

        let missing = Uuid::new_v4();
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/workspaces/{missing}"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{missing}/board"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/tasks/{missing}"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn board_flow_from_workspace_to_task() {
        let (_env_guard, app) = setup_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/workspaces",
            Some(TOKEN),
            Some(json!({"name": "Acme", "slug": "acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let workspace_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/workspaces/{workspace_id}/projects"),
            Some(TOKEN),
            Some(json!({"name": "Redesign", "key": "RD"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let project_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{project_id}/board"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let columns = body["data"]["columns"].as_array().unwrap();
        let names: Vec<&str> = columns
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Todo", "In Progress", "Done"]);
        let todo_id = columns[0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/projects/{project_id}/tasks"),
            Some(TOKEN),
            Some(json!({"title": "Do X", "priority": "high", "column_id": todo_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["reporter_id"], "user-1");
        let task_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{project_id}/board"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let todo_tasks = body["data"]["columns"][0]["tasks"].as_array().unwrap();
        assert_eq!(todo_tasks.len(), 1);
        assert_eq!(todo_tasks[0]["id"], task_id.as_str());
        assert_eq!(todo_tasks[0]["title"], "Do X");
        assert_eq!(todo_tasks[0]["priority"], "high");

        // Move it to Done and check it left Todo.
        let done_id = body["data"]["columns"][2]["id"].as_str().unwrap();
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/tasks/{task_id}/move"),
            Some(TOKEN),
            Some(json!({"column_id": done_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["column_id"], done_id);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/tasks/{task_id}"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/tasks/{task_id}"),
            Some(TOKEN),
            Some(json!({"title": "gone"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn column_reorder_applies_through_the_api() {
        let (_env_guard, app) = setup_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/workspaces",
            Some(TOKEN),
            Some(json!({"name": "Acme", "slug": "acme"})),
        )
        .await;
        let workspace_id = body["data"]["id"].as_str().unwrap().to_string();
        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/workspaces/{workspace_id}/projects"),
            Some(TOKEN),
            Some(json!({"name": "Redesign", "key": "RD"})),
        )
        .await;
        let project_id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{project_id}/board"),
            Some(TOKEN),
            None,
        )
        .await;
        let mut ids: Vec<String> = body["data"]["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect();
        ids.rotate_left(1);

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/projects/{project_id}/columns/order"),
            Some(TOKEN),
            Some(json!({"column_ids": ids})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{project_id}/board"),
            Some(TOKEN),
            None,
        )
        .await;
        let names: Vec<&str> = body["data"]["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["In Progress", "Done", "Todo"]);
    }

    #[tokio::test]
    async fn velocity_returns_a_flat_week() {
        let (_env_guard, app) = setup_app().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/workspaces",
            Some(TOKEN),
            Some(json!({"name": "Acme", "slug": "acme"})),
        )
        .await;
        let workspace_id = body["data"]["id"].as_str().unwrap().to_string();
        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/workspaces/{workspace_id}/projects"),
            Some(TOKEN),
            Some(json!({"name": "Redesign", "key": "RD"})),
        )
        .await;
        let project_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/projects/{project_id}/analytics/velocity"),
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let points = body["data"].as_array().unwrap();
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p["completed"] == 0));
    }

    #[tokio::test]
    async fn ai_without_api_key_is_a_server_error() {
        let (_env_guard, app) = setup_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/subtasks",
            Some(TOKEN),
            Some(json!({"task_description": "Build the thing"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("API key"));
    }
}
