mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tasklet::models::{TaskListResponse, TaskResponse, TaskStatus};

use common::{bearer, register_user, test_app, test_keys, test_pool};

#[actix_rt::test]
async fn test_task_routes_require_token() {
    let app = test_app(test_pool().await).await;

    let requests = vec![
        test::TestRequest::get().uri("/api/tasks").to_request(),
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "title": "Unauthorized Task" }))
            .to_request(),
        test::TestRequest::put()
            .uri("/api/tasks/1")
            .set_json(json!({ "status": "completed" }))
            .to_request(),
        test::TestRequest::delete().uri("/api/tasks/1").to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access denied. No token provided.");
    }
}

#[test_log::test(actix_rt::test)]
async fn test_alice_scenario() {
    let app = test_app(test_pool().await).await;

    let register_token = register_user(&app, "Alice", "alice@x.com", "secret1")
        .await
        .expect("registration should succeed");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@x.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: tasklet::auth::AuthResponse = test::read_body_json(resp).await;
    assert_eq!(
        test_keys().verify(&login.token).unwrap().id,
        test_keys().verify(&register_token).unwrap().id
    );

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&login.token))
        .set_json(json!({ "title": "Write report" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: TaskResponse = test::read_body_json(resp).await;
    assert_eq!(created.message, "Task created successfully");
    assert_eq!(created.task.status, TaskStatus::Pending);
    assert_eq!(created.task.description, "");

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: TaskListResponse = test::read_body_json(resp).await;
    assert_eq!(listing.tasks.len(), 1);
    assert_eq!(listing.tasks[0].id, created.task.id);
    assert_eq!(listing.tasks[0].title, "Write report");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.task.id))
        .append_header(bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Task deleted successfully.");

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "tasks": [] }));
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = test_app(test_pool().await).await;
    let token = register_user(&app, "Crud User", "crud_user@example.com", "secret1")
        .await
        .expect("Failed to register test user for CRUD flow");

    // 1. Create
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({
            "title": "CRUD Task 1 Original",
            "description": "Initial description",
            "status": "in-progress"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = test::read_body_json::<TaskResponse, _>(resp).await.task;
    assert_eq!(created.status, TaskStatus::InProgress);
    assert_eq!(created.description, "Initial description");
    assert_eq!(created.created_at, created.updated_at);

    // 2. Get by id
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = test::read_body_json::<TaskResponse, _>(resp).await.task;
    assert_eq!(fetched.title, "CRUD Task 1 Original");

    tokio::time::sleep(Duration::from_millis(5)).await;

    // 3. Update status only; title and description are kept
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header(bearer(&token))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: TaskResponse = test::read_body_json(resp).await;
    assert_eq!(updated.message, "Task updated successfully");
    assert_eq!(updated.task.status, TaskStatus::Completed);
    assert_eq!(updated.task.title, "CRUD Task 1 Original");
    assert_eq!(updated.task.description, "Initial description");
    assert_eq!(updated.task.created_at, created.created_at);
    assert!(updated.task.updated_at > created.updated_at);

    // 4. Update with new title
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header(bearer(&token))
        .set_json(json!({ "status": "pending", "title": "CRUD Task 1 Updated" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 5. Second task, then filter the listing
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "CRUD Task 2", "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let second = test::read_body_json::<TaskResponse, _>(resp).await.task;

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let listing: TaskListResponse = test::read_body_json(resp).await;
    let titles: Vec<&str> = listing.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["CRUD Task 1 Updated", "CRUD Task 2"]);

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=completed")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let listing: TaskListResponse = test::read_body_json(resp).await;
    assert_eq!(listing.tasks.len(), 1);
    assert_eq!(listing.tasks[0].id, second.id);

    // 6. Delete and confirm it is gone
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_task_input_errors() {
    let app = test_app(test_pool().await).await;
    let token = register_user(&app, "Val User", "val_user@example.com", "secret1")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "description": "no title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Task title is required.");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": "Has title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let task = test::read_body_json::<TaskResponse, _>(resp).await.task;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .append_header(bearer(&token))
        .set_json(json!({ "title": "No status" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Status is required.");

    let req = test::TestRequest::put()
        .uri("/api/tasks/999999")
        .append_header(bearer(&token))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=someday")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_non_numeric_task_id_gets_json_not_found() {
    let app = test_app(test_pool().await).await;
    let token = register_user(&app, "Path User", "path_user@example.com", "secret1")
        .await
        .unwrap();

    let requests = vec![
        test::TestRequest::get().uri("/api/tasks/abc"),
        test::TestRequest::put()
            .uri("/api/tasks/abc")
            .set_json(json!({ "status": "completed" })),
        test::TestRequest::delete().uri("/api/tasks/abc"),
    ];

    for req in requests {
        let req = req.append_header(bearer(&token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Task not found.");
    }
}

#[actix_rt::test]
async fn test_long_fields_and_empty_description_update() {
    let app = test_app(test_pool().await).await;
    let token = register_user(&app, "Long User", "long_user@example.com", "secret1")
        .await
        .unwrap();

    let long_title = "a".repeat(201);
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&token))
        .set_json(json!({ "title": long_title, "description": "b".repeat(1001) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task = test::read_body_json::<TaskResponse, _>(resp).await.task;
    assert_eq!(task.title, long_title);

    // An empty description in an update keeps the stored one
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .append_header(bearer(&token))
        .set_json(json!({ "status": "completed", "title": "", "description": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = test::read_body_json::<TaskResponse, _>(resp).await.task;
    assert_eq!(updated.title, long_title);
    assert_eq!(updated.description, "b".repeat(1001));
    assert_eq!(updated.status, TaskStatus::Completed);
}

#[actix_rt::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = test_app(test_pool().await).await;
    let token = register_user(&app, "Case User", "case_user@example.com", "secret1")
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", format!("bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_task_ownership_and_authorization() {
    let app = test_app(test_pool().await).await;

    let user_a = register_user(&app, "Owner A", "owner_user_a@example.com", "secretA1")
        .await
        .expect("Failed to register User A");
    let user_b = register_user(&app, "Other B", "other_user_b@example.com", "secretB1")
        .await
        .expect("Failed to register User B");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&user_a))
        .set_json(json!({ "title": "User A's Task" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task_a = test::read_body_json::<TaskResponse, _>(resp).await.task;

    // 1. B's listing does not include A's task
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&user_b))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: TaskListResponse = test::read_body_json(resp).await;
    assert!(listing.tasks.is_empty());

    // 2-4. get, update and delete by B all look like a missing task
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task_a.id))
        .append_header(bearer(&user_b))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task_a.id))
        .append_header(bearer(&user_b))
        .set_json(json!({ "title": "Attempted Update by B", "status": "completed" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task_a.id))
        .append_header(bearer(&user_b))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // A's task is untouched
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task_a.id))
        .append_header(bearer(&user_a))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = test::read_body_json::<TaskResponse, _>(resp).await.task;
    assert_eq!(fetched.title, "User A's Task");
    assert_eq!(fetched.status, TaskStatus::Pending);
}
