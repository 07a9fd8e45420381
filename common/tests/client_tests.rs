// Tests for the workforce API client against a mock server

use common::client::WorkforceClient;
use common::config::WorkforceApiConfig;
use common::errors::ApiClientError;
use common::models::{ForemanCreate, Gender, TaskStatus, TaskStatusUpdate};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WorkforceClient {
    let config = WorkforceApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    WorkforceClient::new(&config).unwrap()
}

fn foreman_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "foreman_id": id,
        "full_name": "Иванов Иван Иванович",
        "gender": "М",
        "workshop": "Литейный",
        "phone_number": "+79991234567"
    })
}

fn task_json(id: i64, status: &str) -> serde_json::Value {
    serde_json::json!({
        "task_id": id,
        "start_time": "01.03.2025 08:00",
        "end_time": "01.03.2025 17:00",
        "workshop": "Литейный",
        "foreman_id": 1,
        "technician_id": 9,
        "task_description": "Отливка партии корпусов",
        "status": status
    })
}

#[tokio::test]
async fn test_list_foremen_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/foremen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([foreman_json(1), foreman_json(2)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let foremen = client_for(&server).list_foremen().await.unwrap();
    assert_eq!(foremen.len(), 2);
    assert_eq!(foremen[0].foreman_id, 1);
    assert_eq!(foremen[0].gender, Gender::Male);
    assert_eq!(foremen[1].workshop, "Литейный");

    server.verify().await;
}

#[tokio::test]
async fn test_create_foreman_sends_wire_shape() {
    let server = MockServer::start().await;

    // The create payload must not carry an id; the API assigns one.
    Mock::given(method("POST"))
        .and(path("/foremen"))
        .and(body_json(serde_json::json!({
            "full_name": "Петров Петр Петрович",
            "gender": "М",
            "workshop": "Сборочный",
            "phone_number": "89991234567"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(foreman_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let dto = ForemanCreate {
        full_name: "Петров Петр Петрович".to_string(),
        gender: Gender::Male,
        workshop: "Сборочный".to_string(),
        phone_number: "89991234567".to_string(),
    };
    let created = client_for(&server).create_foreman(&dto).await.unwrap();
    assert_eq!(created.foreman_id, 7);

    server.verify().await;
}

#[tokio::test]
async fn test_rejection_carries_api_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/foremen"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Цех находится под управлением начальника 3"
        })))
        .mount(&server)
        .await;

    let dto = ForemanCreate {
        full_name: "Петров Петр Петрович".to_string(),
        gender: Gender::Male,
        workshop: "Литейный".to_string(),
        phone_number: "89991234567".to_string(),
    };
    let err = client_for(&server).create_foreman(&dto).await.unwrap_err();
    match &err {
        ApiClientError::Rejected { status, detail } => {
            assert_eq!(*status, 400);
            assert_eq!(detail, "Цех находится под управлением начальника 3");
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert!(!err.is_not_found());
    assert_eq!(err.detail(), "Цех находится под управлением начальника 3");

    server.verify().await;
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/technicians/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Технический работник не найден"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_technician(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.detail(), "Технический работник не найден");
}

#[tokio::test]
async fn test_error_body_without_detail_falls_back_to_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/technician-tasks"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tasks().await.unwrap_err();
    assert_eq!(err.detail(), "HTTP 502");
}

#[tokio::test]
async fn test_technician_tasks_use_scoped_endpoint() {
    let server = MockServer::start().await;

    // The self-service view must fetch only its own tasks, never the full
    // listing.
    Mock::given(method("GET"))
        .and(path("/technicians/42/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([task_json(1, "Не выполнено")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/technician-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let tasks = client_for(&server).list_technician_tasks(42).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::NotDone);

    server.verify().await;
}

#[tokio::test]
async fn test_status_update_posts_to_status_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/technician-tasks/status"))
        .and(body_json(serde_json::json!({
            "task_id": 7,
            "status": "Выполнено"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(7, "Выполнено")))
        .expect(1)
        .mount(&server)
        .await;

    let dto = TaskStatusUpdate {
        task_id: 7,
        status: TaskStatus::Done,
    };
    let updated = client_for(&server).update_task_status(&dto).await.unwrap();
    assert_eq!(updated.status, TaskStatus::Done);

    server.verify().await;
}

#[tokio::test]
async fn test_malformed_success_body_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/foremen"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_foremen().await.unwrap_err();
    assert!(matches!(err, ApiClientError::InvalidBody(_)));
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/foremen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = WorkforceApiConfig {
        base_url: server.uri(),
        timeout_seconds: 1,
    };
    let client = WorkforceClient::new(&config).unwrap();
    let err = client.list_foremen().await.unwrap_err();
    assert!(matches!(err, ApiClientError::Timeout(_)));
}
