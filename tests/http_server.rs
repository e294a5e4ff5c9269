use std::collections::HashSet;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use student_records::{
    api,
    records::{RecordsService, Student},
};
use tokio::{net::TcpListener, task::JoinSet};

struct TestServer {
    base_url: String,
    client: Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = api::create_router(Arc::new(RecordsService::new()));
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn student_lifecycle_over_http() {
    let server = TestServer::start().await;

    let created: Student = server
        .client
        .post(server.url("/students"))
        .json(&json!({ "name": "Ann", "age": 20, "email": "a@x.com" }))
        .send()
        .await
        .expect("create")
        .json()
        .await
        .expect("create body");
    assert_eq!(created.id, 1);

    let fetched: Student = server
        .client
        .get(server.url("/students/1"))
        .send()
        .await
        .expect("get")
        .json()
        .await
        .expect("get body");
    assert_eq!(fetched, created);

    for _ in 0..2 {
        let summary: Value = server
            .client
            .get(server.url("/students/summary/1"))
            .send()
            .await
            .expect("summary")
            .json()
            .await
            .expect("summary body");
        assert_eq!(summary["summary"], "Student Ann, age 20, email a@x.com");
    }

    let deleted = server
        .client
        .delete(server.url("/students/1"))
        .send()
        .await
        .expect("delete");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = server
        .client
        .get(server.url("/students/1"))
        .send()
        .await
        .expect("get after delete");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let recreated: Student = server
        .client
        .post(server.url("/students"))
        .json(&json!({ "name": "Ann" }))
        .send()
        .await
        .expect("recreate")
        .json()
        .await
        .expect("recreate body");
    assert_eq!(recreated.id, 2);

    let metrics: Value = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("metrics")
        .json()
        .await
        .expect("metrics body");
    assert_eq!(metrics["students_created"], 2);
    assert_eq!(metrics["summaries_generated"], 1);
    assert_eq!(metrics["summary_cache_hits"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_creates_assign_distinct_ids() {
    const REQUESTS: usize = 64;
    let server = TestServer::start().await;

    let mut tasks = JoinSet::new();
    for n in 0..REQUESTS {
        let client = server.client.clone();
        let url = server.url("/students");
        tasks.spawn(async move {
            let student: Student = client
                .post(url)
                .json(&json!({ "name": format!("student-{n}"), "age": n }))
                .send()
                .await
                .expect("create")
                .json()
                .await
                .expect("create body");
            student.id
        });
    }

    let mut ids = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        ids.insert(result.expect("task"));
    }
    assert_eq!(ids.len(), REQUESTS);
    assert_eq!(ids.iter().copied().min(), Some(1));
    assert_eq!(ids.iter().copied().max(), Some(REQUESTS as i64));

    let listed: Vec<Student> = server
        .client
        .get(server.url("/students"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("list body");
    assert_eq!(listed.len(), REQUESTS);
    let listed_ids: HashSet<i64> = listed.iter().map(|student| student.id).collect();
    assert_eq!(listed_ids, ids);
}

#[tokio::test]
async fn malformed_identifier_is_a_client_error() {
    let server = TestServer::start().await;
    let response = server
        .client
        .put(server.url("/students/not-a-number"))
        .json(&json!({ "name": "Ann" }))
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.expect("text"), "Invalid student ID");
}
