//! Router-level tests: each request runs through the full axum stack
//! against a document store in a temporary directory.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use finance_tracker_backend::{
    build_app,
    config::{AppConfig, Environment},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _data_dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::in_environment(Environment::Test)
    }

    fn in_environment(environment: Environment) -> Self {
        let data_dir = TempDir::new().unwrap();
        let config = AppConfig {
            environment,
            ..AppConfig::for_testing(data_dir.path().to_path_buf())
        };
        let router = build_app(&config).unwrap();
        Self { _data_dir: data_dir, router }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn create_category(&self, name: &str, category_type: &str) -> String {
        let (status, body) = self
            .post(
                "/api/categories",
                json!({ "name": name, "icon": "🍔", "color": "#FF6B6B", "type": category_type }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_reports_environment() {
    let app = TestApp::new();

    for uri in ["/health", "/api/health"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["environment"], "test");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body.get("runtime").is_none());
    }

    let (status, _) = app.get("/env-status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_development_exposes_diagnostics() {
    let app = TestApp::in_environment(Environment::Development);

    let (status, health) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["environment"], "development");
    assert_eq!(health["runtime"]["platform"], std::env::consts::OS);

    let (status, env) = app.get("/env-status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["config"]["port"], 0);
    assert_eq!(env["config"]["logLevel"], "debug");
    assert_eq!(env["config"]["corsOrigins"].as_array().unwrap().len(), 4);
    assert!(env["runtime"]["processId"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn test_category_delete_blocked_then_allowed() {
    let app = TestApp::new();
    let food = app.create_category("Food", "expense").await;

    let (status, expense) = app
        .post("/api/expenses", json!({ "amount": 25, "categoryId": food, "title": "Lunch" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let expense_id = expense["id"].as_str().unwrap().to_string();

    let (status, body) = app.delete(&format!("/api/categories/{}", food)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["expenseCount"], 1);

    let (status, _) = app.get(&format!("/api/categories/{}", food)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/expenses/{}", expense_id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/api/expenses/{}", expense_id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.delete(&format!("/api/categories/{}", food)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted successfully");

    let (status, _) = app.get(&format!("/api/categories/{}", food)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let app = TestApp::new();
    let food = app.create_category("Food", "expense").await;

    let (status, body) = app
        .post(
            "/api/expenses",
            json!({ "amount": -5, "categoryId": food, "title": "Refund?", "date": "2024-01-15" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must be a positive number");

    let (_, list) = app.get("/api/expenses").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_dangling_category_and_bad_json() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/deposits", json!({ "amount": 10, "category": "missing" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid category");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/expenses")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_month_summary_scenario() {
    let app = TestApp::new();
    let food = app.create_category("Food", "expense").await;

    let (status, expense) = app
        .post("/api/expenses", json!({ "amount": 100, "categoryId": food, "date": "2024-01-15" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["category"]["name"], "Food");
    assert_eq!(expense["title"], "Expense");

    let (status, summary) = app.get("/api/analytics/summary?month=2024-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalExpenses"], 100.0);
    let breakdown = summary["categoryBreakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0]["total"], 100.0);
    assert_eq!(breakdown[0]["percentage"], 100.0);
    assert_eq!(summary["range"]["month"], "2024-01");
}

#[tokio::test]
async fn test_invalid_analytics_selectors() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/analytics/summary?period=decade").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid period. Use week|month|quarter|year");

    let (status, body) = app.get("/api/analytics/summary?month=2024-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid month format. Use YYYY-MM");

    let (status, _) = app
        .get("/api/analytics/budget-status?startDate=2024-02-01&endDate=2024-01-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/analytics/overview?months=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_settings_defaults_without_post() {
    let app = TestApp::new();

    let (status, settings) = app.get("/api/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["currency"], "INR");
    assert_eq!(settings["currencySymbol"], "₹");
    assert_eq!(settings["theme"], "light");
    assert_eq!(settings["budgetLimit"], 1000.0);
}

#[tokio::test]
async fn test_settings_status_codes_and_validation() {
    let app = TestApp::new();

    let (status, created) = app.post("/api/settings", json!({ "currency": "USD", "currencySymbol": "$" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["currency"], "USD");

    let (status, updated) = app.put("/api/settings", json!({ "theme": "dark" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["theme"], "dark");
    assert_eq!(updated["currency"], "USD");

    let (status, body) = app.put("/api/settings", json!({ "theme": "neon" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid theme");

    let (status, info) = app.get("/api/settings/currency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["current"]["code"], "USD");
    assert_eq!(info["available"]["EUR"]["symbol"], "€");
}

#[tokio::test]
async fn test_deposit_source_alias_and_summary() {
    let app = TestApp::new();
    let salary = app.create_category("Salary", "income").await;

    let (status, deposit) = app
        .post(
            "/api/deposits",
            json!({ "source": "Paycheck", "amount": "1500.50", "category": salary, "date": "2024-03-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["title"], "Paycheck");
    assert_eq!(deposit["amount"], 1500.5);
    assert_eq!(deposit["categoryId"], salary.as_str());

    let (status, summary) = app.get("/api/deposits/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total"], 1500.5);
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["monthlyTotals"]["2024-03"], 1500.5);
    assert_eq!(summary["categoryBreakdown"][salary.as_str()]["name"], "Salary");

    let (status, range) = app
        .get("/api/deposits/date-range?startDate=2024-03-01&endDate=2024-03-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(range.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/deposits/date-range?startDate=2024-03-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cleared) = app.delete("/api/deposits/clear-all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["deletedCount"], 1);
}

#[tokio::test]
async fn test_category_listing_and_duplicates() {
    let app = TestApp::new();
    app.create_category("Rent", "expense").await;
    app.create_category("Food", "expense").await;
    app.create_category("Salary", "income").await;

    let (status, body) = app
        .post("/api/categories", json!({ "name": "food", "icon": "🍕", "color": "#000" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category name already exists for this type");

    let (_, all) = app.get("/api/categories").await;
    let names: Vec<&str> = all.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Food", "Rent", "Salary"]);

    let (_, income) = app.get("/api/categories?type=income").await;
    assert_eq!(income.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/categories?type=savings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unfiltered) = app.get("/api/categories?type=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unfiltered.as_array().unwrap().len(), 3);

    let (status, cleared) = app.delete("/api/categories/clear-all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["deletedCount"], 3);
}
