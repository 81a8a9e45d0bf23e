use anyhow::Result;
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use savings_planner::core::{NewLogEntry, NewPlan, PlanStore};
use savings_planner::{AppConfig, PlannerError, RestPlanStore};
use serde_json::json;

fn store_for(server: &MockServer) -> RestPlanStore {
    let config = AppConfig::from_toml_str(&format!(
        r#"
[store]
endpoint = "{}/"
api_key = "test-key"
timeout_seconds = 2
"#,
        server.base_url()
    ))
    .unwrap();
    RestPlanStore::new(&config).unwrap()
}

fn plan_row(id: i64, goal_name: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "goal_name": goal_name,
        "target_amount": 500000,
        "monthly_savings": 68250,
        "months_needed": 8,
        "region": "東京都",
        "memo": "✅ 無理のない積立ペースです。",
        "created_at": created_at
    })
}

#[tokio::test]
async fn test_create_plan_sends_postgrest_headers() -> Result<()> {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/savings_plans")
            .header("apikey", "test-key")
            .header("authorization", "Bearer test-key")
            .header("prefer", "return=representation")
            .json_body_partial(r#"{"goal_name": "海外旅行", "region": "東京都"}"#);
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(json!([plan_row(42, "海外旅行", "2026-10-18T03:00:00.123456+00:00")]));
    });

    let store = store_for(&server);
    let plan = store
        .create_plan(NewPlan {
            goal_name: "海外旅行".to_string(),
            target_amount: dec!(500000),
            monthly_savings: dec!(68250),
            months_needed: Some(8),
            region: "東京都".to_string(),
            memo: "✅ 無理のない積立ペースです。".to_string(),
        })
        .await?;

    insert_mock.assert();
    assert_eq!(plan.id, 42);
    assert_eq!(plan.monthly_savings, dec!(68250));
    assert_eq!(plan.months_needed, Some(8));
    Ok(())
}

#[tokio::test]
async fn test_list_plans_orders_by_recency() -> Result<()> {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/savings_plans")
            .query_param("select", "*")
            .query_param("order", "created_at.desc");
        then.status(200).json_body(json!([
            plan_row(2, "車購入", "2026-10-18T00:00:00+00:00"),
            {
                "id": 1,
                "goal_name": "引っ越し",
                "target_amount": 300000,
                "monthly_savings": 0,
                "months_needed": null,
                "region": "その他",
                "memo": "",
                "created_at": "2026-10-01T00:00:00+00:00"
            }
        ]));
    });

    let plans = store_for(&server).list_plans().await?;

    list_mock.assert();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].goal_name, "車購入");
    assert_eq!(plans[1].months_needed, None);
    Ok(())
}

#[tokio::test]
async fn test_delete_plan_removes_log_entries_first() -> Result<()> {
    let server = MockServer::start();
    let logs_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/rest/v1/savings_logs")
            .query_param("plan_id", "eq.7");
        then.status(204);
    });
    let plan_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/rest/v1/savings_plans")
            .query_param("id", "eq.7");
        then.status(204);
    });

    store_for(&server).delete_plan(7).await?;

    logs_mock.assert();
    plan_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_append_and_list_logs() -> Result<()> {
    let server = MockServer::start();
    let append_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/savings_logs")
            .json_body_partial(r#"{"plan_id": 7, "memo": "ボーナス"}"#);
        then.status(201).json_body(json!([{
            "id": 100,
            "plan_id": 7,
            "amount": 30000,
            "memo": "ボーナス",
            "created_at": "2026-10-18T09:30:00+00:00"
        }]));
    });
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/savings_logs")
            .query_param("plan_id", "eq.7")
            .query_param("order", "created_at.desc");
        then.status(200).json_body(json!([
            {"id": 101, "plan_id": 7, "amount": 15000.5, "memo": null, "created_at": "2026-10-19T09:30:00+00:00"},
            {"id": 100, "plan_id": 7, "amount": 30000, "memo": "ボーナス", "created_at": "2026-10-18T09:30:00+00:00"}
        ]));
    });

    let store = store_for(&server);
    let entry = store
        .append_log(NewLogEntry {
            plan_id: 7,
            amount: dec!(30000),
            memo: Some("ボーナス".to_string()),
        })
        .await?;
    let entries = store.list_logs(7).await?;

    append_mock.assert();
    list_mock.assert();
    assert_eq!(entry.id, 100);
    assert_eq!(entry.amount, dec!(30000));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].amount, dec!(15000.5));
    assert_eq!(entries[0].memo, None);
    Ok(())
}

#[tokio::test]
async fn test_error_status_becomes_store_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/savings_plans");
        then.status(401)
            .json_body(json!({"message": "Invalid API key"}));
    });

    let err = store_for(&server).list_plans().await.unwrap_err();

    match err {
        PlannerError::StoreError { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_insert_representation_is_an_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/savings_logs");
        then.status(201).json_body(json!([]));
    });

    let result = store_for(&server)
        .append_log(NewLogEntry {
            plan_id: 1,
            amount: dec!(1000),
            memo: None,
        })
        .await;

    tokio_test::assert_err!(&result);
    assert!(matches!(result, Err(PlannerError::StoreError { status: 201, .. })));
    Ok(())
}

#[tokio::test]
async fn test_malformed_rows_are_serialization_errors() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/savings_plans");
        then.status(200).json_body(json!([{"id": "not-a-number"}]));
    });

    let result = store_for(&server).list_plans().await;
    assert!(matches!(result, Err(PlannerError::SerializationError(_))));
    Ok(())
}
