mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use block_schedule::api::create_router;
use block_schedule::models::DaySchedule;
use common::{controller, Script, ScriptedSource};
use serde_json::{json, Value};

fn setup(source: &Arc<ScriptedSource>) -> TestServer {
    let app = create_router(controller(source));
    TestServer::new(app).expect("Failed to create test server")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup(&Arc::new(ScriptedSource::new()));

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod load {
    use super::*;

    #[tokio::test]
    async fn returns_cards_for_selected_day() {
        let source = Arc::new(ScriptedSource::one_item_each());
        let server = setup(&source);

        let response = server.post("/api/v1/load").await;

        response.assert_status_ok();
        let view: Value = response.json();
        assert_eq!(view["kind"], "cards");
        assert_eq!(view["day"], "A");
        assert_eq!(view["cards"].as_array().map(Vec::len), Some(5));
        assert_eq!(view["cards"][3]["title"], "Block 4: T5");
        assert_eq!(view["cards"][3]["lines"], json!(["Artist: Art5"]));
    }

    #[tokio::test]
    async fn failure_is_bad_gateway_with_message() {
        let source = Arc::new(ScriptedSource::one_item_each());
        source.set("data/data3.json", 0, Script::Status(404));
        let server = setup(&source);

        let response = server.post("/api/v1/load").expect_failure().await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let view: Value = response.json();
        assert_eq!(view["kind"], "load_error");
        assert_eq!(view["message"], "HTTP 404 fetching data/data3.json");
    }

    #[tokio::test]
    async fn empty_data_reports_no_data_found() {
        let source = Arc::new(ScriptedSource::new());
        for locator in block_schedule::config::default_resources() {
            source.set(&locator, 0, Script::Items(vec![]));
        }
        let server = setup(&source);

        let response = server.post("/api/v1/load").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "kind": "no_data_found" }));
    }
}

mod day {
    use super::*;

    #[tokio::test]
    async fn selecting_before_load_reports_no_data_loaded() {
        let server = setup(&Arc::new(ScriptedSource::one_item_each()));

        let response = server.put("/api/v1/day").json(&json!({ "day": "C" })).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "kind": "no_data_loaded" }));
    }

    #[tokio::test]
    async fn selecting_after_load_reprojects_without_refetch() {
        let source = Arc::new(ScriptedSource::one_item_each());
        let server = setup(&source);
        server.post("/api/v1/load").await.assert_status_ok();

        let response = server.put("/api/v1/day").json(&json!({ "day": "b" })).await;

        response.assert_status_ok();
        let view: Value = response.json();
        assert_eq!(view["day"], "B");
        assert_eq!(view["cards"][0]["title"], "Block 1: T4");
        assert_eq!(source.calls(), 7);

        let status: Value = server.get("/api/v1/status").await.json();
        assert_eq!(status["selected_day"], "B");
    }
}

mod schedule {
    use super::*;

    #[tokio::test]
    async fn current_view_before_load() {
        let server = setup(&Arc::new(ScriptedSource::one_item_each()));

        let response = server.get("/api/v1/schedule").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "kind": "no_data_loaded" }));
    }

    #[tokio::test]
    async fn day_query_previews_without_selecting() {
        let source = Arc::new(ScriptedSource::one_item_each());
        let server = setup(&source);
        server.post("/api/v1/load").await.assert_status_ok();

        let preview: Value = server
            .get("/api/v1/schedule")
            .add_query_param("day", "E")
            .await
            .json();
        assert_eq!(preview["day"], "E");

        let current: Value = server.get("/api/v1/schedule").await.json();
        assert_eq!(current["day"], "A");
    }

    #[tokio::test]
    async fn current_view_shows_last_load_error() {
        let source = Arc::new(ScriptedSource::one_item_each());
        source.set("data/data5.json", 0, Script::Garbage);
        let server = setup(&source);
        server.post("/api/v1/load").expect_failure().await;

        let view: Value = server.get("/api/v1/schedule").await.json();

        assert_eq!(view["kind"], "load_error");
    }
}

mod status {
    use super::*;

    #[tokio::test]
    async fn reflects_successful_load() {
        let server = setup(&Arc::new(ScriptedSource::one_item_each()));
        server.post("/api/v1/load").await.assert_status_ok();

        let status: Value = server.get("/api/v1/status").await.json();

        assert_eq!(status["phase"], "ready");
        assert_eq!(status["item_count"], 7);
        assert!(status["loaded_at"].is_string());
        assert!(status["last_error"].is_null());
    }
}

mod days {
    use super::*;

    #[tokio::test]
    async fn lists_the_schedule_table() {
        let server = setup(&Arc::new(ScriptedSource::new()));

        let response = server.get("/api/v1/days").await;

        response.assert_status_ok();
        let days: Vec<DaySchedule> = response.json();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].blocks, vec![1, 2, 3, 5, 6]);
        assert_eq!(days[6].blocks, vec![3, 4, 7, 5, 6]);
    }
}
