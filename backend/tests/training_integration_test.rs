//! Integration tests for training day, workout session and mobility endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires database"]
async fn test_today_uses_default_settings() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();

    let (status, response) = app.get_as(user, "/api/v1/training/today").await;

    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["timezone"], "America/New_York");
    assert!(response["training_date"].is_string());
    assert!(response.get("plan").is_none());

    app.cleanup(user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_start_session_before_noon_counts_for_previous_day() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();
    let plan_id = app.seed_plan(user, "Lower A", 1).await;

    // 01:30 Tuesday in New York
    let body = json!({ "started_at": "2024-03-05T06:30:00Z" }).to_string();

    let (status, first) = app.post_as(user, "/api/v1/training/sessions", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    let first: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(first["training_date"], "2024-03-04");
    assert_eq!(first["plan_id"], plan_id.to_string());

    // Starting again the same training day resumes the session
    let (status, second) = app.post_as(user, "/api/v1/training/sessions", &body).await;
    assert_eq!(status, StatusCode::OK);
    let second: Value = serde_json::from_str(&second).unwrap();
    assert_eq!(second["id"], first["id"]);

    let (status, list) = app.get_as(user, "/api/v1/training/sessions").await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_str(&list).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    app.cleanup(user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_start_session_without_plan() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();
    app.seed_plan(user, "Upper A", 2).await;

    // 10:00 Monday in New York, but only a Tuesday plan exists
    let body = json!({ "started_at": "2024-03-04T15:00:00Z" }).to_string();
    let (status, response) = app.post_as(user, "/api/v1/training/sessions", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(response.contains("No workout planned for 2024-03-04"));

    let body = json!({ "plan_id": uuid::Uuid::new_v4(), "started_at": "2024-03-04T15:00:00Z" }).to_string();
    let (status, response) = app.post_as(user, "/api/v1/training/sessions", &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(response.contains("Plan not found"));

    app.cleanup(user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_log_mobility_routine() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();

    let body = json!({
        "type": "POST_WORKOUT",
        "completed_at": "2024-03-05T06:30:00Z",
        "notes": "tight hips"
    })
    .to_string();
    let (status, response) = app.post_as(user, "/api/v1/mobility/logs", &body).await;

    assert_eq!(status, StatusCode::CREATED);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["type"], "POST_WORKOUT");
    assert_eq!(response["version"], "A");
    assert_eq!(response["training_date"], "2024-03-04");

    let (status, _) = app
        .post_as(user, "/api/v1/mobility/logs", &json!({ "type": "UNDO_SITTING", "version": "B" }).to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Only the log completed now belongs to today's training date
    let (status, today) = app.get_as(user, "/api/v1/mobility/logs/today").await;
    assert_eq!(status, StatusCode::OK);
    let today: Value = serde_json::from_str(&today).unwrap();
    let today = today.as_array().unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0]["type"], "UNDO_SITTING");
    assert_eq!(today[0]["version"], "B");

    // History is newest training date first and keeps notes
    let (status, history) = app.get_as(user, "/api/v1/mobility/logs?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let history: Value = serde_json::from_str(&history).unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["type"], "UNDO_SITTING");
    assert!(history[0].get("notes").is_none());
    assert_eq!(history[1]["notes"], "tight hips");

    app.cleanup(user).await;
}

/// Start the Monday session at 01:30 Tuesday New York time
async fn start_monday_session(app: &TestApp, user: uuid::Uuid) -> String {
    let body = json!({ "started_at": "2024-03-05T06:30:00Z" }).to_string();
    let (status, session) = app.post_as(user, "/api/v1/training/sessions", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    let session: Value = serde_json::from_str(&session).unwrap();
    session["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_log_sets_and_complete_session() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();
    let plan_id = app.seed_plan(user, "Lower A", 1).await;
    let squat_id = app.seed_exercise(plan_id, "Back Squat", 0).await;
    app.seed_exercise(plan_id, "Walking Lunge", 1).await;
    let session_id = start_monday_session(&app, user).await;
    let sets_path = format!("/api/v1/training/sessions/{}/sets", session_id);

    let first = json!({
        "plan_exercise_id": squat_id,
        "exercise_name": "Back Squat",
        "set_number": 1,
        "weight_used": 185,
        "reps_completed": 5
    });
    let (status, _) = app.post_as(user, &sets_path, &first.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Logging the same set again overwrites it
    let corrected = json!({
        "plan_exercise_id": squat_id,
        "exercise_name": "Back Squat",
        "set_number": 1,
        "weight_used": 190,
        "reps_completed": 5,
        "actual_rpe": 8
    });
    let (status, set) = app.post_as(user, &sets_path, &corrected.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let set: Value = serde_json::from_str(&set).unwrap();
    assert_eq!(set["weight_used"], 190.0);
    assert_eq!(set["actual_rpe"], 8);

    let second = json!({ "exercise_name": "Back Squat", "set_number": 2, "weight_used": 190, "reps_completed": 4 });
    let (status, _) = app.post_as(user, &sets_path, &second.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, detail) = app
        .get_as(user, &format!("/api/v1/training/sessions/{}", session_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let detail: Value = serde_json::from_str(&detail).unwrap();
    assert_eq!(detail["session"]["training_date"], "2024-03-04");
    assert_eq!(detail["plan"]["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(detail["plan"]["exercises"][0]["exercise_name"], "Back Squat");
    let sets = detail["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0]["set_number"], 1);
    assert_eq!(sets[1]["set_number"], 2);

    // Nothing to prefill until a session of the plan is completed
    let previous_path = format!("/api/v1/training/plans/{}/previous-sets", plan_id);
    let (status, previous) = app.get_as(user, &previous_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(previous, "[]");

    let complete_path = format!("/api/v1/training/sessions/{}/complete", session_id);
    let (status, completed) = app.post_as(user, &complete_path, "{}").await;
    assert_eq!(status, StatusCode::OK);
    let completed: Value = serde_json::from_str(&completed).unwrap();
    assert!(completed["completed_at"].is_string());

    // Completing again keeps the first completion time
    let (status, again) = app.post_as(user, &complete_path, "{}").await;
    assert_eq!(status, StatusCode::OK);
    let again: Value = serde_json::from_str(&again).unwrap();
    assert_eq!(again["completed_at"], completed["completed_at"]);

    let (status, previous) = app.get_as(user, &previous_path).await;
    assert_eq!(status, StatusCode::OK);
    let previous: Value = serde_json::from_str(&previous).unwrap();
    assert_eq!(previous.as_array().unwrap().len(), 2);
    assert_eq!(previous[0]["weight_used"], 190.0);
    assert_eq!(previous[1]["reps_completed"], 4);

    let (status, history) = app
        .get_as(user, "/api/v1/training/exercises/Back%20Squat/history")
        .await;
    assert_eq!(status, StatusCode::OK);
    let history: Value = serde_json::from_str(&history).unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|h| h["training_date"] == "2024-03-04"));

    app.cleanup(user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_sets_are_scoped_to_session_owner() {
    let app = TestApp::new().await;
    let owner = TestApp::new_user();
    let stranger = TestApp::new_user();
    app.seed_plan(owner, "Lower A", 1).await;
    let session_id = start_monday_session(&app, owner).await;
    let sets_path = format!("/api/v1/training/sessions/{}/sets", session_id);
    let body = json!({ "exercise_name": "Back Squat", "set_number": 1 }).to_string();

    let (status, response) = app.post_as(stranger, &sets_path, &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(response.contains("Session not found"));

    let (status, _) = app
        .post_as(stranger, &format!("/api/v1/training/sessions/{}/complete", session_id), "{}")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, response) = app
        .post_as(owner, &sets_path, &json!({ "exercise_name": "Back Squat", "set_number": 0 }).to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("set_number"));

    app.cleanup(owner).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_plans_orders_by_weekday() {
    let app = TestApp::new().await;
    let user = TestApp::new_user();
    let friday = app.seed_plan(user, "Upper B", 5).await;
    let monday = app.seed_plan(user, "Lower A", 1).await;
    app.seed_exercise(friday, "Pull Up", 0).await;
    app.seed_exercise(monday, "Deadlift", 1).await;
    app.seed_exercise(monday, "Hip Airplane", 0).await;

    let (status, plans) = app.get_as(user, "/api/v1/training/plans").await;
    assert_eq!(status, StatusCode::OK);
    let plans: Value = serde_json::from_str(&plans).unwrap();
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["name"], "Lower A");
    assert_eq!(plans[0]["exercises"][0]["exercise_name"], "Hip Airplane");
    assert_eq!(plans[0]["exercises"][0]["exercise_type"], "WORKING");
    assert_eq!(plans[1]["day_of_week"], 5);

    app.cleanup(user).await;
}
