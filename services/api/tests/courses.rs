mod common;

use morbror_core::{
    bridge,
    course_source::{CourseSource, HttpCourseSource},
};

#[tokio::test]
async fn test_course_source_reads_served_catalog() {
    let addr = common::spawn_app(vec![
        common::course("arduino-for-barn", "Arduino for barn"),
        common::course("elektronikk", "Elektronikk for nybegynnere"),
    ])
    .await;

    let source = HttpCourseSource::new(format!("http://{}", addr)).unwrap();
    let courses = source.fetch_courses().await.unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].id, "arduino-for-barn");
    assert_eq!(courses[0].progress, 0);

    let found = bridge::resolve(&courses, "arduino").unwrap();
    assert_eq!(found.title, "Arduino for barn");
}

#[tokio::test]
async fn test_get_course_by_id() {
    let addr = common::spawn_app(vec![common::course("arduino-for-barn", "Arduino for barn")]).await;

    let response = reqwest::get(format!("http://{}/courses/arduino-for-barn", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["courseId"], "arduino-for-barn");
    assert_eq!(body["modules"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_course_is_not_found() {
    let addr = common::spawn_app(vec![]).await;

    let response = reqwest::get(format!("http://{}/courses/finnes-ikke", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"detail": "Course not found"}));
}

#[tokio::test]
async fn test_root_message() {
    let addr = common::spawn_app(vec![]).await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "MorbrorAppen Backend is running!");
}

#[tokio::test]
async fn test_course_source_reports_unreachable_backend() {
    let source = HttpCourseSource::new("http://127.0.0.1:9").unwrap();
    assert!(source.fetch_courses().await.is_err());
}
