//! Classifier contract against a local mock of the classification service.

use mockito::{Matcher, Server};
use pdf_abstract::{ClassificationError, Classifier, ClassifierConfig};

const PATH: &str = "/classifier/classify/aurora-sdg-multi";

fn classifier_for(server: &Server) -> Classifier {
    Classifier::new(ClassifierConfig {
        endpoint: format!("{}{}", server.url(), PATH),
        timeout_secs: 5,
        ..ClassifierConfig::default()
    })
    .unwrap()
}

const RESPONSE: &str = r#"{
  "predictions": [
    {"sdg": {"label": "Quality Education", "code": "4"}, "prediction": 0.425678},
    {"sdg": {"label": "Life on Land", "code": "15"}, "prediction": 0.1499},
    {"sdg": {"label": "Climate Action", "code": "13"}, "prediction": 0.15},
    {"sdg": {"label": "No Poverty", "code": "1"}, "prediction": 0.02}
  ]
}"#;

#[tokio::test]
async fn keeps_labels_at_or_above_floor_with_rounded_scores() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({"text": "We study schools."})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RESPONSE)
        .create_async()
        .await;

    let labels = classifier_for(&server).classify("We study schools.").await;

    mock.assert_async().await;
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].label, "Quality Education");
    assert_eq!(labels[0].score, 42.57);
    assert_eq!(labels[1].label, "Climate Action");
    assert_eq!(labels[1].score, 15.0);
}

#[tokio::test]
async fn server_error_yields_empty_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let classifier = classifier_for(&server);
    assert!(classifier.classify("anything").await.is_empty());

    let err = classifier.try_classify("anything").await.unwrap_err();
    assert!(matches!(err, ClassificationError::Status { status: 503 }));
}

#[tokio::test]
async fn malformed_body_yields_empty_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"unexpected": true}"#)
        .expect(2)
        .create_async()
        .await;

    let classifier = classifier_for(&server);
    assert!(classifier.classify("text").await.is_empty());
    assert!(matches!(
        classifier.try_classify("text").await,
        Err(ClassificationError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_service_yields_empty_list() {
    let classifier = Classifier::new(ClassifierConfig {
        endpoint: "http://127.0.0.1:9/classify".into(),
        timeout_secs: 2,
        ..ClassifierConfig::default()
    })
    .unwrap();

    assert!(classifier.classify("text").await.is_empty());
    assert!(matches!(
        classifier.try_classify("text").await,
        Err(ClassificationError::Transport(_))
    ));
}

#[tokio::test]
async fn custom_floor_is_respected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(RESPONSE)
        .create_async()
        .await;

    let classifier = Classifier::new(ClassifierConfig {
        endpoint: format!("{}{}", server.url(), PATH),
        min_confidence: 0.0,
        timeout_secs: 5,
    })
    .unwrap();

    assert_eq!(classifier.classify("x").await.len(), 4);
}
