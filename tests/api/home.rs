use crate::helpers::TestApp;

#[tokio::test]
async fn home_serves_the_preferences_page() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .get(format!("{}/", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("Manage your subscriptions"));
}
