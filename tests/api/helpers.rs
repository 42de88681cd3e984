use std::{env, io, sync};

use fdlimit::raise_fd_limit;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use preference_center::configuration::Settings;
use preference_center::startup::Application;
use preference_center::telemetry::{get_subscriber, init_subscriber};

/// Path of the recipients table in the store's REST API
pub const RECIPIENTS_PATH: &str = "/rest/v1/recipients";

/// Path of the subscription settings table in the store's REST API
pub const SETTINGS_PATH: &str = "/rest/v1/recipient_subscription_settings";

/// Ensure the tracing stack is initialized only once
static TRACING: sync::LazyLock<()> = sync::LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber(
            subscriber_name,
            default_filter_level,
            io::stdout,
        ));
    } else {
        init_subscriber(get_subscriber(
            subscriber_name,
            default_filter_level,
            io::sink,
        ));
    };
});

/// Test application data
pub struct TestApp {
    pub address: String,
    pub store_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spin up a test application backed by a mock preference store
    pub async fn spawn() -> Self {
        // Initialize logging
        sync::LazyLock::force(&TRACING);

        // Raise file descriptors limit to avoid "Too many open files" error
        raise_fd_limit().expect("Failed to raise fd limit");

        // Launch a mock server to stand in for the preference store
        let store_server = MockServer::start().await;

        // Get settings and modify them for testing
        let config = {
            let mut c = Settings::get_config().expect("Failed to read configuration");
            // Listen on a random TCP port
            c.application.app_port = 0;
            // Use the mock server as the preference store
            c.preference_store.base_url = store_server.uri();
            c
        };

        // Build the application and get its address
        let app = Application::build(config).expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        // Build the API client
        let api_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Run the application and return its data
        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run_until_stopped());
        Self {
            address,
            store_server,
            api_client,
        }
    }

    /// Perform a GET request to the preferences endpoint
    pub async fn get_preferences(&self, user_id: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/preferences", &self.address))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Perform a POST request to the toggle endpoint
    pub async fn post_toggle(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/preferences/toggle", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Perform a POST request to the undo endpoint
    pub async fn post_undo(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/preferences/undo", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Mount store mocks serving a recipient and their stored settings
    pub async fn mount_store_records(
        &self,
        user_id: &str,
        email: &str,
        marketing: bool,
        all_emails: bool,
    ) {
        Mock::given(method("GET"))
            .and(path(RECIPIENTS_PATH))
            .and(query_param("id", format!("eq.{user_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": user_id,
                "email": email,
                "created_at": "2025-01-01T00:00:00Z",
            }])))
            .mount(&self.store_server)
            .await;
        Mock::given(method("GET"))
            .and(path(SETTINGS_PATH))
            .and(query_param("recipient_id", format!("eq.{user_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "marketing_emails_unsub": marketing,
                "all_emails_unsub": all_emails,
            }])))
            .mount(&self.store_server)
            .await;
    }

    /// Mount store mocks answering every read with an empty row set
    pub async fn mount_empty_store(&self) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&self.store_server)
            .await;
    }
}
