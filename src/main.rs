use std::io;

use preference_center::configuration::Settings;
use preference_center::startup::Application;
use preference_center::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = get_subscriber("preference-center".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    // Retrieve settings; the preference store URL and API key are required
    // and startup must fail without them
    let config = Settings::get_config().expect("Failed to load configuration");

    // Run the application until it is stopped
    Application::build(config)?.run_until_stopped().await?;

    Ok(())
}
