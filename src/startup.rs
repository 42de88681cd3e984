use std::{io, net};

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::preference_store::PreferenceStoreClient;
use crate::routes::{health_check, home, preferences, toggle, undo};

/// Application
pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    /// Build an application based on settings
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        // Build the preference store client
        let store = config.preference_store.client();

        // Run the HTTP server and return its data
        let listener = net::TcpListener::bind(format!(
            "{}:{}",
            config.application.app_host, config.application.app_port
        ))?;
        let port = listener.local_addr()?.port();
        let server = run_server(listener, store)?;
        Ok(Self { server, port })
    }

    /// Get application port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run application until it is stopped
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server.await
    }
}

/// Run the HTTP server
pub fn run_server(
    listener: net::TcpListener,
    store: PreferenceStoreClient,
) -> anyhow::Result<Server> {
    // Prepare data to be added to the application context
    let store = web::Data::new(store);

    // Start the HTTP server
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .route("/preferences", web::get().to(preferences))
            .route("/preferences/toggle", web::post().to(toggle))
            .route("/preferences/undo", web::post().to(undo))
            .app_data(store.clone())
    })
    .listen(listener)?
    .run())
}
