use reqwest::{Client, redirect::Policy};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use workhours::{AppState, Config, build_router, models::users::User, services::users};

use crate::common::TestDb;

/// HTTP test application wrapper
///
/// Runs the full router on a random port against its own [`TestDb`].
/// The bootstrap admin from the default config is created up front.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client with a cookie jar and redirects disabled
    pub client: Client,
    pub config: Config,
    pub admin: User,
    pub test_db: TestDb,
}

impl TestApp {
    /// Create a new HTTP test app with server on random port
    ///
    /// # How it works:
    /// 1. Opens a migrated SQLite file named after the test
    /// 2. Creates the bootstrap admin account
    /// 3. Binds to port 0 (OS assigns random available port)
    /// 4. Starts the server in a background task
    /// 5. Creates a reqwest client configured for testing
    pub async fn new(test_name: &str) -> Self {
        let test_db = TestDb::new(test_name).await;
        let config = Config::default();

        let admin = {
            let mut conn = test_db.get_connection().await;
            users::ensure_bootstrap_admin(&mut conn, &config.bootstrap)
                .await
                .expect("Failed to bootstrap admin")
                .expect("Fresh database should get an admin")
        };

        let app = build_router(AppState::new(test_db.pool.clone(), config.clone()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address,
            client: Self::new_client(),
            config,
            admin,
            test_db,
        }
    }

    /// A fresh client with its own cookie jar, for acting as a second user
    pub fn new_client() -> Client {
        Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Get the full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn admin_password(&self) -> String {
        self.config.bootstrap.admin_password.expose_secret().to_string()
    }
}
