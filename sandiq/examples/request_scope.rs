//! Per-request child containers over a shared application container.
//!
//! Run with `RUST_LOG=sandiq_container=trace cargo run --example request_scope`.

use std::sync::Arc;

use sandiq::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

#[derive(Clone)]
struct Config {
    database_url: String,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserService {
    db: Database,
    user: String,
}

impl UserService {
    fn profile(&self) -> String {
        self.db
            .query(&format!("SELECT * FROM users WHERE name = '{}'", self.user))
    }
}

struct CoreModule;

impl Module for CoreModule {
    fn register(&self, container: &Container) {
        let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger);

        container
            .bind_value(
                "config",
                Config {
                    database_url: "postgres://localhost/app".to_string(),
                },
            )
            .bind_value("logger", logger)
            .bind("db", |inject: &Inject<'_>| {
                let config: Config = inject.get("config")?;
                Ok(Database {
                    url: config.database_url,
                    logger: inject.get("logger")?,
                })
            })
            .bind("users", |inject: &Inject<'_>| {
                Ok(UserService {
                    db: inject.get("db")?,
                    user: inject.get("request.user")?,
                })
            });
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = Container::new();
    app.load(&CoreModule);
    info!(?app, "Application container ready");

    for user in ["alice", "bob"] {
        let request = app.create_child();
        request.bind_value("request.user", user.to_string());

        let users: UserService = request.get("users")?;
        info!(user, result = %users.profile(), "Handled request");
    }

    // Request bindings never reach the application container
    if let Err(err) = app.get::<UserService>("users") {
        info!(missing = err.is_binding_not_found(), %err, "No request in scope");
    }

    Ok(())
}
