use std::net::TcpListener;
use shift_api::auth::JwtKeys;
use shift_api::configuration::get_configuration;
use shift_api::startup::run;
use shift_api::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // Key material is loaded once and shared read-only for the process
    // lifetime.
    let jwt_keys = JwtKeys::load(&configuration.jwt).map_err(|e| {
        tracing::error!("Failed to load JWT key material: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "JWT key error")
    })?;
    tracing::info!("JWT key pair loaded");

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let address = format!("127.0.0.1:{}", configuration.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, pool, jwt_keys, configuration.jwt)?;
    tracing::info!("Server started successfully");

    server.await
}
