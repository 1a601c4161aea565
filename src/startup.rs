use actix_web::{web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::JwtKeys;
use crate::configuration::JwtSettings;
use crate::logger::RequestLogger;
use crate::middleware::JwtMiddleware;
use crate::routes::{create_user, get_salary, health_check, login};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_keys: JwtKeys,
    jwt_settings: JwtSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_keys_data = web::Data::new(jwt_keys.clone());
    let jwt_settings_data = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)

            // Shared state: pool, key material, expiry policy
            .app_data(connection.clone())
            .app_data(jwt_keys_data.clone())
            .app_data(jwt_settings_data.clone())

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/user/create", web::post().to(create_user))
            .route("/user/login", web::post().to(login))

            // Protected routes (require a valid access token)
            .service(
                web::scope("/user/salary")
                    .wrap(JwtMiddleware::require_access(jwt_keys.clone()))
                    .route("/get", web::get().to(get_salary)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
