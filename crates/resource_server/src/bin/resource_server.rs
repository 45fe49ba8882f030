use resource_server::{
    configs::settings::Settings,
    core::errors::ApplicationResult,
    logger, routes,
};

#[actix_web::main]
async fn main() -> ApplicationResult<()> {
    #[allow(clippy::expect_used)]
    let conf = Settings::new().expect("Unable to construct application configuration");
    #[allow(clippy::expect_used)]
    conf.validate()
        .expect("Failed to validate resource server configuration");

    let _guard = logger::setup(&conf.log);

    #[allow(clippy::expect_used)]
    let state = routes::AppState::new(conf.clone())
        .await
        .expect("Failed to initialise application state");

    logger::info!(host = %conf.server.host, port = conf.server.port, "Starting resource server");

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(routes::app::Payments::server(state.clone()))
            .service(routes::app::Health::server(state.clone()))
    })
    .workers(conf.server.workers)
    .bind((conf.server.host.clone(), conf.server.port))?
    .run()
    .await?;

    Ok(())
}
