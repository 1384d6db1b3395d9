#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use naff_api::middleware::auth::{require_page_data, AppState};
    use naff_backend::ReqwestTransport;
    use naff_ui::{shell, App};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let configPath = if let Some(idx) = args.iter().position(|a| a == "--config") {
        args.get(idx + 1)
            .cloned()
            .unwrap_or_else(|| "config.toml".into())
    } else {
        "config.toml".into()
    };

    let appConfig = naff_api::config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: bind={}:{} backend={}",
        appConfig.server.bind,
        appConfig.server.port,
        appConfig.backend.url
    );
    if !appConfig.identity.is_configured() {
        tracing::warn!("no [identity] section configured, browser sign-in is disabled");
    }

    let appState = AppState::from_config(&appConfig)
        .unwrap_or_else(|e| panic!("failed to build backend client: {e}"));

    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let leptosOptions = conf.leptos_options;
    let addr = format!("{}:{}", appConfig.server.bind, appConfig.server.port);

    let routes = generate_route_list(App);

    let apiRouter = naff_api::api_router(appState.clone());

    // Loads page data (or redirects) before the page is rendered
    let pageDataLayer = axum::middleware::from_fn_with_state(
        appState.clone(),
        require_page_data::<ReqwestTransport>,
    );

    let app = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            {
                let appState = appState.clone();
                move || provide_context(appState.clone())
            },
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions)
        .merge(apiRouter)
        .layer(pageDataLayer)
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
