use std::sync::Arc;

use crate::{
    config::Config,
    error, info,
    server::{AppState, start_api_server},
    warning,
};

pub async fn serve(config: Arc<Config>, open: bool) {
    if let Err(e) = config.ensure_oauth() {
        error!("Cannot start the login flow: {}", e);
    }

    let state = match AppState::new(Arc::clone(&config)) {
        Ok(state) => state,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };

    let login_url = format!("http://{}/login", config.server_address);
    info!("Log in at {}", login_url);

    if open {
        // give the listener a moment before the browser hits it
        let url = login_url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            if webbrowser::open(&url).is_err() {
                warning!(
                    "Failed to open browser. Please navigate to the following URL manually:\n{}",
                    url
                )
            }
        });
    }

    if let Err(e) = start_api_server(state).await {
        error!("Server stopped: {}", e);
    }
}
