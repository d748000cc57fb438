use cafe_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // dotenv, work directory, logging
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "BeanBox café server starting..."
    );

    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize server: {}", e);
            return Err(e.into());
        }
    };

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
