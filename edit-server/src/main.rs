use edit_server::{Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, config, logging)
    let config = setup_environment()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Edit server starting..."
    );

    // 2. Refuse to start without shop credentials
    config.validate()?;

    // 3. Wire the reconciliation service to the shop
    let state = ServerState::initialize(&config)?;

    // 4. Serve until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
