use meshlink_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (state, router) = meshlink_api::setup::initialize_app(config.clone()).await?;

    meshlink_api::setup::server::start_server(&config, router, state).await?;

    Ok(())
}
