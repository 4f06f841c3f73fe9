use fresh_server::{server, state::release_tag, telemetry, ServerConfig};
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    telemetry::init(config.log_profile)?;

    let span = tracing::info_span!("fresh_server", release = release_tag());
    let result = server::run(config).instrument(span).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "server exited with an error");
    }
    result
}
