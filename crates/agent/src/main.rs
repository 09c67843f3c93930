// SPDX-License-Identifier: Apache-2.0

use edgemesh_settings::AgentSettings;

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let settings = AgentSettings::from_env().expect("invalid agent configuration");
    init_tracing(&settings.log_level);

    let source = Box::new(edgemesh_agent::metrics::StaticMetricsSource::from_env());
    if let Err(err) = edgemesh_agent::run(settings, source).await {
        tracing::error!(error = %err, "agent_exited");
        std::process::exit(1);
    }
}
