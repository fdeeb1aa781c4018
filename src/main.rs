use std::sync::Arc;

use anyhow::Context;
use iw_client::{DesireClient, IdGenerator};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Smoke test: checks that the IW services can be bound.
#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install tracing subscriber: {}", e);
    }

    println!("Testing access to IW services...");
    let ids = Arc::new(IdGenerator::new());
    let connected = DesireClient::connect_from_env(ids)
        .await
        .context("Could not reach IW services");

    match connected {
        Ok(client) => {
            tracing::info!("Bound IW runtime at {}", client.config().master_uri);
            println!("IW services ok.");
        }
        Err(e) => {
            println!("Something went wrong: {:#}", e);
            std::process::exit(-1);
        }
    }
}
