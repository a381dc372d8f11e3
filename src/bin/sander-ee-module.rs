//! Module entry point. The host launches this with the socket path to serve on.

use std::sync::Arc;

use sander_ee::{init_tracing, register_models, Module, Registry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let socket = std::env::args()
        .nth(1)
        .ok_or("usage: sander-ee-module <socket-path>")?;

    let mut registry = Registry::new();
    register_models(&mut registry);
    let module = Arc::new(Module::new(registry));

    let result = tokio::select! {
        r = Arc::clone(&module).serve(&socket) => r,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    };

    module.shutdown().await;
    #[cfg(unix)]
    {
        let _ = std::fs::remove_file(&socket);
    }

    if let Err(e) = &result {
        error!(error = %e, "module stopped");
    }
    result?;
    Ok(())
}
