//! Builds one sander outside the host and prints its geometry.
//!
//! `sander-ee-cli [config.json]` reads a resource config (defaults to `{"name": "foo"}`).

use sander_ee::{init_tracing, Extra, Gripper, ResourceConfig, SanderEe};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let conf = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str::<ResourceConfig>(&std::fs::read_to_string(path)?)?,
        None => ResourceConfig::named("foo"),
    };

    let sander = SanderEe::new(&conf)?;
    let geometries = sander.geometries(&Extra::new()).await?;
    println!("{}", serde_json::to_string_pretty(&*geometries)?);

    sander.close().await?;
    Ok(())
}
