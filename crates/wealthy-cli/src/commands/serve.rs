//! Server command implementation

use std::sync::Arc;

use anyhow::Result;
use wealthy_core::Pipeline;
use wealthy_server::ServerConfig;

pub async fn cmd_serve(
    pipeline: Arc<Pipeline>,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Wealthy Ways web server...");
    println!("   Models: {}", pipeline.config().models.dir.display());
    println!("   Fingerprint: {}", pipeline.bundle().short_fingerprint());
    println!("   Listening: http://{}:{}", host, port);
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig { allowed_origins };
    wealthy_server::serve(pipeline, host, port, config).await?;

    Ok(())
}
