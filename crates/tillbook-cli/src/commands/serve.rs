//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use tillbook_core::config::ServerSection;
use tillbook_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, server: &ServerSection) -> Result<()> {
    println!("🚀 Starting Tillbook web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", server.host, server.port);
    if let Some(dir) = &server.static_dir {
        println!("   Static files: {}", dir.display());
    }

    if !server.require_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        println!(
            "   🔒 Authentication: sessions ({}h lifetime)",
            server.session_ttl_hours
        );
        if !server.allowed_origins.is_empty() {
            println!("   🌐 CORS origins: {}", server.allowed_origins.join(", "));
        }
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let static_dir = server
        .static_dir
        .as_deref()
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;

    tillbook_server::serve_with_config(
        db,
        &server.host,
        server.port,
        static_dir,
        ServerConfig::from(server),
    )
    .await?;

    Ok(())
}
