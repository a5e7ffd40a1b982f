//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the enrollment artifact directory exists before serving traffic.
pub async fn ensure_env(artifact_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(artifact_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {artifact_dir}: {e}"))?;
    Ok(())
}
