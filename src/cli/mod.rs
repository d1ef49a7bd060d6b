pub mod catalog;
pub mod chat;
pub mod memory;

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::config::ArcadiaConfig;

/// Download the configured GGUF model (or `url_override`) into the models directory.
/// Skips the download if the file is already present.
pub async fn model_download(config: &ArcadiaConfig, url_override: Option<&str>) -> Result<()> {
    let model_path = config.resolved_model_path();
    if let Some(dir) = model_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create models dir: {}", dir.display()))?;
    }

    if model_path.exists() {
        println!("Model already exists at {}", model_path.display());
        return Ok(());
    }

    let url = url_override.unwrap_or(&config.llm.model_url);
    println!("Downloading {} ...", config.llm.model_file);
    println!("This can take a few minutes (~3.8 GB).");
    download_file(url, &model_path).await?;
    println!("Model saved to {}", model_path.display());
    println!("Point your local runtime at this file, then run `arcadia chat`.");
    Ok(())
}

/// Report whether the model file is present and how large it is.
pub fn model_status(config: &ArcadiaConfig) -> Result<()> {
    let model_path = config.resolved_model_path();
    match std::fs::metadata(&model_path) {
        Ok(meta) => {
            println!("Model:    {}", model_path.display());
            println!("Size:     {}", format_bytes(meta.len()));
        }
        Err(_) => {
            println!("Model:    not found at {}", model_path.display());
            println!("Run `arcadia model download` to fetch it.");
        }
    }
    println!("Runtime:  {} (model `{}`)", config.llm.base_url, config.llm.model);
    Ok(())
}

/// Stream a file from a URL with a progress bar. Uses atomic write (tmp + rename).
pub async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("error reading response")?;
        file.write_all(&chunk)
            .await
            .context("error writing to file")?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    tracing::info!(path = %dest.display(), "download complete");
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_bytes(4 * 1024 * 1024 * 1024), "4.00 GB");
    }
}
