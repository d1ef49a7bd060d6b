use anyhow::Result;

use crate::catalog::CatalogClient;

/// Print GGUF repositories from the catalog.
pub async fn list(author: &str, search: &str, limit: usize) -> Result<()> {
    let client = CatalogClient::new()?;
    let models = client.list_gguf_models(author, search).await?;

    if models.is_empty() {
        println!("No GGUF models found.");
        return Ok(());
    }

    println!("{:<60} {:>10} {:>6}  {}", "MODEL", "DOWNLOADS", "LIKES", "UPDATED");
    for model in models.iter().take(limit) {
        println!(
            "{:<60} {:>10} {:>6}  {}",
            model.id, model.downloads, model.likes, model.last_modified
        );
    }
    if models.len() > limit {
        println!("... {} more", models.len() - limit);
    }
    Ok(())
}

/// Print the `.gguf` files of one repository with their download URLs.
pub async fn files(model_id: &str) -> Result<()> {
    let client = CatalogClient::new()?;
    let files = client.list_model_files(model_id).await?;

    if files.is_empty() {
        println!("No .gguf files in {model_id}.");
        return Ok(());
    }

    for file in &files {
        println!("{file}");
        println!("  {}", client.download_url(model_id, file));
    }
    println!();
    println!("Download one with: arcadia model download --url <URL>");
    Ok(())
}
