//! CLI `memory` commands: inspect and edit a user's memory document.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::ArcadiaConfig;
use crate::memory::MemoryStore;

fn open(config: &ArcadiaConfig, user: Option<&str>) -> Result<MemoryStore> {
    let user = user.unwrap_or(&config.storage.default_user);
    let dir = config.resolved_memory_dir();
    MemoryStore::open(&dir, user)
        .with_context(|| format!("failed to open memory store in {}", dir.display()))
}

/// Print the whole document.
pub fn show(config: &ArcadiaConfig, user: Option<&str>) -> Result<()> {
    let store = open(config, user)?;
    println!("{}", serde_json::to_string_pretty(store.document())?);
    if !store.is_enabled() {
        eprintln!("(memory is disabled for {})", store.user_id());
    }
    Ok(())
}

pub fn get(config: &ArcadiaConfig, user: Option<&str>, path: &str) -> Result<()> {
    let store = open(config, user)?;
    match store.get(path, Value::Null) {
        Value::Null => println!("(not set)"),
        value => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

/// `raw` is parsed as JSON; anything that does not parse is stored as a string.
pub fn set(config: &ArcadiaConfig, user: Option<&str>, path: &str, raw: &str) -> Result<()> {
    let mut store = open(config, user)?;
    let value = parse_value(raw);
    if store.update(path, value)? {
        println!("Updated {path}");
    } else {
        println!("Memory is disabled; run `arcadia memory enable` first.");
    }
    Ok(())
}

pub fn delete(config: &ArcadiaConfig, user: Option<&str>, key: &str) -> Result<()> {
    let mut store = open(config, user)?;
    if store.delete(key)? {
        println!("Deleted {key}");
    } else {
        println!("{key} not found under user or conversations");
    }
    Ok(())
}

pub fn clear(config: &ArcadiaConfig, user: Option<&str>) -> Result<()> {
    let mut store = open(config, user)?;
    store.clear()?;
    println!("Memory cleared for {}", store.user_id());
    Ok(())
}

pub fn set_enabled(config: &ArcadiaConfig, user: Option<&str>, enabled: bool) -> Result<()> {
    let mut store = open(config, user)?;
    store.set_enabled(enabled)?;
    println!(
        "Memory {} for {}",
        if enabled { "enabled" } else { "disabled" },
        store.user_id()
    );
    Ok(())
}

/// Print the change log, oldest first.
pub fn log(config: &ArcadiaConfig, user: Option<&str>) -> Result<()> {
    let store = open(config, user)?;
    let entries = store.log().entries();
    if entries.is_empty() {
        println!("No changes recorded.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  {:<7} {:<30} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.action,
            entry.key,
            entry.value_preview
        );
    }
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
