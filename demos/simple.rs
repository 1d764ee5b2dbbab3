//! Decoding a Steam app manifest.
//!
//! Run with: cargo run --example simple

use serde::Deserialize;
use serde_vdf::{from_str, Value};
use std::collections::HashMap;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Depot {
    manifest: u64,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct AppState {
    appid: u32,
    name: String,
    #[serde(rename = "InstalledDepots")]
    installed_depots: HashMap<String, Depot>,
    #[serde(rename = "UserConfig")]
    user_config: Option<HashMap<String, String>>,
}

const MANIFEST: &str = r#"{
	"appid"		"440"
	"name"		"Team Fortress 2"
	"StateFlags"		"4"
	"InstalledDepots"
	{
		"441"
		{
			"manifest"		"7707612755105232421"
			"size"		"27039879806"
		}
	}
	"UserConfig"
	{
		"language"		"english"
	}
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let state: AppState = from_str(MANIFEST)?;
    println!("{} ({})", state.name, state.appid);
    for (id, depot) in &state.installed_depots {
        println!("  depot {}: manifest {} ({} bytes)", id, depot.manifest, depot.size);
    }
    if let Some(config) = &state.user_config {
        println!("  language: {}", config.get("language").map_or("?", String::as_str));
    }

    // Same document without a destination type
    let value: Value = from_str(MANIFEST)?;
    println!("\n{}", value);

    Ok(())
}
