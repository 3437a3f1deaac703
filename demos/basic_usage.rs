// Basic usage example for schemaconf
//
// Run with: cargo run --example basic_usage

use schemaconf::{
    settings, Boolean, Email, Float, Integer, PositiveInteger, SettingsFile, SettingsSchema, Text,
};
use serde_json::json;

settings! {
    /// Network section
    pub struct Network {
        port: PositiveInteger::field().optional().with_default(8080),
        timeout_secs: Float::field().optional().with_default(2.5),
    }
}

settings! {
    /// Application settings
    pub struct AppSettings {
        name: Text::field(),
        admin: Email::field().optional(),
        debug: Boolean::field().optional(),
        retries: Integer::field().optional().with_default(3),
        network: Network::field(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("📦 schemaconf Basic Usage Example\n");

    let file = SettingsFile::builder("schemaconf-demo")
        .config_dir("./example_config")
        .build();

    let mut settings = AppSettings::new();

    // Write a template on first run, then load it back
    if !file.path().exists() {
        settings.update(&json!({"name": "demo", "network": {}}), false)?;
        settings.save_file(&file)?;
        println!("📝 Wrote template to {}", file.path().display());
    }
    settings.load_file(&file)?;
    println!("✅ Loaded settings:");
    println!("{}\n", serde_json::to_string_pretty(&settings.to_value())?);

    // Single field updates are validated
    println!("🔧 Setting debug = true...");
    settings.set("debug", true)?;

    println!("🔧 Setting network.port = 0...");
    if let Err(e) = settings.nested_mut("network")?.set("port", 0) {
        println!("❌ {e}");
    }

    // Partial update leaves everything else alone
    settings.update(&json!({"retries": 5}), true)?;
    println!("\n✅ Updated settings:");
    println!("{}\n", serde_json::to_string_pretty(&settings.to_value())?);

    settings.save_file(&file)?;
    println!("💾 Saved to {}", file.path().display());

    Ok(())
}
