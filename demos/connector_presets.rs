// Connector presets example for schemaconf
//
// Common settings bundles written as ordinary classes.
//
// Run with: cargo run --example connector_presets

use schemaconf::{settings, Integer, SettingsSchema, Text, Url};
use serde_json::json;

settings! {
    /// Settings required for a connection to an Oracle database
    pub struct OracleConnectorSettings {
        host: Url::field(),
        port: Integer::field(),
        user: Text::field(),
        password: Text::field(),
        sid: Text::field(),
    }
}

impl OracleConnectorSettings {
    /// Connection URL in the form used by SQL toolkits
    pub fn connection_url(&self) -> schemaconf::Result<String> {
        Ok(format!(
            "oracle://{}:{}@{}:{}/{}",
            self.value::<String>("user")?,
            self.value::<String>("password")?,
            self.value::<String>("host")?,
            self.value::<i64>("port")?,
            self.value::<String>("sid")?,
        ))
    }
}

settings! {
    /// Key pair authorization for a cloud storage app
    pub struct BoxAuthorization {
        public_key_id: Text::field(),
        private_key: Text::field(),
        passphrase: Text::field(),
    }
}

settings! {
    /// Application credentials
    pub struct BoxAppSettings {
        client_id: Text::field(),
        client_secret: Text::field(),
        app_auth: BoxAuthorization::field(),
    }
}

settings! {
    /// Everything needed to connect to a cloud storage enterprise account
    pub struct BoxSettings {
        box_app_settings: BoxAppSettings::field(),
        enterprise_id: Text::field(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🔌 schemaconf Connector Presets Example\n");

    let mut oracle = OracleConnectorSettings::new();
    oracle.update(
        &json!({
            "host": "http://db.example.com",
            "port": 1521,
            "user": "scott",
            "password": "tiger",
            "sid": "ORCL",
        }),
        false,
    )?;
    println!("✅ Oracle URL: {}\n", oracle.connection_url()?);

    // A host without a scheme is rejected and the previous value stays
    if let Err(e) = oracle.set("host", "db.example.com") {
        println!("❌ Rejected host: {e}\n");
    }

    let mut cloud = BoxSettings::new();
    println!("📄 Template for a new BoxSettings file:");
    println!("{}\n", serde_json::to_string_pretty(&cloud.to_value())?);

    let result = cloud.update(
        &json!({
            "enterprise_id": "42",
            "box_app_settings": {
                "client_id": "id",
                "client_secret": "secret",
                "app_auth": {"public_key_id": "key", "private_key": "pem"},
            },
        }),
        false,
    );

    if let Err(e) = result {
        let path = e.field_path().unwrap_or_default();
        println!("❌ Incomplete file at '{path}': {}", e.innermost());
    }

    Ok(())
}
