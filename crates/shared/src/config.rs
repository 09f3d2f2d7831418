//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger account wiring.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Codes of the accounts the security deposit workflow posts to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// GL code of the tenant security deposit liability.
    #[serde(default = "default_deposit_liability_code")]
    pub deposit_liability_code: String,
    /// GL code of the revenue account receiving forfeited deposits.
    #[serde(default = "default_forfeiture_revenue_code")]
    pub forfeiture_revenue_code: String,
    /// Code of the bank account holding deposit cash.
    #[serde(default = "default_deposit_bank_code")]
    pub deposit_bank_code: String,
    /// Code of the operating bank account.
    #[serde(default = "default_operating_bank_code")]
    pub operating_bank_code: String,
}

fn default_deposit_liability_code() -> String {
    "2100".to_string()
}

fn default_forfeiture_revenue_code() -> String {
    "4300".to_string()
}

fn default_deposit_bank_code() -> String {
    "DEPOSIT".to_string()
}

fn default_operating_bank_code() -> String {
    "OPERATING".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            deposit_liability_code: default_deposit_liability_code(),
            forfeiture_revenue_code: default_forfeiture_revenue_code(),
            deposit_bank_code: default_deposit_bank_code(),
            operating_bank_code: default_operating_bank_code(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RENTLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_defaults() {
        let ledger = LedgerConfig::default();
        assert_eq!(ledger.deposit_liability_code, "2100");
        assert_eq!(ledger.forfeiture_revenue_code, "4300");
        assert_eq!(ledger.deposit_bank_code, "DEPOSIT");
        assert_eq!(ledger.operating_bank_code, "OPERATING");
    }

    #[test]
    fn test_config_from_source_applies_defaults() {
        let config = config::Config::builder()
            .set_override("database.url", "postgres://localhost/rentledger")
            .unwrap()
            .set_override("ledger.forfeiture_revenue_code", "4900")
            .unwrap()
            .build()
            .unwrap();

        let app: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(app.database.url, "postgres://localhost/rentledger");
        assert_eq!(app.database.max_connections, 10);
        assert_eq!(app.database.min_connections, 1);
        assert_eq!(app.ledger.forfeiture_revenue_code, "4900");
        assert_eq!(app.ledger.deposit_liability_code, "2100");
    }
}
