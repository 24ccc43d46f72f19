use anyhow::Result;

/// Database connection settings, read from the environment (a .env file is
/// loaded by main before this runs).
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub max_connections: usize,
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = std::env::var("DB_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse::<u16>()?;
        let user = std::env::var("DB_USER").unwrap_or_else(|_| "binanceuser".to_string());
        let password = std::env::var("DB_PASSWORD").unwrap_or_else(|_| "binancepass".to_string());
        let dbname = std::env::var("DB_NAME").unwrap_or_else(|_| "binancedb".to_string());

        Ok(Self {
            host,
            port,
            user,
            password,
            dbname,
            max_connections: 10,
        })
    }
}
