use std::env;

use crate::error::AppError;

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production database (Postgres, configured from the environment)
    Prod,
    /// Test database (in-memory SQLite, fully isolated per connection)
    Test,
}

/// Builds a database URL based on the profile.
///
/// Prod honors `DATABASE_URL` verbatim when set, otherwise assembles a
/// Postgres URL from `POSTGRES_HOST` / `POSTGRES_PORT` / `POSTGRES_DB` /
/// `POSTGRES_USER` / `POSTGRES_PASSWORD`.
pub fn db_url(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => {
            if let Ok(url) = env::var("DATABASE_URL") {
                return Ok(url);
            }
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = must_var("POSTGRES_DB")?;
            let username = must_var("POSTGRES_USER")?;
            let password = must_var("POSTGRES_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbProfile::Test => Ok("sqlite::memory:".to_string()),
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_is_in_memory_sqlite() {
        assert_eq!(db_url(DbProfile::Test).unwrap(), "sqlite::memory:");
    }

    #[test]
    fn prod_profile_requires_credentials() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("POSTGRES_DB");
        let result = db_url(DbProfile::Prod);
        assert!(result.is_err());
    }
}
