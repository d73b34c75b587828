use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_check_in_per_min: u32,

    pub api_prefix: String,

    /// IANA id used for the check-in window and "today"
    pub time_zone: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,
            rate_check_in_per_min: parse_or("RATE_CHECK_IN_PER_MIN", 30)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            time_zone: env::var("ATTENDANCE_TIME_ZONE")
                .unwrap_or_else(|_| "Africa/Cairo".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parse_or(key: &str, default: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a whole number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Process env is shared between test threads; each test uses its own keys.

    #[test]
    fn parse_or_uses_default_when_unset() {
        assert_eq!(parse_or("ATTENDANCE_TEST_UNSET_RATE", 30).unwrap(), 30);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        unsafe { env::set_var("ATTENDANCE_TEST_BAD_RATE", "lots") };
        let err = parse_or("ATTENDANCE_TEST_BAD_RATE", 30).unwrap_err();
        assert!(err.to_string().contains("ATTENDANCE_TEST_BAD_RATE"));
    }

    #[test]
    fn required_names_the_missing_key() {
        let err = required("ATTENDANCE_TEST_MISSING_KEY").unwrap_err();
        assert_eq!(err.to_string(), "ATTENDANCE_TEST_MISSING_KEY must be set");
    }
}
