use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Which customer orders the "not accepting orders" switch blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderGateScope {
    /// Only online-paid orders are refused; cash at the counter still works
    Online,
    /// Every customer order is refused
    All,
}

impl OrderGateScope {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "online" => Self::Online,
            other => {
                tracing::warn!("Unknown ORDER_GATE_SCOPE '{}', using 'online'", other);
                Self::Online
            }
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database and log directory |
/// | HTTP_PORT | 5000 | HTTP port |
/// | ENVIRONMENT | development | development \| production |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_JSON | false | JSON log lines |
/// | BUSINESS_TIMEZONE | UTC | IANA zone for analytics days |
/// | ORDER_GATE_SCOPE | online | online \| all |
/// | ADMIN_EMAIL | admin@beanbox.com | staff login |
/// | ADMIN_PASSWORD_HASH | – | argon2 PHC string |
/// | ADMIN_PASSWORD | – | plain password, hashed at startup (development) |
/// | JWT_SECRET | random in development | HS256 key, >= 32 chars |
/// | JWT_EXPIRATION_MINUTES | 720 | staff token lifetime |
/// | RAZORPAY_KEY_ID / RAZORPAY_KEY_SECRET | – | payment gateway |
/// | BREVO_API_KEY | – | transactional email |
/// | EMAIL_SENDER_NAME / EMAIL_SENDER_ADDRESS | BeanBox Café / noreply@beanbox.com | email sender |
/// | MIRROR_URL | – | base URL of the external mirror |
/// | MIRROR_MAX_RETRIES | 5 | attempts per mirrored record |
/// | REQUEST_TIMEOUT_MS | 10000 | outbound HTTP timeout |
/// | CUSTOMER_OTP_TTL_SECS | 300 | customer verification code lifetime |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/beanbox HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,

    pub business_timezone: String,
    pub order_gate_scope: OrderGateScope,

    pub admin_email: String,
    pub admin_password_hash: Option<String>,
    pub admin_password: Option<String>,

    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,

    pub brevo_api_key: Option<String>,
    pub email_sender_name: String,
    pub email_sender_address: String,

    pub mirror_url: Option<String>,
    pub mirror_max_retries: u32,

    /// Outbound HTTP timeout (milliseconds)
    pub request_timeout_ms: u64,
    pub customer_otp_ttl_secs: i64,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),

            business_timezone: std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".into()),
            order_gate_scope: std::env::var("ORDER_GATE_SCOPE")
                .map(|v| OrderGateScope::from_env_value(&v))
                .unwrap_or(OrderGateScope::Online),

            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@beanbox.com".into()),
            admin_password_hash: env_opt("ADMIN_PASSWORD_HASH"),
            admin_password: env_opt("ADMIN_PASSWORD"),

            razorpay_key_id: env_opt("RAZORPAY_KEY_ID"),
            razorpay_key_secret: env_opt("RAZORPAY_KEY_SECRET"),

            brevo_api_key: env_opt("BREVO_API_KEY"),
            email_sender_name: std::env::var("EMAIL_SENDER_NAME")
                .unwrap_or_else(|_| "BeanBox Café".into()),
            email_sender_address: std::env::var("EMAIL_SENDER_ADDRESS")
                .unwrap_or_else(|_| "noreply@beanbox.com".into()),

            mirror_url: env_opt("MIRROR_URL"),
            mirror_max_retries: std::env::var("MIRROR_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            customer_otp_ttl_secs: std::env::var("CUSTOMER_OTP_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Override work dir and port (tests)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("cafe.redb")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create `work_dir/{database,logs}` if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_scope_parse() {
        assert_eq!(OrderGateScope::from_env_value("all"), OrderGateScope::All);
        assert_eq!(OrderGateScope::from_env_value(" ALL "), OrderGateScope::All);
        assert_eq!(OrderGateScope::from_env_value("online"), OrderGateScope::Online);
        assert_eq!(OrderGateScope::from_env_value("bogus"), OrderGateScope::Online);
    }

    #[test]
    fn test_paths() {
        let config = Config::with_overrides("/tmp/beanbox", 8080);
        assert_eq!(config.http_port, 8080);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/beanbox/database/cafe.redb")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/beanbox/logs"));
    }
}
