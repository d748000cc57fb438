//! BeanBox café ordering server
//!
//! # Module layout
//!
//! ```text
//! cafe-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # JWT, staff middleware, admin credentials
//! ├── db/            # redb record store + repositories (menu, customers, settings)
//! ├── orders/        # order lifecycle manager
//! ├── analytics/     # daily sales rollups
//! ├── services/      # payment gateway, email notifier, mirror worker
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation, business time
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::Storage;
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Security event logging under target `security`
///
/// `security_log!(WARN, "login_failed", email = %email)`
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}

/// Load `.env`, prepare the work directory and start logging
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.logs_dir();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        log_dir.to_str(),
    );

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____                   ____
   / __ )___  ____ _____  / __ )____  _  __
  / __  / _ \/ __ `/ __ \/ __  / __ \| |/_/
 / /_/ /  __/ /_/ / / / / /_/ / /_/ />  <
/_____/\___/\__,_/_/ /_/_____/\____/_/|_|
              café ordering server
    "#
    );
}
