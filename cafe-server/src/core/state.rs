//! Shared server state

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::analytics::AnalyticsAggregator;
use crate::auth::{CredentialStore, JwtService, StaticCredentialStore};
use crate::core::{Config, Result};
use crate::db::Storage;
use crate::db::repository::{CustomerRepository, MenuRepository, SettingsRepository};
use crate::orders::OrdersManager;
use crate::services::{
    BrevoNotifier, CustomerVerifier, DisabledGateway, HttpMirror, LogNotifier, Mirror,
    MirrorService, MirrorWorker, Notifier, PaymentGateway, RazorpayGateway,
};
use crate::utils::time::parse_timezone;

/// Providers the server talks to
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub payments: Arc<dyn PaymentGateway>,
    pub credentials: Arc<dyn CredentialStore>,
    /// `None` disables mirroring
    pub mirror: Option<Arc<dyn Mirror>>,
}

impl Collaborators {
    /// Real providers where configured, log-only / disabled fallbacks otherwise
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();

        let notifier: Arc<dyn Notifier> = match &config.brevo_api_key {
            Some(key) => Arc::new(BrevoNotifier::new(
                key.clone(),
                config.email_sender_name.clone(),
                config.email_sender_address.clone(),
                timeout,
            )?),
            None => {
                tracing::warn!("BREVO_API_KEY not set, emails will only be logged");
                Arc::new(LogNotifier)
            }
        };

        let payments: Arc<dyn PaymentGateway> =
            match (&config.razorpay_key_id, &config.razorpay_key_secret) {
                (Some(id), Some(secret)) => {
                    Arc::new(RazorpayGateway::new(id.clone(), secret.clone(), timeout)?)
                }
                _ => {
                    tracing::warn!("Razorpay keys not set, online payments are disabled");
                    Arc::new(DisabledGateway)
                }
            };

        let mirror: Option<Arc<dyn Mirror>> = match &config.mirror_url {
            Some(url) => Some(Arc::new(HttpMirror::new(url.clone(), timeout)?) as Arc<dyn Mirror>),
            None => None,
        };

        Ok(Self {
            notifier,
            payments,
            credentials: Arc::new(StaticCredentialStore::from_config(config)?),
            mirror,
        })
    }
}

/// Cloneable handle to every service (all fields are cheap clones)
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: Storage,
    pub menu: MenuRepository,
    pub settings: SettingsRepository,
    pub orders: OrdersManager,
    pub analytics: AnalyticsAggregator,
    pub verifier: CustomerVerifier,
    pub jwt_service: Arc<JwtService>,
    pub credentials: Arc<dyn CredentialStore>,
    pub payments: Arc<dyn PaymentGateway>,
    pub mirror: MirrorService,
    /// Cancelled on shutdown; background workers watch it
    pub shutdown: CancellationToken,
    mirror_worker: Arc<Mutex<Option<MirrorWorker>>>,
}

impl ServerState {
    /// Open the database and build every service from configuration
    ///
    /// 1. Work directory (`database/`, `logs/`)
    /// 2. redb file at `work_dir/database/cafe.redb`, sample menu on first start
    /// 3. Providers (email, payments, mirror, admin credentials)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.jwt.require_configured_secret(config.is_production())?;
        config.ensure_work_dir_structure()?;

        let storage = Storage::open(config.database_path())?;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        let collaborators = Collaborators::from_config(config)?;
        let state = Self::with_collaborators(config.clone(), storage, collaborators);

        let seeded = state.menu.seed_if_empty()?;
        if seeded > 0 {
            tracing::info!(items = seeded, "Seeded sample menu");
        }

        Ok(state)
    }

    /// Assemble services around an open store and the given providers
    pub fn with_collaborators(config: Config, storage: Storage, collaborators: Collaborators) -> Self {
        let tz = parse_timezone(&config.business_timezone);

        let (mirror, mirror_worker) = match collaborators.mirror {
            Some(remote) => {
                let (service, worker) = MirrorService::new(remote, config.mirror_max_retries);
                (service, Some(worker))
            }
            None => (MirrorService::disabled(), None),
        };

        let analytics = AnalyticsAggregator::new(storage.clone(), tz);
        let orders = OrdersManager::new(
            storage.clone(),
            analytics.clone(),
            collaborators.notifier.clone(),
            mirror.clone(),
            config.order_gate_scope,
        );
        let verifier = CustomerVerifier::new(
            CustomerRepository::new(storage.clone()),
            collaborators.notifier,
            mirror.clone(),
            config.customer_otp_ttl_secs,
        );

        Self {
            menu: MenuRepository::new(storage.clone()),
            settings: SettingsRepository::new(storage.clone()),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            credentials: collaborators.credentials,
            payments: collaborators.payments,
            shutdown: CancellationToken::new(),
            mirror_worker: Arc::new(Mutex::new(mirror_worker)),
            config,
            storage,
            orders,
            analytics,
            verifier,
            mirror,
        }
    }

    /// Spawn background workers (mirror queue). Later calls do nothing.
    pub fn start_background_tasks(&self) {
        let worker = self
            .mirror_worker
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(worker) = worker {
            tokio::spawn(worker.run(self.shutdown.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ServerError;

    #[tokio::test]
    async fn test_production_requires_jwt_secret() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_overrides(dir.path().to_str().unwrap(), 0);
        config.environment = "production".to_string();
        config.jwt.secret_generated = true;

        let result = ServerState::initialize(&config).await;
        assert!(matches!(result, Err(ServerError::Jwt(_))));
        assert!(!config.database_path().exists());
    }
}
