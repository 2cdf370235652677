use actix_web::web::{self, Data};
use sqlx::SqlitePool;

use crate::{
    auth::jwt::SessionIssuer, config::Config, error::ApiError, mail::MailerSlot,
    uploads::UploadStore, utils::email_registry::EmailRegistry,
};

/// Process-wide singletons shared by every worker.
///
/// Built once before the server starts; each worker registers clones of the
/// same `Data` handles, so caches and the mailer slot are shared.
#[derive(Clone)]
pub struct Services {
    pub pool: Data<SqlitePool>,
    pub config: Data<Config>,
    pub sessions: Data<SessionIssuer>,
    pub mailer: Data<MailerSlot>,
    pub registry: Data<EmailRegistry>,
    pub uploads: Data<UploadStore>,
}

impl Services {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let sessions = SessionIssuer::new(&config.jwt_secret, config.session_ttl);
        let uploads = UploadStore::new(&config.upload_dir, &config.public_base_url);

        Self {
            pool: Data::new(pool),
            sessions: Data::new(sessions),
            mailer: Data::new(MailerSlot::new()),
            registry: Data::new(EmailRegistry::new()),
            uploads: Data::new(uploads),
            config: Data::new(config),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.pool.clone())
            .app_data(self.config.clone())
            .app_data(self.sessions.clone())
            .app_data(self.mailer.clone())
            .app_data(self.registry.clone())
            .app_data(self.uploads.clone())
            .app_data(web::PayloadConfig::new(self.config.max_upload_bytes))
            .app_data(web::JsonConfig::default().error_handler(|e, _| rejected(e)))
            .app_data(web::QueryConfig::default().error_handler(|e, _| rejected(e)))
            .app_data(web::PathConfig::default().error_handler(|e, _| rejected(e)));
    }
}

/// Extractor failures answer with the same JSON error body as handlers.
fn rejected(e: impl std::fmt::Display) -> actix_web::Error {
    ApiError::invalid_input(e.to_string()).into()
}
