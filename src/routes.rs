use crate::{
    api::{attendance, employee, leave_request, message, payroll, profile},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};

type Limit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route limiter configs. Built once so all workers share the same buckets.
pub struct RateLimits {
    login: Limit,
    signup: Limit,
    protected: Limit,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limit("login", config.rate_login_per_min)?,
            signup: build_limit("signup", config.rate_signup_per_min)?,
            protected: build_limit("protected", config.rate_protected_per_min)?,
        })
    }
}

fn build_limit(name: &str, requests_per_min: u32) -> Result<Limit> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid {name} rate limit: {requests_per_min} per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limits: &RateLimits) {
    cfg.service(
        web::scope(api_prefix)
            // Public routes
            .service(
                web::resource("/signup")
                    .wrap(Governor::new(&limits.signup))
                    .route(web::post().to(handlers::signup)),
            )
            .service(web::resource("/verify").route(web::post().to(handlers::verify)))
            .service(
                web::resource("/verify/resend")
                    .wrap(Governor::new(&limits.signup))
                    .route(web::post().to(handlers::resend_verification)),
            )
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&limits.login))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/reset-password")
                    .wrap(Governor::new(&limits.login))
                    .route(web::post().to(handlers::reset_password)),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware)) // authentication
                    .wrap(Governor::new(&limits.protected)) // rate limiting
                    .service(
                        web::scope("/attendance")
                            // /attendance
                            .service(
                                web::resource("")
                                    .route(web::get().to(attendance::list_attendance)),
                            )
                            .service(
                                web::resource("/checkin")
                                    .route(web::post().to(attendance::check_in)),
                            )
                            .service(
                                web::resource("/checkout")
                                    .route(web::put().to(attendance::check_out)),
                            )
                            .service(
                                web::resource("/mark-absent")
                                    .route(web::post().to(attendance::mark_absent)),
                            )
                            .service(
                                web::resource("/summary")
                                    .route(web::get().to(attendance::attendance_summary)),
                            ),
                    )
                    .service(
                        web::scope("/leaves")
                            // /leaves
                            .service(
                                web::resource("")
                                    .route(web::get().to(leave_request::leave_list))
                                    .route(web::post().to(leave_request::create_leave)),
                            )
                            // /leaves/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(leave_request::get_leave))
                                    .route(web::put().to(leave_request::decide_leave)),
                            ),
                    )
                    .service(
                        web::scope("/users")
                            .service(web::resource("").route(web::get().to(employee::list_users)))
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(employee::get_user))
                                    .route(web::put().to(employee::update_user)),
                            ),
                    )
                    .service(web::resource("/directory").route(web::get().to(employee::directory)))
                    .service(web::resource("/payroll").route(web::get().to(payroll::list_payroll)))
                    .service(
                        web::resource("/profile")
                            .route(web::get().to(profile::get_profile))
                            .route(web::put().to(profile::update_profile)),
                    )
                    .service(web::resource("/upload").route(web::post().to(profile::upload)))
                    .service(
                        web::resource("/messages")
                            .route(web::get().to(message::inbox))
                            .route(web::post().to(message::send_message)),
                    ),
            ),
    );
}
