use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    let check_in_limiter = Arc::new(build_limiter(config.rate_check_in_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    .app_data(web::QueryConfig::default().error_handler(attendance::query_error))
                    .app_data(web::PathConfig::default().error_handler(attendance::path_error))
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::paginated_attendance)),
                    )
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in")
                            .wrap(check_in_limiter)
                            .route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/weekly/{employee_id}
                    .service(
                        web::resource("/weekly/{employee_id}")
                            .route(web::get().to(attendance::weekly_attendance)),
                    )
                    // /attendance/monthly/{employee_id}?year=&month=
                    .service(
                        web::resource("/monthly/{employee_id}")
                            .route(web::get().to(attendance::monthly_attendance)),
                    )
                    .service(
                        web::resource("/daily").route(web::get().to(attendance::daily_attendance)),
                    )
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(attendance::attendance_summary)),
                    ),
            ),
    );
}
