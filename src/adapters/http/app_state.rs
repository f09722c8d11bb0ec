use std::sync::Arc;

use crate::{
    infra::{RateLimiterTrait, config::AppConfig},
    use_cases::{admin::AdminUseCases, signup::SignupUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub signup_use_cases: Arc<SignupUseCases>,
    pub admin_use_cases: Arc<AdminUseCases>,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
}
