use crate::identity::ActorResolver;
use crate::ratelimit::RateGuard;
use storage::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub limiter: RateGuard,
    pub resolver: ActorResolver,
}
