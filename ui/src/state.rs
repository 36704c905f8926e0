use log::warn;
use roster_business::{BusinessConfig, UserListController};
use roster_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        let config = BusinessConfig::init().unwrap_or_else(|err| {
            warn!("Invalid configuration, using defaults: {err:#}");
            BusinessConfig::default()
        });
        Self::new(config)
    }
}

impl State {
    pub fn new(config: BusinessConfig) -> Self {
        let mut ctx = StateCtx::new();
        UserListController::register(&mut ctx, config);
        Self { ctx }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url))
    }
}
