use crate::config::LeagueConfig;
use crate::events::UiBridge;
use crate::store::LeagueStore;
use rand_chacha::ChaCha8Rng;

/// Collaborators every season operation works against. Borrowed from the
/// [`League`](crate::League) for the duration of one operation.
pub struct LeagueContext<'a> {
    pub store: &'a mut dyn LeagueStore,
    pub config: &'a LeagueConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub bridge: &'a mut dyn UiBridge,
}

impl<'a> LeagueContext<'a> {
    pub fn new(
        store: &'a mut dyn LeagueStore,
        config: &'a LeagueConfig,
        rng: &'a mut ChaCha8Rng,
        bridge: &'a mut dyn UiBridge,
    ) -> Self {
        Self { store, config, rng, bridge }
    }
}
