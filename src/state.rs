use std::sync::Arc;

use crate::{config::Config, session::SessionStore, votes::RemoteVoteStore};

pub struct State {
    pub config: Config,
    pub sessions: SessionStore,
    pub votes: RemoteVoteStore,
}

impl State {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        let votes = RemoteVoteStore::new(config.vote_store.clone());

        Arc::new(Self {
            config,
            sessions: SessionStore::default(),
            votes,
        })
    }
}
