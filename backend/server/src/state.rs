use std::sync::Arc;

use dashmap::DashMap;
use github::{DiscussionApi, GitHubClient};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{config::Config, limiter::Debouncer};

pub struct State {
    pub config: Config,
    pub api: Arc<dyn DiscussionApi>,
    pub debouncer: Debouncer,
    pub locks: DiscussionLocks,
}

impl State {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let api = Arc::new(GitHubClient::new(config.github())?);

        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: Config, api: Arc<dyn DiscussionApi>) -> Arc<Self> {
        let debouncer = Debouncer::new(config.debounce, config.debounce_capacity);

        Arc::new(Self {
            config,
            api,
            debouncer,
            locks: DiscussionLocks::default(),
        })
    }
}

/// One async lock per discussion title. Serializes the read-modify-write of
/// the vote tally between requests handled by this process only.
#[derive(Default)]
pub struct DiscussionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DiscussionLocks {
    pub fn for_title(&self, title: &str) -> Arc<Mutex<()>> {
        self.locks.entry(title.to_string()).or_default().clone()
    }

    /// Waits for the title's lock. The map entry goes away when the last
    /// guard for it is dropped, including when the request is cancelled.
    pub async fn lock(&self, title: &str) -> DiscussionGuard<'_> {
        let guard = self.for_title(title).lock_owned().await;

        DiscussionGuard {
            locks: self,
            title: title.to_string(),
            guard: Some(guard),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct DiscussionGuard<'a> {
    locks: &'a DiscussionLocks,
    title: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DiscussionGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .locks
            .remove_if(&self.title, |_, lock| Arc::strong_count(lock) == 1);
    }
}
