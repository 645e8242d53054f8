use crate::config::{DatasetConfig, SessionConfig};
use crate::error::{AppError, Result};
use crate::generator::DataContext;
use crate::models::{Period, Selection};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// State of one dashboard user: generated data plus what is in view.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub data: DataContext,
    pub selection: Selection,
    pub period: Period,
    last_seen: Instant,
}

impl Session {
    fn new(config: &DatasetConfig) -> Result<Self> {
        let data = DataContext::generate(config)?;
        let entity = data
            .locations()
            .first()
            .map(|loc| loc.id.clone())
            .ok_or_else(|| AppError::GenerationFailure("no locations generated".to_string()))?;
        let year = config
            .initial_year()
            .ok_or_else(|| AppError::GenerationFailure("no supported years".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            data,
            selection: Selection::new(entity, year),
            period: Period::default(),
            last_seen: Instant::now(),
        })
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Live sessions keyed by id. Sessions never share data with each other.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            max_sessions: config.max_sessions,
        }
    }

    /// Generate a fresh data context and register it under a new id.
    pub async fn create(&self, dataset: &DatasetConfig) -> Result<SessionHandle> {
        let session = Session::new(dataset)?;
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            self.purge_expired(&mut sessions);
        }
        if sessions.len() >= self.max_sessions {
            return Err(AppError::SessionLimit(self.max_sessions));
        }
        sessions.insert(id, Arc::clone(&handle));

        info!(session_id = %id, active = sessions.len(), "Session created");
        Ok(handle)
    }

    /// Look up a session and mark it as active. Expired sessions are dropped.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))?;

        let mut session = handle.lock().await;
        if session.last_seen.elapsed() > self.idle_timeout {
            drop(session);
            self.sessions.write().await.remove(&id);
            info!(session_id = %id, "Session expired");
            return Err(AppError::SessionNotFound(id));
        }
        session.touch();
        drop(session);

        Ok(handle)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(session_id = %id, "Session discarded");
                Ok(())
            }
            None => Err(AppError::SessionNotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // A session locked by a request in flight is in use, so it is skipped.
    fn purge_expired(&self, sessions: &mut HashMap<Uuid, SessionHandle>) {
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, handle)| {
                handle
                    .try_lock()
                    .is_ok_and(|session| session.last_seen.elapsed() > self.idle_timeout)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired sessions");
        }
    }
}
