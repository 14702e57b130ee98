use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::editor::session::EditorSession;
use crate::errors::AppError;

pub type SharedSession = Arc<Mutex<EditorSession>>;

struct Slot {
    session: SharedSession,
    /// Milliseconds since the store epoch at the last lookup.
    last_seen_ms: AtomicU64,
}

/// In-memory registry of editing sessions.
///
/// The map lock is held only to look sessions up; all editing happens under the
/// per-session mutex so one busy session never blocks another. Sessions untouched for
/// `idle_timeout` are reclaimed by the sweeper, or on demand when the store is full.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Slot>>>,
    max_sessions: usize,
    idle_timeout: Duration,
    epoch: Instant,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
            idle_timeout,
            epoch: Instant::now(),
        }
    }

    pub async fn create(&self) -> Result<SharedSession, AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            self.reclaim_idle(&mut sessions);
        }
        if sessions.len() >= self.max_sessions {
            return Err(AppError::TooManySessions(self.max_sessions));
        }
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(EditorSession::new(id)));
        sessions.insert(
            id,
            Slot {
                session: session.clone(),
                last_seen_ms: AtomicU64::new(self.now_ms()),
            },
        );
        info!(session_id = %id, open = sessions.len(), "Editing session started");
        Ok(session)
    }

    /// Looks a session up and marks it as active.
    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let sessions = self.sessions.read().await;
        let slot = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        slot.last_seen_ms.store(self.now_ms(), Ordering::Relaxed);
        Ok(slot.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(_) => {
                info!(session_id = %id, "Editing session ended");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Session {id} not found"))),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every idle session and returns how many were reclaimed.
    pub async fn sweep_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.reclaim_idle(&mut sessions)
    }

    /// Runs `sweep_idle` on a fixed interval for the life of the process.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let reclaimed = store.sweep_idle().await;
                if reclaimed > 0 {
                    debug!(reclaimed, "Idle session sweep");
                }
            }
        })
    }

    /// A session is kept while it is recent, locked by a request, or waiting on a
    /// collaborator call.
    fn reclaim_idle(&self, sessions: &mut HashMap<Uuid, Slot>) -> usize {
        let now = self.now_ms();
        let limit = u64::try_from(self.idle_timeout.as_millis()).unwrap_or(u64::MAX);
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let idle_ms = now.saturating_sub(slot.last_seen_ms.load(Ordering::Relaxed));
            if idle_ms < limit {
                return true;
            }
            match slot.session.try_lock() {
                Ok(session) if session.pending().is_none() => {
                    info!(session_id = %id, idle_ms, "Idle editing session reclaimed");
                    false
                }
                _ => true,
            }
        });
        before - sessions.len()
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::session::ExternalCall;

    const IDLE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new(4, IDLE);
        let session = store.create().await.unwrap();
        let id = session.lock().await.id();

        let fetched = store.get(id).await.unwrap();
        assert!(Arc::ptr_eq(&session, &fetched));

        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_enforces_capacity() {
        let store = SessionStore::new(2, IDLE);
        store.create().await.unwrap();
        store.create().await.unwrap();
        assert!(matches!(
            store.create().await,
            Err(AppError::TooManySessions(2))
        ));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_swept() {
        let store = SessionStore::new(4, IDLE);
        let stale = store.create().await.unwrap().lock().await.id();
        let active = store.create().await.unwrap().lock().await.id();

        tokio::time::advance(Duration::from_secs(45)).await;
        store.get(active).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.sweep_idle().await, 1);
        assert!(matches!(store.get(stale).await, Err(AppError::NotFound(_))));
        assert!(store.get(active).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_reclaims_idle_session_on_create() {
        let store = SessionStore::new(1, IDLE);
        store.create().await.unwrap();
        assert!(matches!(store.create().await, Err(AppError::TooManySessions(1))));

        tokio::time::advance(IDLE).await;
        assert!(store.create().await.is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_session_with_pending_call() {
        let store = SessionStore::new(4, IDLE);
        let session = store.create().await.unwrap();
        session.lock().await.begin_external(ExternalCall::Save).unwrap();

        tokio::time::advance(IDLE * 2).await;
        assert_eq!(store.sweep_idle().await, 0);

        session.lock().await.complete_external();
        assert_eq!(store.sweep_idle().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_reclaims_in_background() {
        let store = SessionStore::new(4, IDLE);
        store.create().await.unwrap();
        let sweeper = store.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(IDLE + Duration::from_secs(15)).await;
        assert_eq!(store.len().await, 0);
        sweeper.abort();
    }
}
