//! In-memory [`EngineStore`] with optimistic version checks.
//!
//! Backs tests and single-process deployments. All rows live behind one
//! mutex, so a commit is a single critical section: the version check, the
//! row swap, and the attempt-history append happen together or not at all.
//! Concurrent commits for the same actor serialize on the lock and the
//! loser of the race gets a [`StoreError::VersionConflict`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use duskmire_types::{ActionAttempt, ActorId, ActorState, BattleId, BattleSession};

use crate::error::StoreError;
use crate::store::{EngineStore, VersionedActor, VersionedBattle};

/// Rows held by the in-memory store.
#[derive(Debug, Default)]
struct Inner {
    actors: BTreeMap<ActorId, VersionedActor>,
    battles: BTreeMap<BattleId, VersionedBattle>,
    attempts: Vec<ActionAttempt>,
}

/// An in-memory, mutex-serialized [`EngineStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a fresh actor row at version 1.
    ///
    /// Fails if a row already exists for the actor.
    pub fn insert_actor(&self, state: ActorState) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let id = state.actor_id;
        if inner.actors.contains_key(&id) {
            return Err(StoreError::ActorExists(id));
        }
        inner.actors.insert(id, VersionedActor { version: 1, state });
        Ok(())
    }

    /// The attempt-history records for one actor, oldest first.
    pub fn attempts_for(&self, actor_id: ActorId) -> Vec<ActionAttempt> {
        self.lock()
            .attempts
            .iter()
            .filter(|attempt| attempt.actor_id == actor_id)
            .cloned()
            .collect()
    }
}

impl EngineStore for MemoryStore {
    fn load_actor(&self, id: ActorId) -> Result<VersionedActor, StoreError> {
        self.lock()
            .actors
            .get(&id)
            .cloned()
            .ok_or(StoreError::ActorNotFound(id))
    }

    fn commit_actor(
        &self,
        actor: VersionedActor,
        attempt: Option<ActionAttempt>,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let id = actor.state.actor_id;
        let current = inner
            .actors
            .get(&id)
            .map(|row| row.version)
            .ok_or(StoreError::ActorNotFound(id))?;
        if current != actor.version {
            return Err(StoreError::VersionConflict {
                expected: actor.version,
                actual: current,
            });
        }
        let new_version = current.saturating_add(1);
        inner.actors.insert(
            id,
            VersionedActor {
                version: new_version,
                state: actor.state,
            },
        );
        if let Some(record) = attempt {
            inner.attempts.push(record);
        }
        tracing::debug!(actor = %id, version = new_version, "actor committed");
        Ok(new_version)
    }

    fn insert_battle(&self, session: BattleSession) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let id = session.id;
        if inner.battles.contains_key(&id) {
            return Err(StoreError::BattleExists(id));
        }
        inner.battles.insert(
            id,
            VersionedBattle {
                version: 1,
                session,
            },
        );
        Ok(())
    }

    fn load_battle(&self, id: BattleId) -> Result<VersionedBattle, StoreError> {
        self.lock()
            .battles
            .get(&id)
            .cloned()
            .ok_or(StoreError::BattleNotFound(id))
    }

    fn commit_battle(&self, battle: VersionedBattle) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let id = battle.session.id;
        let current = inner
            .battles
            .get(&id)
            .map(|row| row.version)
            .ok_or(StoreError::BattleNotFound(id))?;
        if current != battle.version {
            return Err(StoreError::VersionConflict {
                expected: battle.version,
                actual: current,
            });
        }
        let new_version = current.saturating_add(1);
        inner.battles.insert(
            id,
            VersionedBattle {
                version: new_version,
                session: battle.session,
            },
        );
        tracing::debug!(battle = %id, version = new_version, "battle committed");
        Ok(new_version)
    }
}
