//! Registry of running characters
//!
//! Characters are spawned lazily from the profile configuration the first
//! time they are addressed. Each one runs in its own actor, so different
//! characters never block each other.

use crate::heartbeat::HeartbeatConfig;
use crate::system::LimbicSystem;
use anima_core::{ProfileConfig, Psyche, PsycheSnapshot};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct Cast {
    profiles: Arc<ProfileConfig>,
    heartbeat: HeartbeatConfig,
    members: Arc<RwLock<HashMap<String, LimbicSystem>>>,
}

impl Cast {
    pub fn new(profiles: ProfileConfig, heartbeat: HeartbeatConfig) -> Self {
        Self {
            profiles: Arc::new(profiles),
            heartbeat,
            members: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn profiles(&self) -> &ProfileConfig {
        &self.profiles
    }

    /// Handle for `id`, spawning the character on first use.
    pub async fn get_or_spawn(&self, id: &str) -> Result<LimbicSystem> {
        if let Some(existing) = self.members.read().await.get(id) {
            return Ok(existing.clone());
        }

        let mut members = self.members.write().await;
        // Another caller may have won the race
        if let Some(existing) = members.get(id) {
            return Ok(existing.clone());
        }
        let psyche = self.profiles.psyche_for(id)?;
        let system = LimbicSystem::spawn(id, psyche, self.heartbeat.clone());
        members.insert(id.to_string(), system.clone());
        tracing::info!("Spawned character {}", id);
        Ok(system)
    }

    /// Replace (or create) `id` from a stored snapshot.
    pub async fn restore(&self, id: &str, snapshot: PsycheSnapshot) -> Result<LimbicSystem> {
        let profile = self.profiles.profile(id);
        let temperament = profile
            .to_temperament()
            .with_context(|| format!("Invalid profile for character {}", id))?;
        let psyche = Psyche::restore(temperament, profile.style, snapshot);
        let system = LimbicSystem::spawn(id, psyche, self.heartbeat.clone());
        self.members.write().await.insert(id.to_string(), system.clone());
        tracing::info!("Restored character {} from snapshot", id);
        Ok(system)
    }

    pub async fn get(&self, id: &str) -> Option<LimbicSystem> {
        self.members.read().await.get(id).cloned()
    }

    /// Drop the registry's handle; the actor stops once no handle remains.
    pub async fn remove(&self, id: &str) -> bool {
        self.members.write().await.remove(id).is_some()
    }

    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.members.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ordered snapshots of every running character.
    pub async fn snapshots(&self) -> Result<BTreeMap<String, PsycheSnapshot>> {
        let members: Vec<LimbicSystem> = self.members.read().await.values().cloned().collect();
        let mut out = BTreeMap::new();
        for member in members {
            out.insert(member.id().to_string(), member.snapshot().await?);
        }
        Ok(out)
    }
}
