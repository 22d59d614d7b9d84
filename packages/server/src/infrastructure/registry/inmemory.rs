//! InMemory ConnectionRegistry 実装
//!
//! 接続 → ルームとルーム → 接続集合の両方向のマップを 1 つのロックの
//! 下で保持する。視聴者数はルーム側の集合サイズから計算する。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, RoomId};

#[derive(Default)]
struct Membership {
    /// connection → joined room (at most one per session)
    room_of: HashMap<ConnectionId, RoomId>,
    /// room → viewer set
    members: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// In-memory connection/room membership table.
pub struct InMemoryConnectionRegistry {
    state: Mutex<Membership>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Membership::default()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> usize {
        let mut state = self.state.lock().await;
        state
            .room_of
            .insert(connection_id.clone(), room_id.clone());
        let members = state.members.entry(room_id).or_default();
        members.insert(connection_id);
        members.len()
    }

    async fn leave(&self, connection_id: &ConnectionId) -> Option<(RoomId, usize)> {
        let mut state = self.state.lock().await;
        let room_id = state.room_of.remove(connection_id)?;

        let remaining = match state.members.get_mut(&room_id) {
            Some(members) => {
                members.remove(connection_id);
                members.len()
            }
            None => 0,
        };
        if remaining == 0 {
            state.members.remove(&room_id);
        }
        Some((room_id, remaining))
    }

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .members
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn count(&self, room_id: &RoomId) -> usize {
        let state = self.state.lock().await;
        state
            .members
            .get(room_id)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let state = self.state.lock().await;
        state.room_of.get(connection_id).cloned()
    }

    async fn total_connections(&self) -> usize {
        let state = self.state.lock().await;
        state.room_of.len()
    }
}
