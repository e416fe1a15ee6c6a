//! Interaction session lifecycle.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use village_core::{AgentId, SessionId};

use crate::{pair_key, InteractionError, InteractionResult};

/// A bounded meeting between two agents.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionSession {
    pub id:           SessionId,
    /// Canonical order: smaller id first.
    pub participants: (AgentId, AgentId),
    pub started_at:   f64,
    pub expires_at:   f64,
}

impl InteractionSession {
    /// The participant that is not `agent`.
    pub fn partner_of(&self, agent: AgentId) -> Option<AgentId> {
        match self.participants {
            (a, b) if a == agent => Some(b),
            (a, b) if b == agent => Some(a),
            _ => None,
        }
    }
}

/// Why a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionEnd {
    /// The timeout elapsed.
    Expired,
    /// Closed explicitly by the host.
    Closed,
    /// The simulation stopped.
    Stopped,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EndedSession {
    pub session:  InteractionSession,
    pub reason:   SessionEnd,
    pub ended_at: f64,
}

/// Owns every active session.  An agent belongs to at most one.
pub struct SessionManager {
    timeout_secs: f64,
    next_id:      u32,
    sessions:     BTreeMap<SessionId, InteractionSession>,
    by_agent:     HashMap<AgentId, SessionId>,
}

impl SessionManager {
    pub fn new(timeout_secs: f64) -> Self {
        Self {
            timeout_secs,
            next_id: 0,
            sessions: BTreeMap::new(),
            by_agent: HashMap::new(),
        }
    }

    pub fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    /// Open a session between `a` and `b` at `now`.
    pub fn open(&mut self, a: AgentId, b: AgentId, now: f64) -> InteractionResult<&InteractionSession> {
        if a == b {
            return Err(InteractionError::SelfPair(a));
        }
        for agent in [a, b] {
            if self.by_agent.contains_key(&agent) {
                return Err(InteractionError::AgentBusy(agent));
            }
        }

        let id = SessionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let session = InteractionSession {
            id,
            participants: pair_key(a, b),
            started_at:   now,
            expires_at:   now + self.timeout_secs,
        };
        debug!(session = %id, a = %a, b = %b, expires_at = session.expires_at, "session opened");

        self.by_agent.insert(a, id);
        self.by_agent.insert(b, id);
        Ok(self.sessions.entry(id).or_insert(session))
    }

    /// End every session whose `expires_at <= now`, in id order.
    pub fn expire(&mut self, now: f64) -> Vec<EndedSession> {
        let due: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.expires_at <= now)
            .map(|s| s.id)
            .collect();
        due.into_iter()
            .filter_map(|id| self.end(id, SessionEnd::Expired, now))
            .collect()
    }

    /// End session `id` at the host's request.
    pub fn close(&mut self, id: SessionId, now: f64) -> InteractionResult<EndedSession> {
        self.end(id, SessionEnd::Closed, now)
            .ok_or(InteractionError::UnknownSession(id))
    }

    /// End every session.  Used when the simulation stops.
    pub fn clear(&mut self, now: f64) -> Vec<EndedSession> {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.into_iter()
            .filter_map(|id| self.end(id, SessionEnd::Stopped, now))
            .collect()
    }

    fn end(&mut self, id: SessionId, reason: SessionEnd, now: f64) -> Option<EndedSession> {
        let session = self.sessions.remove(&id)?;
        self.by_agent.remove(&session.participants.0);
        self.by_agent.remove(&session.participants.1);
        debug!(session = %id, ?reason, "session ended");
        Some(EndedSession { session, reason, ended_at: now })
    }

    #[inline]
    pub fn get(&self, id: SessionId) -> Option<&InteractionSession> {
        self.sessions.get(&id)
    }

    pub fn session_of(&self, agent: AgentId) -> Option<&InteractionSession> {
        self.by_agent.get(&agent).and_then(|id| self.sessions.get(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Active sessions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &InteractionSession> + '_ {
        self.sessions.values()
    }
}
