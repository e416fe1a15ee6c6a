//! Unit tests for village-interaction.

#[cfg(test)]
mod helpers {
    use village_core::{AgentId, TileCoord, TilePos};
    use village_mobility::{AgentState, Motion};

    use crate::DialogueRequest;

    /// Agents indexed by id, one per `(x, y)`.
    pub fn agents_at(tiles: &[(f64, f64)]) -> Vec<AgentState> {
        tiles
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut s = AgentState::spawned(AgentId(i as u32), format!("a{i}"), TileCoord::default(), 0);
                s.position = TilePos::new(x, y);
                s
            })
            .collect()
    }

    pub fn request(a: u32, b: u32) -> DialogueRequest {
        DialogueRequest {
            agents:       [AgentId(a), AgentId(b)],
            participants: [format!("a{a}"), format!("a{b}")],
            positions:    [TilePos::new(5.0, 5.0), TilePos::new(5.0, 6.0)],
            states:       [Motion::Idle, Motion::Moving],
            triggered_at: 1_700_000_000,
        }
    }
}

#[cfg(test)]
mod proximity {
    use village_core::AgentId;

    use super::helpers::agents_at;
    use crate::{pair_key, ProximityDetector};

    #[test]
    fn adjacent_pair_meets() {
        let mut det = ProximityDetector::new(32);
        let agents = agents_at(&[(5.0, 5.0), (5.0, 6.0)]);
        assert_eq!(det.detect(&agents), vec![(AgentId(0), AgentId(1))]);
        assert!(det.is_latched(AgentId(1), AgentId(0)));
    }

    #[test]
    fn same_tile_never_meets() {
        let mut det = ProximityDetector::new(32);
        assert!(det.detect(&agents_at(&[(5.0, 5.0), (5.0, 5.0)])).is_empty());
        assert_eq!(det.latched_len(), 0);
    }

    #[test]
    fn diagonal_is_not_adjacent() {
        let mut det = ProximityDetector::new(32);
        assert!(det.detect(&agents_at(&[(5.0, 5.0), (6.0, 6.0)])).is_empty());
    }

    #[test]
    fn rounding_decides_adjacency() {
        let mut det = ProximityDetector::new(32);
        // (5.0, 5.4) rounds to (5, 5); (5.0, 6.2) rounds to (5, 6).
        assert_eq!(det.detect(&agents_at(&[(5.0, 5.4), (5.0, 6.2)])).len(), 1);
    }

    #[test]
    fn no_duplicate_trigger_while_adjacent() {
        let mut det = ProximityDetector::new(32);
        let agents = agents_at(&[(5.0, 5.0), (5.0, 6.0)]);
        assert_eq!(det.detect(&agents).len(), 1);
        for _ in 0..50 {
            assert!(det.detect(&agents).is_empty());
        }
    }

    #[test]
    fn latch_survives_overlap_and_releases_on_separation() {
        let mut det = ProximityDetector::new(32);
        assert_eq!(det.detect(&agents_at(&[(5.0, 5.0), (5.0, 6.0)])).len(), 1);

        // Same tile: still latched.
        assert!(det.detect(&agents_at(&[(5.0, 5.0), (5.0, 5.0)])).is_empty());
        assert!(det.is_latched(AgentId(0), AgentId(1)));

        // Distance 2: released.
        assert!(det.detect(&agents_at(&[(5.0, 5.0), (5.0, 7.0)])).is_empty());
        assert!(!det.is_latched(AgentId(0), AgentId(1)));

        assert_eq!(det.detect(&agents_at(&[(5.0, 5.0), (5.0, 6.0)])).len(), 1);
    }

    #[test]
    fn interacting_agents_are_skipped() {
        let mut det = ProximityDetector::new(32);
        let mut agents = agents_at(&[(5.0, 5.0), (5.0, 6.0)]);
        agents[1].is_interacting = true;
        assert!(det.detect(&agents).is_empty());
        assert_eq!(det.latched_len(), 0);
    }

    #[test]
    fn each_agent_claimed_once_per_call() {
        let mut det = ProximityDetector::new(32);
        // 1 sits between 0 and 2.
        let agents = agents_at(&[(4.0, 5.0), (5.0, 5.0), (6.0, 5.0)]);
        assert_eq!(det.detect(&agents), vec![(AgentId(0), AgentId(1))]);
        // (1, 2) was not latched and is reported once 1 is free again.
        assert!(!det.is_latched(AgentId(1), AgentId(2)));
    }

    #[test]
    fn distance_is_symmetric() {
        let agents = agents_at(&[(1.0, 2.0), (4.0, 7.0), (3.4, 2.6)]);
        for a in &agents {
            for b in &agents {
                assert_eq!(a.tile().manhattan(b.tile()), b.tile().manhattan(a.tile()));
            }
        }
        assert_eq!(pair_key(AgentId(3), AgentId(1)), pair_key(AgentId(1), AgentId(3)));
    }

    #[test]
    fn index_and_scan_agree() {
        let tiles: Vec<(f64, f64)> = (0..40)
            .map(|i| ((i % 7) as f64 * 1.0, (i / 7) as f64 * 2.0 + (i % 2) as f64))
            .collect();
        let agents = agents_at(&tiles);
        let mut scan = ProximityDetector::new(usize::MAX);
        let mut index = ProximityDetector::new(0);
        assert_eq!(scan.detect(&agents), index.detect(&agents));
    }

    #[test]
    fn far_apart_tiles_do_not_overflow() {
        for threshold in [usize::MAX, 0] {
            let mut det = ProximityDetector::new(threshold);
            assert!(det.detect(&agents_at(&[(-2e9, -2e9), (2e9, 2e9)])).is_empty());
            assert!(det.detect(&agents_at(&[(-2e9, 0.0), (2e9, 0.0)])).is_empty());
            assert_eq!(det.latched_len(), 0);
        }
    }

    #[test]
    fn neighbours_at_the_edge_of_the_range_still_meet() {
        let tiles = [(2e9, 0.0), (2e9, 1.0), (-2e9, 0.0)];
        let mut scan = ProximityDetector::new(usize::MAX);
        let mut index = ProximityDetector::new(0);
        assert_eq!(scan.detect(&agents_at(&tiles)), vec![(AgentId(0), AgentId(1))]);
        assert_eq!(index.detect(&agents_at(&tiles)), vec![(AgentId(0), AgentId(1))]);
    }
}

#[cfg(test)]
mod session {
    use village_core::{AgentId, SessionId};

    use crate::{InteractionError, SessionEnd, SessionManager};

    #[test]
    fn open_sets_expiry_and_canonical_order() {
        let mut mgr = SessionManager::new(500.0);
        let s = mgr.open(AgentId(3), AgentId(1), 10.0).unwrap().clone();
        assert_eq!(s.participants, (AgentId(1), AgentId(3)));
        assert_eq!(s.expires_at, 510.0);
        assert_eq!(s.partner_of(AgentId(3)), Some(AgentId(1)));
        assert_eq!(s.partner_of(AgentId(9)), None);
        assert_eq!(mgr.session_of(AgentId(1)).map(|s| s.id), Some(s.id));
    }

    #[test]
    fn agent_in_one_session_at_a_time() {
        let mut mgr = SessionManager::new(500.0);
        mgr.open(AgentId(0), AgentId(1), 0.0).unwrap();
        assert!(matches!(mgr.open(AgentId(1), AgentId(2), 0.0), Err(InteractionError::AgentBusy(AgentId(1)))));
        assert!(matches!(mgr.open(AgentId(2), AgentId(2), 0.0), Err(InteractionError::SelfPair(_))));
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn expiry_is_inclusive() {
        let mut mgr = SessionManager::new(5.0);
        mgr.open(AgentId(0), AgentId(1), 0.0).unwrap();
        assert!(mgr.expire(4.9).is_empty());
        let ended = mgr.expire(5.0);
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].reason, SessionEnd::Expired);
        assert!(mgr.session_of(AgentId(0)).is_none());
        assert!(mgr.is_empty());
    }

    #[test]
    fn close_and_clear() {
        let mut mgr = SessionManager::new(100.0);
        let first = mgr.open(AgentId(0), AgentId(1), 0.0).unwrap().id;
        mgr.open(AgentId(2), AgentId(3), 0.0).unwrap();

        let closed = mgr.close(first, 1.0).unwrap();
        assert_eq!(closed.reason, SessionEnd::Closed);
        assert!(matches!(mgr.close(first, 1.0), Err(InteractionError::UnknownSession(_))));

        let stopped = mgr.clear(2.0);
        assert_eq!(stopped.len(), 1);
        assert_eq!(stopped[0].reason, SessionEnd::Stopped);
        assert!(mgr.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut mgr = SessionManager::new(1.0);
        let a = mgr.open(AgentId(0), AgentId(1), 0.0).unwrap().id;
        mgr.expire(1.0);
        let b = mgr.open(AgentId(0), AgentId(1), 2.0).unwrap().id;
        assert_eq!((a, b), (SessionId(0), SessionId(1)));
    }
}

#[cfg(test)]
mod dialogue {
    use village_core::AgentId;

    use super::helpers::request;

    #[test]
    fn wire_shape() {
        let json = serde_json::to_value(request(0, 1)).unwrap();
        assert_eq!(json["participants"], serde_json::json!(["a0", "a1"]));
        assert_eq!(json["states"], serde_json::json!(["idle", "moving"]));
        assert_eq!(json["positions"][1]["y"], serde_json::json!(6.0));
        assert_eq!(json["triggeredAt"], serde_json::json!(1_700_000_000));
        assert!(json.get("agents").is_none());
    }

    #[test]
    fn other_name() {
        let r = request(4, 7);
        assert_eq!(r.other_name(AgentId(4)), Some("a7"));
        assert_eq!(r.other_name(AgentId(7)), Some("a4"));
        assert_eq!(r.other_name(AgentId(1)), None);
    }
}

#[cfg(test)]
mod dispatch {
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::runtime::Handle;

    use village_core::SessionId;

    use super::helpers::request;
    use crate::{
        DialogueDispatcher, DialogueError, DialogueOutcome, DialogueReply, DialogueRequest,
        DialogueResult, DialogueService, NoopDialogue,
    };

    struct Echo;

    impl DialogueService for Echo {
        fn converse(&self, request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send {
            async move {
                Ok(DialogueReply::new(format!("{} meets {}", request.participants[0], request.participants[1])))
            }
        }
    }

    struct Down;

    impl DialogueService for Down {
        fn converse(&self, _request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send {
            async { Err(DialogueError::Unavailable("offline".into())) }
        }
    }

    struct Never;

    impl DialogueService for Never {
        fn converse(&self, _request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send {
            std::future::pending()
        }
    }

    async fn wait_for<D: DialogueService>(d: &mut DialogueDispatcher<D>, n: usize) -> Vec<DialogueOutcome> {
        let mut got = Vec::new();
        for _ in 0..200 {
            got.extend(d.drain());
            if got.len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        got
    }

    #[tokio::test]
    async fn reply_is_delivered() {
        let mut d = DialogueDispatcher::new(Arc::new(Echo), Handle::current());
        d.dispatch(SessionId(3), request(0, 1));
        assert_eq!(d.in_flight(), 1);

        let outcomes = wait_for(&mut d, 1).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].session, SessionId(3));
        assert_eq!(outcomes[0].result, Ok(DialogueReply::new("a0 meets a1")));
        assert_eq!(d.in_flight(), 0);
    }

    #[tokio::test]
    async fn failure_is_delivered_not_retried() {
        let mut d = DialogueDispatcher::new(Arc::new(Down), Handle::current());
        d.dispatch(SessionId(0), request(0, 1));
        let outcomes = wait_for(&mut d, 1).await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Err(DialogueError::Unavailable(_))));
        assert!(d.drain().is_empty());
    }

    #[tokio::test]
    async fn noop_replies_empty() {
        let mut d = DialogueDispatcher::new(Arc::new(NoopDialogue), Handle::current());
        d.dispatch(SessionId(0), request(0, 1));
        let outcomes = wait_for(&mut d, 1).await;
        assert_eq!(outcomes[0].result, Ok(DialogueReply::default()));
    }

    #[tokio::test]
    async fn cancel_aborts_in_flight() {
        let mut d = DialogueDispatcher::new(Arc::new(Never), Handle::current());
        d.dispatch(SessionId(0), request(0, 1));
        d.dispatch(SessionId(1), request(2, 3));
        tokio::task::yield_now().await;
        assert_eq!(d.cancel_all(), 2);
        assert_eq!(d.in_flight(), 0);
        assert!(d.drain().is_empty());
    }
}
