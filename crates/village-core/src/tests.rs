//! Unit tests for village-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, SessionId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(SessionId::INVALID.0, u32::MAX);
        assert_eq!(ZoneId::INVALID.0, u16::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ZoneId(11).to_string(), "ZoneId(11)");
    }

    #[test]
    fn zone_id_overflow_rejected() {
        assert!(ZoneId::try_from(70_000usize).is_err());
    }
}

#[cfg(test)]
mod grid {
    use crate::{Direction, TileCoord, TilePos};

    #[test]
    fn manhattan_is_symmetric() {
        let a = TileCoord::new(5, 5);
        let b = TileCoord::new(2, 9);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn rounding_half_goes_up_for_positive() {
        assert_eq!(TilePos::new(2.0, 2.5).rounded(), TileCoord::new(2, 3));
        assert_eq!(TilePos::new(2.49, 2.51).rounded(), TileCoord::new(2, 3));
    }

    #[test]
    fn manhattan_spans_the_whole_range() {
        let a = TileCoord::new(i32::MIN, i32::MIN);
        let b = TileCoord::new(i32::MAX, i32::MAX);
        assert_eq!(a.manhattan(b), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn lerp_endpoints() {
        let a = TilePos::new(2.0, 2.0);
        let b = TilePos::new(2.0, 3.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), TilePos::new(2.0, 2.5));
    }

    #[test]
    fn direction_from_delta() {
        assert_eq!(Direction::from_delta(1.0, 0.0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(-1.0, 0.0), Some(Direction::Left));
        assert_eq!(Direction::from_delta(0.0, 1.0), Some(Direction::Down));
        assert_eq!(Direction::from_delta(0.0, -2.0), Some(Direction::Up));
        assert_eq!(Direction::from_delta(0.0, 0.0), None);
    }

    #[test]
    fn direction_tie_break_is_horizontal() {
        assert_eq!(Direction::from_delta(1.0, 1.0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(-1.0, -1.0), Some(Direction::Left));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn advance_accumulates_seconds_and_ticks() {
        let mut clock = SimClock::new(1_000);
        assert_eq!(clock.advance(2.5), 2.5);
        assert_eq!(clock.advance(0.5), 3.0);
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.current_unix_secs(), 1_003);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = SimClock::new(0);
        clock.advance(100.0);
        clock.reset();
        assert_eq!(clock.current_tick, Tick::ZERO);
        assert_eq!(clock.elapsed_secs, 0.0);
    }

    #[test]
    fn display_shows_day_and_time() {
        let mut clock = SimClock::new(0);
        clock.advance(86_400.0 + 3_600.0 * 7.0 + 60.0 * 5.0);
        assert_eq!(clock.to_string(), "T1 (day 1 07:05)");
    }
}

#[cfg(test)]
mod config {
    use crate::{EngineConfig, RetryConfig};

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.time_scale, 60.0);
        assert_eq!(cfg.interaction_timeout_secs, 500.0);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = EngineConfig::from_json_str(
            r#"{ "time_scale": 1.0, "log_retry": { "max_attempts": 2 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.time_scale, 1.0);
        assert_eq!(cfg.log_retry.max_attempts, 2);
        assert_eq!(cfg.log_retry.base_delay_ms, 200);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(EngineConfig::from_json_str(r#"{ "time_scale": 0.0 }"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{ "tick_secs": -1.0 }"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{ "log_retry": { "max_attempts": 0 } }"#).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let retry = RetryConfig { max_attempts: 10, base_delay_ms: 100, max_delay_ms: 1_000 };
        assert_eq!(retry.backoff_ms(0), 100);
        assert_eq!(retry.backoff_ms(1), 200);
        assert_eq!(retry.backoff_ms(3), 800);
        assert_eq!(retry.backoff_ms(4), 1_000);
        assert_eq!(retry.backoff_ms(80), 1_000);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.equal_jitter(1_000), b.equal_jitter(1_000));
        }
    }

    #[test]
    fn equal_jitter_stays_in_bounds() {
        let mut rng = SimRng::new(1);
        for _ in 0..100 {
            let d = rng.equal_jitter(401);
            assert!((200..=401).contains(&d), "got {d}");
        }
        assert_eq!(rng.equal_jitter(0), 0);
    }
}
