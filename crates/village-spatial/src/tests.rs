//! Unit tests for village-spatial.
//!
//! All tests use small hand-drawn maps.

#[cfg(test)]
mod helpers {
    use crate::TileMap;

    /// A 6×5 map with one building (zone 2) and an entrance below it.
    ///
    /// ```text
    ///   x: 0 1 2 3 4 5
    /// y=0  1 1 1 1 1 1
    /// y=1  1 2 2 2 0 1
    /// y=2  1 2 2 2 0 1
    /// y=3  1 0 8 0 0 1
    /// y=4  1 1 1 1 1 1
    /// ```
    pub fn village() -> TileMap {
        TileMap::from_rows(&[
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 2, 2, 2, 0, 1],
            vec![1, 2, 2, 2, 0, 1],
            vec![1, 0, 8, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1],
        ])
        .unwrap()
    }
}

#[cfg(test)]
mod tile {
    use village_core::ZoneId;

    use crate::TileKind;

    #[test]
    fn decode_table() {
        assert_eq!(TileKind::from_code(0), TileKind::Walkable);
        assert_eq!(TileKind::from_code(1), TileKind::Blocked);
        assert_eq!(TileKind::from_code(8), TileKind::Entrance);
        assert_eq!(TileKind::from_code(2), TileKind::Zone(ZoneId(2)));
        assert_eq!(TileKind::from_code(11), TileKind::Zone(ZoneId(11)));
    }

    #[test]
    fn codes_survive_decoding() {
        for code in [0u16, 1, 2, 7, 8, 9, 11, 300] {
            assert_eq!(TileKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn only_open_ground_and_entrances_are_walkable() {
        assert!(TileKind::Walkable.is_walkable());
        assert!(TileKind::Entrance.is_walkable());
        assert!(!TileKind::Blocked.is_walkable());
        assert!(!TileKind::Zone(ZoneId(3)).is_walkable());
    }
}

#[cfg(test)]
mod map {
    use village_core::{TileCoord, ZoneId};

    use crate::{SpatialError, TileKind, TileMap};

    #[test]
    fn dimensions() {
        let map = super::helpers::village();
        assert_eq!(map.width(), 6);
        assert_eq!(map.height(), 5);
        assert!(map.contains(TileCoord::new(5, 4)));
        assert!(!map.contains(TileCoord::new(6, 4)));
        assert!(!map.contains(TileCoord::new(0, -1)));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let map = super::helpers::village();
        assert_eq!(map.tile_at(-1, 0), TileKind::Blocked);
        assert_eq!(map.tile_at(0, -1), TileKind::Blocked);
        assert_eq!(map.tile_at(i64::MAX, i64::MAX), TileKind::Blocked);
        assert!(!map.is_walkable(100, 100));
        assert_eq!(map.zone_at(-5, 2), None);
    }

    #[test]
    fn walkability() {
        let map = super::helpers::village();
        assert!(map.is_walkable(4, 1));
        assert!(map.is_walkable(2, 3)); // entrance
        assert!(!map.is_walkable(0, 0)); // wall
        assert!(!map.is_walkable(2, 2)); // building interior
    }

    #[test]
    fn zone_tile_reports_own_zone() {
        let map = super::helpers::village();
        assert_eq!(map.zone_at(1, 1), Some(ZoneId(2)));
        assert_eq!(map.zone_at(4, 1), None);
    }

    #[test]
    fn entrance_inherits_adjacent_zone() {
        let map = super::helpers::village();
        assert_eq!(map.tile_at(2, 3), TileKind::Entrance);
        assert_eq!(map.zone_at(2, 3), Some(ZoneId(2)));
    }

    #[test]
    fn entrance_probe_order_prefers_left() {
        // Entrance between zone 3 (left) and zone 4 (right).
        let map = TileMap::from_rows(&[vec![3, 8, 4]]).unwrap();
        assert_eq!(map.zone_at(1, 0), Some(ZoneId(3)));
    }

    #[test]
    fn isolated_entrance_has_no_zone() {
        let map = TileMap::from_rows(&[vec![0, 8, 0]]).unwrap();
        assert_eq!(map.zone_at(1, 0), None);
    }

    #[test]
    fn entrances_listed_row_major() {
        let map = TileMap::from_rows(&[
            vec![2, 8, 0],
            vec![0, 0, 8],
        ])
        .unwrap();
        assert_eq!(map.entrances(), vec![
            (TileCoord::new(1, 0), Some(ZoneId(2))),
            (TileCoord::new(2, 1), None),
        ]);
    }

    #[test]
    fn empty_maps_rejected() {
        assert!(matches!(TileMap::from_rows(&[]), Err(SpatialError::EmptyMap)));
        assert!(matches!(TileMap::from_rows(&[vec![]]), Err(SpatialError::EmptyMap)));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = TileMap::from_rows(&[vec![0, 0, 0], vec![0, 0]]).unwrap_err();
        assert!(matches!(err, SpatialError::RaggedRow { row: 1, expected: 3, got: 2 }));
    }

    #[test]
    fn json_bare_matrix() {
        let map = TileMap::from_json_str("[[1,1],[0,8]]").unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.tile_at(1, 1), TileKind::Entrance);
        assert_eq!(map.zone_name(ZoneId(2)), None);
    }

    #[test]
    fn json_with_zone_legend() {
        let json = r#"{ "tiles": [[2, 8]], "zones": { "2": "Joy_home" } }"#;
        let map = TileMap::from_json_str(json).unwrap();
        assert_eq!(map.zone_name(ZoneId(2)), Some("Joy_home"));
        assert_eq!(map.zone_name_at(TileCoord::new(1, 0)), Some("Joy_home"));
        assert_eq!(map.zone_name_at(TileCoord::new(5, 0)), None);
    }

    #[test]
    fn json_bad_zone_key_rejected() {
        let json = r#"{ "tiles": [[2]], "zones": { "two": "Joy_home" } }"#;
        assert!(matches!(TileMap::from_json_str(json), Err(SpatialError::BadZoneCode(k)) if k == "two"));
    }

    #[test]
    fn json_garbage_rejected() {
        assert!(matches!(TileMap::from_json_str("{\"rows\": 3}"), Err(SpatialError::Json(_))));
    }

    #[test]
    fn later_zone_names_replace_earlier() {
        let map = super::helpers::village()
            .with_zone_names([(ZoneId(2), "Bakery"), (ZoneId(2), "Inn")]);
        assert_eq!(map.zone_name(ZoneId(2)), Some("Inn"));
    }
}

#[cfg(test)]
mod index {
    use village_core::{AgentId, TileCoord};

    use crate::OccupancyIndex;

    #[test]
    fn orthogonal_neighbours_only() {
        let idx = OccupancyIndex::build([
            (AgentId(0), TileCoord::new(5, 5)),
            (AgentId(1), TileCoord::new(5, 6)), // below
            (AgentId(2), TileCoord::new(6, 6)), // diagonal
            (AgentId(3), TileCoord::new(4, 5)), // left
            (AgentId(4), TileCoord::new(7, 5)), // two away
        ]);
        assert_eq!(idx.len(), 5);
        assert_eq!(idx.adjacent(TileCoord::new(5, 5)), vec![AgentId(1), AgentId(3)]);
    }

    #[test]
    fn same_tile_excluded() {
        let idx = OccupancyIndex::build([
            (AgentId(0), TileCoord::new(2, 2)),
            (AgentId(1), TileCoord::new(2, 2)),
        ]);
        assert!(idx.adjacent(TileCoord::new(2, 2)).is_empty());
    }

    #[test]
    fn extreme_tiles_neither_overflow_nor_meet() {
        let idx = OccupancyIndex::build([
            (AgentId(0), TileCoord::new(i32::MIN, 0)),
            (AgentId(1), TileCoord::new(i32::MAX, 0)),
            (AgentId(2), TileCoord::new(i32::MAX, 1)),
        ]);
        assert!(idx.adjacent(TileCoord::new(i32::MIN, 0)).is_empty());
        assert_eq!(idx.adjacent(TileCoord::new(i32::MAX, 0)), vec![AgentId(2)]);
    }

    #[test]
    fn empty_index() {
        let idx = OccupancyIndex::build(std::iter::empty());
        assert!(idx.is_empty());
        assert!(idx.adjacent(TileCoord::new(0, 0)).is_empty());
    }
}
