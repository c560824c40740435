use dg_core::dungeon::{
    EdgeAugmenter, Generator, Point, Room, RoomGraph, SURROUNDING, TileGrid, Tileset,
    TreeDistances, dig_corridor, generate, render,
};
use dg_core::save::MapFile;
use dg_core::{EXTRA_EDGE_RATIO, GameRng, GenConfig, GenError, TilesetConfig};
use proptest::prelude::*;

fn scenario_config() -> GenConfig {
    GenConfig {
        width: 16,
        height: 16,
        tileset: TilesetConfig {
            default_tile: 4,
            num_tiles: 5,
        },
        min_size: 2,
        max_size: 4,
        tolerance: None,
        tries: Some(16),
        extra_edges: true,
    }
}

/// Every room reachable over free tiles from room 0
fn all_rooms_connected(grid: &TileGrid, tileset: &Tileset) -> bool {
    let Some(first) = grid.rooms().first() else {
        return true;
    };
    let reach = grid.reachable_from(Point::new(first.x, first.y), tileset);
    grid.rooms()
        .iter()
        .all(|r| r.cells().all(|p| reach.contains(&p)))
}

#[test]
fn test_small_grid_scenario_is_reproducible() {
    let config = scenario_config();
    let a = generate(&config, 2024).unwrap();
    let b = generate(&config, 2024).unwrap();

    assert!(!a.rooms().is_empty());
    assert_eq!(a.rooms(), b.rooms());
    assert_eq!(a.grid, b.grid);
    assert_eq!(a.starting_square, b.starting_square);
    assert_eq!(a.tree_corridors.len(), a.rooms().len() - 1);
    assert!(all_rooms_connected(&a.grid, &a.tileset));
}

#[test]
fn test_grid_smaller_than_rooms() {
    let config = GenConfig {
        width: 3,
        height: 3,
        tries: Some(10),
        ..scenario_config()
    };
    let map = generate(&config, 1).unwrap();
    assert!(map.rooms().is_empty());
    assert!(map.tree_corridors.is_empty());
    assert!(map.augment.added.is_empty());
    assert!(map.starting_square.is_none());
    assert!(map.grid.tiles().iter().all(|&t| t == 4));
}

#[test]
fn test_blocked_corner_on_only_path() {
    let ts = Tileset::new(4, 5).unwrap();
    // the interior is a single row, so the rooms share one corridor lane
    let mut grid = TileGrid::new(11, 3, ts.default_tile());
    let mut rng = GameRng::new(3);
    let west = Room::new(1, 1, 1, 1);
    let east = Room::new(9, 1, 1, 1);
    for room in [west, east] {
        assert!(grid.can_place(&room, &ts));
        grid.stamp_room(room, &ts, &mut rng);
    }
    grid.reserve_corner(Point::new(5, 1), &ts);

    let from = west.random_point(&mut rng);
    let to = east.random_point(&mut rng);
    let before = grid.clone();
    let err = dig_corridor(&mut grid, &ts, from, to, &mut rng).unwrap_err();
    assert!(matches!(err, GenError::NoPath { .. }));
    assert_eq!(grid, before);
}

#[test]
fn test_invalid_configs_fail_fast() {
    for config in [
        GenConfig {
            width: 0,
            ..scenario_config()
        },
        GenConfig {
            min_size: 5,
            max_size: 4,
            ..scenario_config()
        },
        GenConfig {
            min_size: 5_000_000_000,
            max_size: 5_000_000_000,
            ..GenConfig::default()
        },
    ] {
        assert!(matches!(
            generate(&config, 0),
            Err(GenError::InvalidConfig { .. })
        ));
    }
}

#[test]
fn test_walls_border_every_free_tile() {
    let map = generate(&GenConfig::default(), 77).unwrap();
    let ts = map.tileset;
    let grid = &map.grid;
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let p = Point::new(x, y);
            if !ts.is_free(grid.get(p).unwrap()) {
                continue;
            }
            for (dx, dy) in SURROUNDING {
                if let Some(n) = grid.offset(p, dx, dy) {
                    assert_ne!(grid.get(n), Some(ts.default_tile()), "free {p:?} touches default");
                }
            }
        }
    }
}

#[test]
fn test_default_config_map() {
    let map = generate(&GenConfig::default(), 12345).unwrap();
    assert!(map.rooms().len() > 1);
    assert!(all_rooms_connected(&map.grid, &map.tileset));
    for &p in map.grid.blocked_corners() {
        assert!(map.tileset.is_blocked(map.grid.get(p).unwrap()));
    }
    if !map.augment.hit_cap
        && let Some(r) = map.augment.final_ratio
    {
        assert!(r < EXTRA_EDGE_RATIO);
    }
}

#[test]
fn test_map_file_roundtrip() {
    let map = generate(&scenario_config(), 5).unwrap();
    let file = MapFile::from_generated(&map);
    let mut bytes = Vec::new();
    file.write_to(&mut bytes).unwrap();

    let parsed = MapFile::read_from(bytes.as_slice()).unwrap();
    parsed.validate_tiles(&map.tileset).unwrap();
    assert_eq!(parsed.starting_square, map.starting_square);
    assert_eq!(parsed.to_grid().unwrap(), map.grid);
}

#[test]
fn test_render_matches_grid() {
    let map = generate(&scenario_config(), 9).unwrap();
    let text = render(&map.grid, &map.tileset, false);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 16);
    assert!(lines.iter().all(|l| l.chars().count() == 16));
    let floor = text.chars().filter(|&c| c == '.').count();
    assert_eq!(floor, map.grid.count(|t| map.tileset.is_free(t)));
}

#[test]
fn test_stages_individually() {
    let mut generator = Generator::new(scenario_config(), GameRng::new(31)).unwrap();
    generator.place_rooms();
    let mut connection = generator.connect().unwrap();
    let ts = *generator.tileset();
    assert!(all_rooms_connected(generator.grid(), &ts));

    let report = generator.augment(&mut connection).unwrap();
    for c in &report.added {
        assert!(connection.distances.has_direct(c.from_room, c.to_room));
    }
    assert!(generator.finish() > 0);
}

#[test]
fn test_zero_threshold_links_remaining_pair() {
    let ts = Tileset::new(4, 5).unwrap();
    let mut grid = TileGrid::new(30, 8, ts.default_tile());
    let mut rng = GameRng::new(8);
    for room in [Room::new(2, 2, 2, 2), Room::new(12, 2, 2, 2), Room::new(22, 2, 2, 2)] {
        grid.stamp_room(room, &ts, &mut rng);
    }
    let graph = RoomGraph::new(grid.rooms());
    let mut distances = TreeDistances::from_tree(3, &[(0, 1, 20.0), (1, 2, 20.0)]);

    // every pair qualifies; only (0, 2) lacks a corridor
    let report = EdgeAugmenter::new(0.0)
        .run(&mut grid, &ts, &graph, &mut distances, &mut rng)
        .unwrap();
    assert_eq!(report.added.len(), 1);
    assert!(report.final_ratio.is_none());
    assert!(!report.hit_cap);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_rooms_keep_their_distance(seed in any::<u64>(), min in 2usize..4, extra in 0usize..3) {
        let config = GenConfig {
            width: 32,
            height: 24,
            min_size: min,
            max_size: min + extra,
            ..scenario_config()
        };
        let mut generator = Generator::new(config, GameRng::new(seed)).unwrap();
        generator.place_rooms();
        let rooms = generator.grid().rooms();
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                prop_assert!(a.gap_distance(b) > min as f64);
            }
        }
    }

    #[test]
    fn prop_tree_spans_and_corridors_connect(seed in any::<u64>()) {
        let config = GenConfig { width: 28, height: 20, ..scenario_config() };
        let mut generator = Generator::new(config, GameRng::new(seed)).unwrap();
        generator.place_rooms();
        let n = generator.grid().rooms().len();
        let tree = RoomGraph::new(generator.grid().rooms()).minimum_spanning_tree();
        prop_assert_eq!(tree.len(), n.saturating_sub(1));
        prop_assert!(tree.spans(n));

        generator.connect().unwrap();
        let ts = *generator.tileset();
        prop_assert!(all_rooms_connected(generator.grid(), &ts));
    }

    #[test]
    fn prop_augmenter_halts_below_threshold(seed in any::<u64>()) {
        let map = generate(&GenConfig { width: 32, height: 32, ..scenario_config() }, seed).unwrap();
        if !map.augment.hit_cap && let Some(r) = map.augment.final_ratio {
            prop_assert!(r < EXTRA_EDGE_RATIO);
        }
    }

    #[test]
    fn prop_map_file_roundtrip(seed in any::<u64>()) {
        let map = generate(&scenario_config(), seed).unwrap();
        let file = MapFile::from_generated(&map);
        let mut bytes = Vec::new();
        file.write_to(&mut bytes).unwrap();
        let parsed = MapFile::read_from(bytes.as_slice()).unwrap();
        prop_assert_eq!(parsed, file);
    }
}
