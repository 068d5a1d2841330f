#![allow(missing_docs)]

use std::f32::consts::PI;

use feorh::simulation::agent::{
    DirectionalRaycast, Perception, QuadrantSampling, Sense, Species, Viewpoint,
};
use feorh::simulation::params::{SensingMode, SensingParams};
use feorh::simulation::tile::{Tile, TileMap};

const TILE: f32 = 30.0;

fn center_of(col: i64, row: i64) -> (f32, f32) {
    ((col as f32 + 0.5) * TILE, (row as f32 + 0.5) * TILE)
}

fn viewpoint(species: Species, (x, y): (f32, f32), heading: f32) -> Viewpoint {
    Viewpoint {
        species,
        x,
        y,
        heading,
    }
}

/// 20 × 20 dirt field with a wall at (5, 10) and grass at (9, 7).
fn raycast_map() -> TileMap {
    let mut rows = vec![vec!['d'; 20]; 20];
    rows[10][5] = '#';
    rows[7][9] = 'g';
    let text: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    TileMap::from_ascii(&text.join("\n"), TILE).unwrap()
}

#[test]
fn test_quadrant_all_wall_window() {
    let map = TileMap::from_ascii(
        "#######\n#######\n#######\n#######\n#######\n#######\n######d\n",
        TILE,
    )
    .unwrap();
    let sense = QuadrantSampling::new(5).unwrap();

    let observation = sense.sense(&viewpoint(Species::Prey, center_of(2, 2), 0.0), &map);

    assert_eq!(observation.len(), 5);
    assert!(observation.tiles().iter().all(|t| *t == Tile::Wall));
}

#[test]
fn test_quadrant_off_map_reads_as_wall() {
    let map = TileMap::from_ascii("ddd\nddd\nddd\n", TILE).unwrap();
    let sense = QuadrantSampling::new(5).unwrap();

    let observation = sense.sense(&viewpoint(Species::Predator, (-500.0, -500.0), 0.0), &map);

    assert_eq!(observation.tiles(), &[Tile::Wall; 5]);
}

#[test]
fn test_quadrant_region_order_and_center() {
    // Up strip grass, down strip wood, left and right dirt; agent stands on dirt.
    let map = TileMap::from_ascii(
        "ggggg\nggggg\nddddd\nwwwww\nwwwww\n",
        TILE,
    )
    .unwrap();
    let sense = QuadrantSampling::new(5).unwrap();

    let observation = sense.sense(&viewpoint(Species::Prey, center_of(2, 2), 0.0), &map);

    // Left and right regions cover rows 1..4: one grass, one dirt, one wood
    // per column, so the tie goes to dirt.
    assert_eq!(
        observation.tiles(),
        &[Tile::Grass, Tile::Wood, Tile::Dirt, Tile::Dirt, Tile::Dirt]
    );
}

#[test]
fn test_quadrant_enemy_marker_wins() {
    let mut map = TileMap::from_ascii("ggggg\nggggg\nggggg\nggggg\nggggg\n", TILE).unwrap();
    map.stamp((2, 0), Tile::Tiger);
    map.stamp((0, 2), Tile::Deer);
    // The observer's own marker must not leak into the center slot.
    map.stamp((2, 2), Tile::Deer);
    let sense = QuadrantSampling::new(5).unwrap();

    let prey_view = sense.sense(&viewpoint(Species::Prey, center_of(2, 2), 0.0), &map);
    assert_eq!(prey_view.tiles()[0], Tile::Tiger);
    assert_eq!(prey_view.tiles()[2], Tile::Grass);
    assert_eq!(prey_view.tiles()[4], Tile::Grass);

    let predator_view = sense.sense(&viewpoint(Species::Predator, center_of(2, 2), 0.0), &map);
    assert_eq!(predator_view.tiles()[0], Tile::Grass);
    assert_eq!(predator_view.tiles()[2], Tile::Deer);
}

#[test]
fn test_quadrant_tie_break_uses_tag_order() {
    let tiles = [
        Tile::Wood,
        Tile::Grass,
        Tile::Dirt,
        Tile::Wood,
        Tile::Grass,
        Tile::Dirt,
    ];
    assert_eq!(QuadrantSampling::summarise(&tiles, Tile::Tiger), Tile::Dirt);

    let tiles = [Tile::Wood, Tile::Grass, Tile::Wood, Tile::Grass, Tile::Wall, Tile::Wall];
    assert_eq!(QuadrantSampling::summarise(&tiles, Tile::Tiger), Tile::Wall);
}

#[test]
fn test_raycast_angles_are_symmetric() {
    let raycast = DirectionalRaycast::new(7, 2.0 * PI / 3.0, 40.0, 6);
    let angles = raycast.ray_angles(1.0);

    assert_eq!(angles.len(), 7);
    assert!((angles[3] - 1.0).abs() < 1e-5);
    assert!((angles[0] - (1.0 - PI / 3.0)).abs() < 1e-5);
    assert!((angles[6] - (1.0 + PI / 3.0)).abs() < 1e-5);
    assert!(angles.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_raycast_wall_on_center_ray() {
    let map = raycast_map();
    let raycast = DirectionalRaycast::new(7, 2.0 * PI / 3.0, 40.0, 6);

    let observation = raycast.sense(&viewpoint(Species::Prey, (45.0, 315.0), 0.0), &map);

    assert_eq!(observation.len(), 8);
    // Slot 0 is the terrain underfoot, rays follow in increasing angle.
    assert_eq!(observation.tiles()[0], Tile::Dirt);
    assert_eq!(observation.tiles()[4], Tile::Wall);
    // The +20° ray ends its sixth step on the grass tile.
    assert_eq!(observation.tiles()[5], Tile::Grass);
    for slot in [1, 2, 3, 6, 7] {
        assert_eq!(observation.tiles()[slot], Tile::Dirt, "slot {slot}");
    }
}

#[test]
fn test_raycast_off_map_is_wall() {
    let map = TileMap::from_ascii("ddd\nddd\nddd\n", TILE).unwrap();
    let raycast = DirectionalRaycast::new(1, 2.0 * PI / 3.0, 40.0, 6);

    let observation = raycast.sense(&viewpoint(Species::Prey, center_of(0, 1), PI), &map);

    assert_eq!(observation.tiles(), &[Tile::Dirt, Tile::Wall]);
}

#[test]
fn test_raycast_stops_at_enemy_marker() {
    let mut map = raycast_map();
    // Second step of the center ray from (45, 315) lands in column 4.
    map.stamp((4, 10), Tile::Tiger);
    let raycast = DirectionalRaycast::new(7, 2.0 * PI / 3.0, 40.0, 6);

    let prey_view = raycast.sense(&viewpoint(Species::Prey, (45.0, 315.0), 0.0), &map);
    assert_eq!(prey_view.tiles()[4], Tile::Tiger);

    // Predators look through other predators.
    let predator_view = raycast.sense(&viewpoint(Species::Predator, (45.0, 315.0), 0.0), &map);
    assert_eq!(predator_view.tiles()[4], Tile::Wall);
}

#[test]
fn test_perception_from_params() {
    let mut params = SensingParams::default();
    let perception = Perception::from_params(&params).unwrap();
    assert_eq!(perception.name(), "Directional");
    assert_eq!(perception.observation_len(), 8);
    assert_eq!(perception.observation_len(), params.observation_len());

    params.mode = SensingMode::Quadrant;
    let perception = Perception::from_params(&params).unwrap();
    assert_eq!(perception.name(), "Quadrant");
    assert_eq!(perception.observation_len(), 5);
    assert_eq!(perception.observation_len(), params.observation_len());
}

#[test]
fn test_quadrant_rejects_bad_window() {
    for window in [0, 1, 2, 4] {
        assert!(QuadrantSampling::new(window).is_err(), "window {window}");
    }
    assert!(QuadrantSampling::new(3).is_ok());

    let params = SensingParams {
        mode: SensingMode::Quadrant,
        window_size: 1,
        ..SensingParams::default()
    };
    assert!(Perception::from_params(&params).is_err());
}
