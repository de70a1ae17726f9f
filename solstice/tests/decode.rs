use solstice::{
    BlockCosmeticType, BlockFunctionalType, Code, Direction, EntityType, Error, FloorCosmeticType,
    GameData, RoomExit, WallSide, WallType, ROOM_INDEX_COUNT, SENTINEL_ROOM,
};

const INDEX_START: usize = 0x18000;
const IMAGE_SIZE: usize = 0x20000;

struct ImageBuilder {
    image: Vec<u8>,
}

impl ImageBuilder {
    fn new() -> ImageBuilder {
        ImageBuilder {
            image: vec![0; IMAGE_SIZE],
        }
    }

    fn room(mut self, number: usize, ptr: u16, record: &[u8]) -> ImageBuilder {
        self.image[INDEX_START + number] = ptr as u8;
        self.image[INDEX_START + ROOM_INDEX_COUNT + number] = (ptr >> 8) as u8;
        let offset = 0x10000 + ptr as usize;
        let end = (offset + record.len()).min(IMAGE_SIZE);
        self.image[offset..end].copy_from_slice(&record[..end - offset]);
        self
    }

    fn build(self) -> Vec<u8> {
        self.image
    }

    fn build_with_header(self) -> Vec<u8> {
        let mut rom = vec![0x4e, 0x45, 0x53, 0x1a, 0x08, 0x10, 0x12, 0x00];
        rom.resize(16, 0);
        rom.extend_from_slice(&self.image);
        rom
    }
}

fn sample_room() -> Vec<u8> {
    let mut r = vec![
        0x2b, 0x09, 0x11, // palette
        0x01, // size: 6 wide, 7 high
        0x01, // one entity
        0x13, 0x42, 0x31, 0x16, 0x27, //
        0x80, 0x41, // window masks
        0x16, 0x0e, // walls
        0x11, 0x20, // floors
        0xff, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, // floor mask
        0b100011, // exits: floor, se, sw
        0x05, 0x3f, // floor: dest, position
        0x0a, 0x07, // se: position, dest
        0x01, 0x08, // sw: position, dest
        0x02, // static blocks
        0x00, 0x21, 0x00, 0x01, //
        0x05, 0x33, 0x02, 0x00,
    ];
    r.extend_from_slice(&[0xee; 12]);
    r.extend_from_slice(&[
        0x01, // dynamic blocks
        0x00, 0x55, 0x00, 0x05,
    ]);
    r.extend_from_slice(&[0xee; 12]);
    r
}

fn bad_block_room() -> Vec<u8> {
    let mut r = vec![0; 19];
    r.extend_from_slice(&[0x01, 0x00, 0x00, 0x08, 0x01]);
    r
}

fn sample_data() -> GameData {
    let image = ImageBuilder::new()
        .room(0, 0x9000, &sample_room())
        .room(2, 0xfffe, &[0x01, 0x02])
        .room(3, 0x9200, &bad_block_room())
        .build();
    solstice::load(&image).unwrap()
}

#[test]
fn decodes_sample_room() {
    let gd = sample_data();
    let room = gd.room(0).unwrap();

    assert_eq!(room.number, 0);
    assert_eq!(room.palette, [0x2b, 0x09, 0x11]);
    assert_eq!((room.width, room.height), (6, 7));

    assert_eq!(room.entities.len(), 1);
    let e = &room.entities[0];
    assert!(e.entity_type().is(EntityType::SlidingCrystalBall));
    assert_eq!((e.x(), e.y(), e.z(), e.extra()), (2, 4, 1, 3));
    assert_eq!((e.color1(), e.color2()), (0x16, 0x27));

    assert!(room.has_window(WallSide::NW, 0));
    assert!(!room.has_window(WallSide::NW, 1));
    assert!(room.has_window(WallSide::NE, 1));
    assert!(room.has_window(WallSide::NE, 7));
    assert_eq!(room.wall_nw, Code::Known(WallType::Logs4));
    assert_eq!(room.wall_ne, Code::Known(WallType::Stone1));

    assert_eq!(room.floor1.behavior, 1);
    assert!(room.floor1.cosmetic.is(FloorCosmeticType::Stone));
    assert_eq!(room.floor2.behavior, 2);
    assert!(room.floor2.cosmetic.is(FloorCosmeticType::Empty));

    assert_eq!(room.exits.floor, Some(RoomExit::new(5, 0, 0)));
    assert_eq!(room.exits.se, Some(RoomExit::new(7, 2, 1)));
    assert_eq!(room.exits.sw, Some(RoomExit::new(8, 1, 0)));
    assert!(!room.has_exit(Direction::Ceiling));
    assert!(!room.has_exit(Direction::NW));
    assert!(!room.has_exit(Direction::NE));

    assert_eq!(room.static_blocks.len(), 2);
    assert!(room.static_blocks[0]
        .cosmetic()
        .is(BlockCosmeticType::Solid));
    assert!(room.static_blocks[1]
        .cosmetic()
        .is(BlockCosmeticType::TransparentOutlined));
    assert_eq!(room.dynamic_blocks.len(), 1);
    assert!(room.dynamic_blocks[0]
        .functional()
        .is(BlockFunctionalType::AppearsWhenTouched));
}

#[test]
fn sample_room_visibility() {
    let gd = sample_data();
    let room = gd.room(0).unwrap();

    assert_eq!(room.floor_visible.height(), 7);
    assert_eq!(room.floor_visible.width(), 6);
    assert_eq!(room.render_floor.height(), 7);
    assert_eq!(room.render_floor.width(), 6);

    for row in 0..7 {
        assert!(room.floor_visible.get(row, 0));
    }
    assert!(room.floor_visible.get(6, 5));
    let visible: usize = room
        .floor_visible
        .rows()
        .map(|r| r.iter().filter(|&&b| b).count())
        .sum();
    assert_eq!(visible, 8);

    // Only the solid block at z = 0 clears the floor; the appearing block
    // at (5, 5) does not.
    assert!(!room.render_floor.get(2, 1));
    assert!(room.render_floor.get(5, 5));
    let hidden: usize = room
        .render_floor
        .rows()
        .map(|r| r.iter().filter(|&&b| !b).count())
        .sum();
    assert_eq!(hidden, 1);

    assert_eq!(room.floor_at(0, 0), Some(&room.floor1));
    assert_eq!(room.floor_at(0, 1), Some(&room.floor2));
    assert_eq!(room.floor_at(2, 1), None);
}

#[test]
fn header_does_not_change_rooms() {
    let builder = || {
        ImageBuilder::new()
            .room(0, 0x9000, &sample_room())
            .room(3, 0x9200, &bad_block_room())
    };
    let plain = solstice::load(&builder().build()).unwrap();
    let headed = solstice::load(&builder().build_with_header()).unwrap();
    assert_eq!(plain.image(), headed.image());
    assert_eq!(plain.room(0).unwrap(), headed.room(0).unwrap());
}

#[test]
fn decoding_is_repeatable() {
    let gd = sample_data();
    assert_eq!(gd.room(0).unwrap(), gd.room(0).unwrap());
    assert_eq!(gd.room(17).unwrap(), gd.room(17).unwrap());
}

#[test]
fn truncated_room_fails() {
    let gd = sample_data();
    match gd.room(2) {
        Err(Error::BufferUnderrun { address }) => assert_eq!(address, 0x1fffe),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn bad_block_coordinate_fails() {
    let gd = sample_data();
    match gd.room(3) {
        Err(Error::InvalidCoordinate { axis, value }) => {
            assert_eq!(axis, 'z');
            assert_eq!(value, 8);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn every_other_room_decodes_in_range() {
    let gd = sample_data();
    for (number, room) in gd.rooms() {
        if number == 2 || number == 3 {
            assert!(room.is_err());
            continue;
        }
        let room = room.unwrap();
        assert!(room.width >= 3 && room.width <= 7);
        assert!(room.height >= 3 && room.height <= 7);
        assert_eq!(room.floor_visible.rows().count(), room.height);
        assert!(room.floor_visible.rows().all(|r| r.len() == room.width));
        assert_eq!(room.render_floor.rows().count(), room.height);
        for b in room.static_blocks.iter() {
            assert!(b.x() < 8 && b.y() < 8 && b.z() < 8);
        }
        for b in room.dynamic_blocks.iter() {
            assert!(b.x() < 8 && b.y() < 8 && b.z() < 8);
        }
        for e in room.entities.iter() {
            assert!(e.x() < 16 && e.y() < 16 && e.z() < 8);
        }
    }
}

#[test]
fn sentinel_room_is_fixed() {
    let gd = sample_data();
    let room = gd.room(SENTINEL_ROOM).unwrap();
    assert_eq!((room.width, room.height), (7, 7));
    assert_eq!(room.palette, [43, 9, 17]);
    assert_eq!(room.exits.iter().count(), 1);
    assert_eq!(room.exit(Direction::SE), Some(&RoomExit::new(243, 0, 0)));
    assert!(room.floor1.cosmetic.is(FloorCosmeticType::ForestDirt));
    assert!(room.render_floor.rows().all(|r| r.iter().all(|&b| b)));
}

#[test]
fn unknown_room_number() {
    let gd = sample_data();
    match gd.room(253) {
        Err(Error::UnknownRoomNumber(n)) => assert_eq!(n, 253),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn exit_graph() {
    let image = ImageBuilder::new().room(0, 0x9000, &sample_room()).build();
    let gd = solstice::load(&image).unwrap();
    let graph = gd.exit_graph();
    assert!(graph.failures.is_empty());
    let edges = graph.edges;
    assert_eq!(&edges[..3], &[(0, 5), (0, 7), (0, 8)]);
    assert_eq!(edges.last(), Some(&(SENTINEL_ROOM, 243)));
    assert_eq!(edges.len(), 4);
}

#[test]
fn exit_graph_keeps_rooms_around_a_bad_one() {
    let image = ImageBuilder::new()
        .room(0, 0x9000, &sample_room())
        .room(1, 0xfffe, &[0x01, 0x02])
        .build();
    let gd = solstice::load(&image).unwrap();
    let graph = gd.exit_graph();

    assert_eq!(graph.failures.len(), 1);
    match &graph.failures[0] {
        (1, Error::BufferUnderrun { address }) => assert_eq!(*address, 0x1fffe),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        graph.edges,
        vec![(0, 5), (0, 7), (0, 8), (SENTINEL_ROOM, 243)]
    );
}

#[test]
fn room_serializes_to_json() {
    let gd = sample_data();
    let room = gd.room(0).unwrap();
    let json = serde_json::to_value(&room).unwrap();
    assert_eq!(json["window_mask_nw"], "0x80");
    assert_eq!(json["width"], 6);
    assert_eq!(json["exits"]["se"]["room"], 7);
    assert!(json["exits"]["ceiling"].is_null());
}
