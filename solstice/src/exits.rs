use serde::Serialize;

use super::util::RomReader;
use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Floor,
    Ceiling,
    NW,
    NE,
    SE,
    SW,
}

impl Direction {
    /// Directions in the order their records appear after the exit mask.
    pub const ALL: [Direction; 6] = [
        Direction::Floor,
        Direction::Ceiling,
        Direction::NW,
        Direction::NE,
        Direction::SE,
        Direction::SW,
    ];

    /// The bit for this direction in the exit mask byte.
    pub fn mask_bit(self) -> u8 {
        match self {
            Direction::Floor => 1 << 5,
            Direction::Ceiling => 1 << 4,
            Direction::NW => 1 << 3,
            Direction::NE => 1 << 2,
            Direction::SE => 1 << 1,
            Direction::SW => 1 << 0,
        }
    }

    pub fn is_vertical(self) -> bool {
        self == Direction::Floor || self == Direction::Ceiling
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomExit {
    pub room: u8,
    pub w: u8,
    pub z: u8,
}

impl RoomExit {
    pub fn new(room: u8, w: u8, z: u8) -> RoomExit {
        RoomExit {
            room: room,
            w: w,
            z: z,
        }
    }

    // Wall exit position byte: |7 6|5 4 3|2 1 0|
    //                          | -  |  z  |  w  |
    fn from_position(room: u8, position: u8) -> RoomExit {
        RoomExit::new(room, position & 0x7, (position >> 3) & 0x7)
    }
}

/// At most one exit per direction; a direction without a record has no exit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Exits {
    pub floor: Option<RoomExit>,
    pub ceiling: Option<RoomExit>,
    pub nw: Option<RoomExit>,
    pub ne: Option<RoomExit>,
    pub se: Option<RoomExit>,
    pub sw: Option<RoomExit>,
}

impl Exits {
    pub fn get(&self, dir: Direction) -> Option<&RoomExit> {
        self.slot(dir).as_ref()
    }

    pub fn set(&mut self, dir: Direction, exit: RoomExit) {
        *self.slot_mut(dir) = Some(exit);
    }

    /// Present exits in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &RoomExit)> + '_ {
        let dirs: &'static [Direction; 6] = &Direction::ALL;
        dirs.iter()
            .filter_map(move |&dir| self.get(dir).map(|e| (dir, e)))
    }

    fn slot(&self, dir: Direction) -> &Option<RoomExit> {
        match dir {
            Direction::Floor => &self.floor,
            Direction::Ceiling => &self.ceiling,
            Direction::NW => &self.nw,
            Direction::NE => &self.ne,
            Direction::SE => &self.se,
            Direction::SW => &self.sw,
        }
    }

    fn slot_mut(&mut self, dir: Direction) -> &mut Option<RoomExit> {
        match dir {
            Direction::Floor => &mut self.floor,
            Direction::Ceiling => &mut self.ceiling,
            Direction::NW => &mut self.nw,
            Direction::NE => &mut self.ne,
            Direction::SE => &mut self.se,
            Direction::SW => &mut self.sw,
        }
    }
}

/// Reads the exit mask and the records for every flagged direction.
///
/// Floor and ceiling records are `dest, position` and their position is
/// dropped. Wall records are the other way around: `position, dest`.
pub(crate) fn read_exits(r: &mut RomReader) -> Result<Exits, Error> {
    let mask = r.read_byte()?;
    let mut exits = Exits::default();

    for &dir in Direction::ALL.iter() {
        if mask & dir.mask_bit() == 0 {
            continue;
        }
        let exit = if dir.is_vertical() {
            let dest = r.read_byte()?;
            let _position = r.read_byte()?;
            RoomExit::new(dest, 0, 0)
        } else {
            let position = r.read_byte()?;
            let dest = r.read_byte()?;
            RoomExit::from_position(dest, position)
        };
        exits.set(dir, exit);
    }

    Ok(exits)
}
