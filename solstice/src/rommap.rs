// Room record pointers are stored relative to the second 64K of PRG data.
#[macro_export]
macro_rules! room_addr {
    ($ptr:expr) => {
        ($ptr as usize) + $crate::rommap::ROOM_DATA_BASE
    };
}

pub const INES_MAGIC: [u8; 4] = [0x4e, 0x45, 0x53, 0x1a];
pub const INES_HEADER_SIZE: usize = 16;

pub const ROOM_DATA_BASE: usize = 0x10000;
pub const ROOM_INDEX_START: usize = 0x18000;
pub const ROOM_INDEX_COUNT: usize = 0xfd;
pub const ROOM_INDEX_SIZE: usize = ROOM_INDEX_COUNT * 2;

// Largest room record in the cartridge.
pub const ROOM_RECORD_MAX: usize = 0x400;

pub const SENTINEL_ROOM: usize = 254;

#[cfg(test)]
mod tests {
    #[test]
    fn room_addr_macro_works() {
        assert_eq!(room_addr!(0x8c2du16), 0x18c2d);
    }
}
