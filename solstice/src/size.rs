// Room size bytes fall into four bands. Within a band, odd steps shrink the
// width and even steps shrink the height, so only one dimension changes per
// step. Anything past the last band is the minimum 3x3 room.
const SIZE_BANDS: [(u8, u8, usize); 4] = [
    // (first, last, base dimension)
    (0x00, 0x08, 7),
    (0x09, 0x0f, 6),
    (0x10, 0x14, 5),
    (0x15, 0x17, 4),
];

const MIN_DIMENSION: usize = 3;

/// Decodes a room size byte into `(width, height)`.
pub fn room_size(size: u8) -> (usize, usize) {
    for &(first, last, base) in SIZE_BANDS.iter() {
        if size >= first && size <= last {
            let x = (size - first) as usize;
            let width = if x & 0x1 == 0x1 {
                base - ((x + 1) >> 1)
            } else {
                base
            };
            let height = if x & 0x1 == 0x0 { base - (x >> 1) } else { base };
            return (width, height);
        }
    }

    (MIN_DIMENSION, MIN_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_starts() {
        assert_eq!(room_size(0x00), (7, 7));
        assert_eq!(room_size(0x09), (6, 6));
        assert_eq!(room_size(0x10), (5, 5));
        assert_eq!(room_size(0x15), (4, 4));
        assert_eq!(room_size(0x18), (3, 3));
        assert_eq!(room_size(0xff), (3, 3));
    }

    #[test]
    fn odd_steps_shrink_width() {
        assert_eq!(room_size(0x01), (6, 7));
        assert_eq!(room_size(0x03), (5, 7));
        assert_eq!(room_size(0x0a), (5, 6));
        assert_eq!(room_size(0x16), (3, 4));
    }

    #[test]
    fn even_steps_shrink_height() {
        assert_eq!(room_size(0x02), (7, 6));
        assert_eq!(room_size(0x08), (7, 3));
        assert_eq!(room_size(0x0f), (6, 3));
        assert_eq!(room_size(0x14), (5, 3));
        assert_eq!(room_size(0x17), (4, 3));
    }

    #[test]
    fn every_size_is_in_range() {
        for b in 0..=0xffu8 {
            let (w, h) = room_size(b);
            assert!(w >= 3 && w <= 7, "width {} for {:#04x}", w, b);
            assert!(h >= 3 && h <= 7, "height {} for {:#04x}", h, b);
        }
    }
}
