use byteorder::ReadBytesExt;
use std::io::{Cursor, Seek, SeekFrom};

use super::Error;

/// Forward-only reader over one bounded span of the cartridge image.
///
/// Every read is checked against the span; running off the end yields
/// `Error::BufferUnderrun` carrying the absolute image address of the
/// failed read.
pub struct RomReader<'a> {
    cursor: Cursor<&'a [u8]>,
    base_offset: usize,
}

impl<'a> RomReader<'a> {
    /// Opens a reader at `base_offset`, covering at most `max_len` bytes.
    pub fn new(
        data: &'a [u8],
        base_offset: usize,
        max_len: usize,
    ) -> Result<RomReader<'a>, Error> {
        if base_offset > data.len() {
            return Err(Error::BufferUnderrun {
                address: base_offset,
            });
        }
        let end = data.len().min(base_offset.saturating_add(max_len));

        Ok(RomReader {
            cursor: Cursor::new(&data[base_offset..end]),
            base_offset: base_offset,
        })
    }

    pub fn cur_address(&self) -> usize {
        self.base_offset + self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.cursor.position() as usize
    }

    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let address = self.cur_address();
        self.cursor
            .read_u8()
            .map_err(|_| Error::BufferUnderrun { address: address })
    }

    pub fn read_array<A: Default + AsMut<[u8]>>(&mut self) -> Result<A, Error> {
        let mut buf = A::default();
        let len = buf.as_mut().len();
        if self.remaining() < len {
            return Err(Error::BufferUnderrun {
                address: self.cur_address(),
            });
        }
        for b in buf.as_mut().iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(buf)
    }

    /// Steps over `len` bytes of data that is not decoded.
    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        if self.remaining() < len {
            return Err(Error::BufferUnderrun {
                address: self.cur_address(),
            });
        }
        self.cursor
            .seek(SeekFrom::Current(len as i64))
            .map_err(|_| Error::BufferUnderrun {
                address: self.cur_address(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_reader() {
        let data = [
            0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xe, 0xf,
        ];

        let mut r = RomReader::new(&data, 0x4, 0x400).unwrap();
        assert_eq!(r.cur_address(), 0x4);

        let rdata: [u8; 4] = r.read_array().unwrap();
        assert_eq!(rdata, [0x4, 0x5, 0x6, 0x7]);
        assert_eq!(r.cur_address(), 0x8);
        assert_eq!(r.remaining(), 8);
    }

    #[test]
    fn span_is_capped() {
        let data = [0u8; 16];
        let mut r = RomReader::new(&data, 2, 3).unwrap();
        r.skip(3).unwrap();
        match r.read_byte() {
            Err(Error::BufferUnderrun { address }) => assert_eq!(address, 5),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn skip_past_end_fails_without_moving() {
        let data = [0u8; 8];
        let mut r = RomReader::new(&data, 0, 0x400).unwrap();
        assert!(r.skip(9).is_err());
        assert_eq!(r.cur_address(), 0);
        r.skip(8).unwrap();
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_array_read_fails() {
        let data = [0x1, 0x2];
        let mut r = RomReader::new(&data, 0, 0x400).unwrap();
        let res: Result<[u8; 4], Error> = r.read_array();
        assert!(res.is_err());
    }

    #[test]
    fn offset_past_end_fails() {
        let data = [0u8; 4];
        assert!(RomReader::new(&data, 5, 0x400).is_err());
        assert!(RomReader::new(&data, 4, 0x400).is_ok());
    }
}
