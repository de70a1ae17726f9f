use failure::Fail;
use std::io;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "read past end of data at {:#07x}", address)]
    BufferUnderrun { address: usize },

    #[fail(display = "coordinate {} = {} out of range", axis, value)]
    InvalidCoordinate { axis: char, value: u8 },

    #[fail(display = "unknown room number {}", _0)]
    UnknownRoomNumber(usize),

    #[fail(display = "image too small ({} bytes)", len)]
    ImageTooSmall { len: usize },

    #[fail(display = "palette must be 192 bytes, got {}", len)]
    InvalidPalette { len: usize },

    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}
