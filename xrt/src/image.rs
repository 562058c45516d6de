//! Program image loading
//!
//! Image is text, one byte per line written as a binary literal. Anything
//! after `#` is a comment, blank lines are skipped.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```

use {
    ls8vm::RAM_SIZE,
    memmap2::Mmap,
    std::{fmt, fs::File, io, path::Path},
};

/// Image could not be loaded
#[derive(Debug)]
pub enum ImageError {
    /// Opening or mapping the file failed
    Io(io::Error),
    /// File holds no instruction bytes
    Empty,
    /// File is not text
    NotUtf8,
    /// Line is not a binary byte literal
    InvalidLine { line: usize, text: String },
    /// Image does not fit into RAM
    TooLarge { line: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Empty => f.write_str("image is empty"),
            Self::NotUtf8 => f.write_str("image is not valid UTF-8 text"),
            Self::InvalidLine { line, text } => {
                write!(f, "line {line}: {text:?} is not an 8-bit binary literal")
            }
            Self::TooLarge { line } => {
                write!(f, "line {line}: image exceeds {RAM_SIZE} bytes of RAM")
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Memory map image file and parse it
pub fn read(path: impl AsRef<Path>) -> Result<Vec<u8>, ImageError> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(ImageError::Empty);
    }

    // SAFETY: Mapping is read-only and dropped before returning, the image
    // file is not expected to change while being parsed
    let map = unsafe { Mmap::map(&file)? };
    parse(std::str::from_utf8(&map).map_err(|_| ImageError::NotUtf8)?)
}

/// Parse image text into bytes, first byte goes to address 0
pub fn parse(text: &str) -> Result<Vec<u8>, ImageError> {
    let mut image = vec![];
    for (n, line) in text.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        if !code.bytes().all(|b| matches!(b, b'0' | b'1')) {
            return Err(ImageError::InvalidLine {
                line: n + 1,
                text: line.to_owned(),
            });
        }

        let byte = u8::from_str_radix(code, 2).map_err(|_| ImageError::InvalidLine {
            line: n + 1,
            text: line.to_owned(),
        })?;

        if image.len() == RAM_SIZE {
            return Err(ImageError::TooLarge { line: n + 1 });
        }
        image.push(byte);
    }

    if image.is_empty() {
        return Err(ImageError::Empty);
    }

    Ok(image)
}
