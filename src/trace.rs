use crate::error::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// The kind of memory operation recorded on a trace line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AccessKind {
    Instruction,
    Load,
    Store,
    Modify,
}

impl AccessKind {
    pub fn as_char(&self) -> char {
        match self {
            AccessKind::Instruction => 'I',
            AccessKind::Load => 'L',
            AccessKind::Store => 'S',
            AccessKind::Modify => 'M',
        }
    }
}

impl TryFrom<char> for AccessKind {
    type Error = ParseRecordError;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            'I' => Ok(AccessKind::Instruction),
            'L' => Ok(AccessKind::Load),
            'S' => Ok(AccessKind::Store),
            'M' => Ok(AccessKind::Modify),
            other => Err(ParseRecordError::UnknownKind(other)),
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reasons a single trace line can fail to parse.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseRecordError {
    #[error("empty record")]
    Empty,
    #[error("unknown access kind '{0}'")]
    UnknownKind(char),
    #[error("expected '<address>,<size>' after the access kind")]
    MissingSize,
    #[error("invalid hex address '{0}'")]
    BadAddress(String),
    #[error("invalid size '{0}'")]
    BadSize(String),
}

/// `AccessRecord` is one parsed line of a memory trace: what kind of access occurred, at which
/// address, and how many bytes were touched.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AccessRecord {
    pub kind: AccessKind,
    pub address: u64,
    pub size: u32,
}

impl AccessRecord {
    pub fn new(kind: AccessKind, address: u64, size: u32) -> Self {
        Self {
            kind,
            address,
            size,
        }
    }
}

impl FromStr for AccessRecord {
    type Err = ParseRecordError;

    /// Parse a record of the form `<kind> <hex-address>,<decimal-size>`. Surrounding whitespace is
    /// tolerated and the address carries no `0x` prefix.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim();
        let mut chars = line.chars();
        let kind = AccessKind::try_from(chars.next().ok_or(ParseRecordError::Empty)?)?;
        let (address, size) = chars
            .as_str()
            .trim_start()
            .split_once(',')
            .ok_or(ParseRecordError::MissingSize)?;

        let digits = address.trim();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseRecordError::BadAddress(address.to_string()));
        }
        let address = u64::from_str_radix(digits, 16)
            .map_err(|_| ParseRecordError::BadAddress(address.to_string()))?;
        let size = match size.trim().parse::<u32>() {
            Ok(x) if x > 0 => x,
            _ => return Err(ParseRecordError::BadSize(size.to_string())),
        };

        Ok(Self::new(kind, address, size))
    }
}

/// `TraceReader` sequentially obtains access records from a line oriented text source. Blank lines
/// are skipped; any other line that fails to parse is reported along with its line number.
pub struct TraceReader<R> {
    reader: R,
    pub line_number: u64,
}

impl TraceReader<BufReader<File>> {
    /// Open the trace file at the provided path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<AccessRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            match self.reader.read_line(&mut buffer) {
                Err(err) => return Some(Err(Error::from(err))),
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    if buffer.trim().is_empty() {
                        continue;
                    }
                    return Some(buffer.parse::<AccessRecord>().map_err(|source| {
                        Error::MalformedRecord {
                            line: self.line_number,
                            source,
                        }
                    }));
                }
            }
        }
    }
}
