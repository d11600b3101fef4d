use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: [u8; 4],
    pub port: u16,
    /// Ceiling on the serialized body of a share request, in bytes.
    pub max_payload_bytes: usize,
    pub id_length: usize,
    /// Directory of static assets served ahead of the embedded web map.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: [0, 0, 0, 0],
            port: 3001,
            max_payload_bytes: 20 * 1024 * 1024,
            id_length: 8,
            static_dir: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '20MB', '512KB' or '1048576'")]
pub struct SizeParseError {
    input: String,
}

/// Parse a human-readable size such as `"20MB"`, `"512 kb"` or `"1024"` into bytes.
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let err = || SizeParseError {
        input: s.to_string(),
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(err());
    }

    // Two-letter suffixes first so "MB" is not read as "B".
    const SUFFIXES: [(&str, usize); 7] = [
        ("GB", 1 << 30),
        ("MB", 1 << 20),
        ("KB", 1 << 10),
        ("G", 1 << 30),
        ("M", 1 << 20),
        ("K", 1 << 10),
        ("B", 1),
    ];

    let upper = trimmed.to_ascii_uppercase();
    let (digits, multiplier) = SUFFIXES
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map(|(suffix, mult)| (trimmed[..trimmed.len() - suffix.len()].trim(), *mult))
        .unwrap_or((trimmed, 1));

    let n: usize = digits.parse().map_err(|_| err())?;
    n.checked_mul(multiplier).ok_or_else(err)
}

/// Byte count rendered in the largest whole unit, e.g. `20 MB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanSize(pub usize);

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(&str, usize); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];
        for (unit, size) in UNITS {
            if self.0 >= size {
                let value = self.0 as f64 / size as f64;
                return if self.0 % size == 0 {
                    write!(f, "{} {}", self.0 / size, unit)
                } else {
                    write!(f, "{:.1} {}", value, unit)
                };
            }
        }
        write!(f, "{} bytes", self.0)
    }
}
