//! Per-frame path resolution.
//!
//! Frames live on storage as numbered files, e.g. `/sdcard/video/group0/out001.bin`.
//! A [`PathPattern`] holds the printf-style template with its single integer
//! conversion already parsed, so resolving a frame path cannot fail.

use std::fmt;

use super::PlaybackError;

/// Maximum length in bytes of a pattern and of a resolved path.
pub const MAX_PATH_LEN: usize = 127;

/// Parsed integer conversion (`%d`, `%03d`, `%5u`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conversion {
    zero_pad: bool,
    width: usize,
}

/// A validated frame path template with exactly one integer placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    prefix: String,
    conversion: Conversion,
    suffix: String,
}

impl PathPattern {
    /// Parse a pattern such as `"/sdcard/video/group0/out%03d.bin"`.
    pub fn parse(pattern: &str) -> Result<Self, PlaybackError> {
        if pattern.is_empty() {
            return Err(PlaybackError::EmptyPattern);
        }
        if pattern.len() > MAX_PATH_LEN {
            return Err(PlaybackError::PatternTooLong { len: pattern.len() });
        }

        let invalid = |reason| PlaybackError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if conversion.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let zero_pad = chars.next_if_eq(&'0').is_some();
            let mut width = 0usize;
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                width = width * 10 + d.to_digit(10).unwrap_or(0) as usize;
                if width > MAX_PATH_LEN {
                    return Err(invalid("field width too large"));
                }
            }
            match chars.next() {
                Some('d' | 'i' | 'u') => {}
                Some(_) => return Err(invalid("only integer conversions are supported")),
                None => return Err(invalid("dangling '%'")),
            }
            if conversion.is_some() {
                return Err(invalid("more than one integer placeholder"));
            }
            conversion = Some(Conversion { zero_pad, width });
        }

        let conversion = conversion.ok_or_else(|| invalid("no integer placeholder"))?;
        Ok(Self {
            source: pattern.to_string(),
            prefix,
            conversion,
            suffix,
        })
    }

    /// The pattern as it was given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Resolve the path of a 1-based frame number.
    ///
    /// The result is cut to [`MAX_PATH_LEN`] bytes, on a char boundary.
    pub fn resolve(&self, frame: u32) -> String {
        let Conversion { zero_pad, width } = self.conversion;
        let mut path = if zero_pad {
            format!("{}{:0width$}{}", self.prefix, frame, self.suffix)
        } else {
            format!("{}{:width$}{}", self.prefix, frame, self.suffix)
        };

        if path.len() > MAX_PATH_LEN {
            let mut end = MAX_PATH_LEN;
            while !path.is_char_boundary(end) {
                end -= 1;
            }
            path.truncate(end);
        }
        path
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
