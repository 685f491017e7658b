//! LZW dictionary (code table) management.
//!
//! Entries are stored as `(prefix code, suffix byte)` pairs rather than whole
//! byte strings. The encoder only needs the forward lookup; the decoder walks
//! prefix chains to expand a code.

use crate::format::{ALPHABET_LENGTH, BIGGEST_MAX_CODE_BIT_LENGTH, first_free_code};
use lzws_core::error::{LzwsError, Result};
use std::collections::HashMap;

/// Largest table any stream can need.
const MAX_TABLE_LENGTH: usize = 1 << BIGGEST_MAX_CODE_BIT_LENGTH;

#[inline]
fn entry_key(prefix: u16, byte: u8) -> u32 {
    ((prefix as u32) << 8) | byte as u32
}

/// Dictionary used while encoding.
#[derive(Debug)]
pub struct EncoderDictionary {
    /// `(prefix, byte)` -> code.
    entries: HashMap<u32, u16>,
    /// First code assigned after a reset.
    first_code: u32,
    /// Next code that will be assigned.
    next_code: u32,
    /// One past the largest assignable code.
    limit: u32,
}

impl EncoderDictionary {
    /// Create an empty dictionary.
    pub fn new(max_code_bit_length: u8, block_mode: bool) -> Result<Self> {
        let limit = 1u32 << max_code_bit_length;
        let first_code = first_free_code(block_mode);

        let mut entries = HashMap::new();
        let capacity = (limit - first_code) as usize;
        entries
            .try_reserve(capacity)
            .map_err(|e| LzwsError::from_reserve(capacity, e))?;

        Ok(Self {
            entries,
            first_code,
            next_code: first_code,
            limit,
        })
    }

    /// Forget every learned entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_code = self.first_code;
    }

    /// Code for `prefix` extended by `byte`, if known.
    #[inline]
    pub fn find(&self, prefix: u16, byte: u8) -> Option<u16> {
        self.entries.get(&entry_key(prefix, byte)).copied()
    }

    /// Learn `prefix` extended by `byte`. Returns `false` if the table is full.
    pub fn insert(&mut self, prefix: u16, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.insert(entry_key(prefix, byte), self.next_code as u16);
        self.next_code += 1;
        true
    }

    /// Whether every code has been assigned.
    pub fn is_full(&self) -> bool {
        self.next_code >= self.limit
    }

    /// Next code that will be assigned.
    pub fn next_code(&self) -> u32 {
        self.next_code
    }
}

/// Dictionary used while decoding.
#[derive(Debug)]
pub struct DecoderDictionary {
    /// Prefix code of each entry.
    prefixes: Vec<u16>,
    /// Last byte of each entry.
    suffixes: Vec<u8>,
    /// First byte of each entry.
    firsts: Vec<u8>,
    /// First code assigned after a reset.
    first_code: u32,
    /// Next code that will be assigned.
    next_code: u32,
    /// One past the largest assignable code.
    limit: u32,
}

impl DecoderDictionary {
    /// Allocate a table large enough for any stream.
    ///
    /// The table is sized for 16-bit codes because the actual maximum is only
    /// known once the header has been read; call [`configure`] then.
    ///
    /// [`configure`]: DecoderDictionary::configure
    pub fn new() -> Result<Self> {
        let mut prefixes = Vec::new();
        let mut suffixes = Vec::new();
        let mut firsts = Vec::new();
        prefixes
            .try_reserve_exact(MAX_TABLE_LENGTH)
            .map_err(|e| LzwsError::from_reserve(MAX_TABLE_LENGTH * 2, e))?;
        suffixes
            .try_reserve_exact(MAX_TABLE_LENGTH)
            .map_err(|e| LzwsError::from_reserve(MAX_TABLE_LENGTH, e))?;
        firsts
            .try_reserve_exact(MAX_TABLE_LENGTH)
            .map_err(|e| LzwsError::from_reserve(MAX_TABLE_LENGTH, e))?;

        prefixes.resize(MAX_TABLE_LENGTH, 0);
        suffixes.resize(MAX_TABLE_LENGTH, 0);
        firsts.resize(MAX_TABLE_LENGTH, 0);
        for byte in 0..ALPHABET_LENGTH as usize {
            suffixes[byte] = byte as u8;
            firsts[byte] = byte as u8;
        }

        let first_code = first_free_code(true);
        Ok(Self {
            prefixes,
            suffixes,
            firsts,
            first_code,
            next_code: first_code,
            limit: MAX_TABLE_LENGTH as u32,
        })
    }

    /// Apply the parameters read from the stream header and reset.
    pub fn configure(&mut self, max_code_bit_length: u8, block_mode: bool) {
        self.limit = 1u32 << max_code_bit_length;
        self.first_code = first_free_code(block_mode);
        self.reset();
    }

    /// Forget every learned entry.
    pub fn reset(&mut self) {
        self.next_code = self.first_code;
    }

    /// Next code that will be assigned.
    pub fn next_code(&self) -> u32 {
        self.next_code
    }

    /// Whether `code` is a literal or a learned entry.
    #[inline]
    pub fn contains(&self, code: u16) -> bool {
        (code as u32) < ALPHABET_LENGTH
            || ((code as u32) >= self.first_code && (code as u32) < self.next_code)
    }

    /// First byte of the string for `code`.
    #[inline]
    pub fn first_byte(&self, code: u16) -> u8 {
        self.firsts[code as usize]
    }

    /// Learn the string for `prefix` extended by `byte`. Ignored when full.
    pub fn insert(&mut self, prefix: u16, byte: u8) {
        if self.next_code >= self.limit {
            return;
        }
        let code = self.next_code as usize;
        self.prefixes[code] = prefix;
        self.suffixes[code] = byte;
        self.firsts[code] = self.firsts[prefix as usize];
        self.next_code += 1;
    }

    /// Append the string for `code` to `out`.
    ///
    /// `code` must satisfy [`contains`](DecoderDictionary::contains).
    pub fn expand(&self, code: u16, out: &mut Vec<u8>) {
        let start = out.len();
        let mut current = code as usize;
        loop {
            out.push(self.suffixes[current]);
            if (current as u32) < ALPHABET_LENGTH {
                break;
            }
            current = self.prefixes[current] as usize;
        }
        out[start..].reverse();
    }
}
