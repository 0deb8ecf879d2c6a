use std::io::BufRead;
use std::path::Path;

use crate::errors::{ReferenceError, ReferenceResult};
use crate::utils::get_dynamic_reader;

///
/// An immutable reference sequence addressed by 1-based positions.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    sequence: Vec<u8>,
}

impl Reference {
    /// Build a reference from raw bases, uppercased.
    pub fn from_bytes(name: &str, sequence: &[u8]) -> Self {
        Reference {
            name: name.to_string(),
            sequence: sequence.to_ascii_uppercase(),
        }
    }

    ///
    /// Load the first record of a FASTA file (plain or `.gz`).
    ///
    /// Line breaks and surrounding whitespace are dropped and bases are
    /// uppercased. A missing file or a file without any record is an error.
    ///
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> ReferenceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReferenceError::NotFound(path.to_path_buf()));
        }
        let reader = get_dynamic_reader(path)?;

        let mut name: Option<String> = None;
        let mut sequence = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if let Some(header) = line.strip_prefix('>') {
                if name.is_some() {
                    // only the first record is used
                    break;
                }
                let id = header.split_whitespace().next().unwrap_or_default();
                name = Some(id.to_string());
            } else if !line.is_empty() {
                if name.is_none() {
                    return Err(ReferenceError::MissingHeader(path.display().to_string()));
                }
                sequence.extend(line.bytes().map(|b| b.to_ascii_uppercase()));
            }
        }

        match name {
            Some(name) if !sequence.is_empty() => Ok(Reference { name, sequence }),
            _ => Err(ReferenceError::EmptyReference(path.display().to_string())),
        }
    }

    /// Base at 1-based `position`, `None` outside `1..=len()`.
    pub fn base(&self, position: usize) -> Option<u8> {
        if position == 0 {
            return None;
        }
        self.sequence.get(position - 1).copied()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= 1 && position <= self.sequence.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.sequence
    }
}
