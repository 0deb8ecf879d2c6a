//! BAM/SAM input.
//!
//! [`AlignmentReader`] streams a file record by record and yields
//! [`AlignedRead`]s. A record that fails to decode is returned as an error and
//! the stream carries on with the next one.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::RecordBuf;

use crate::errors::{PileupError, Result};
use crate::read::AlignedRead;

enum Inner {
    Bam(bam::io::Reader<bgzf::Reader<File>>),
    Sam(sam::io::Reader<BufReader<File>>),
}

pub struct AlignmentReader {
    inner: Inner,
    header: sam::Header,
    record: RecordBuf,
    path: PathBuf,
    records_read: u64,
    done: bool,
}

impl AlignmentReader {
    ///
    /// Open a `.bam` or `.sam` file and read its header.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let (inner, header) = match extension.as_deref() {
            Some("bam") => {
                let file = File::open(path)?;
                let mut reader = bam::io::reader::Builder::default().build_from_reader(file);
                let header = reader.read_header()?;
                (Inner::Bam(reader), header)
            }
            Some("sam") => {
                let file = File::open(path)?;
                let mut reader = sam::io::Reader::new(BufReader::new(file));
                let header = reader.read_header()?;
                (Inner::Sam(reader), header)
            }
            _ => return Err(PileupError::UnsupportedFormat(path.to_path_buf())),
        };

        Ok(AlignmentReader {
            inner,
            header,
            record: RecordBuf::default(),
            path: path.to_path_buf(),
            records_read: 0,
            done: false,
        })
    }

    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn read_next(&mut self) -> std::io::Result<usize> {
        match &mut self.inner {
            Inner::Bam(reader) => reader.read_record_buf(&self.header, &mut self.record),
            Inner::Sam(reader) => reader.read_record_buf(&self.header, &mut self.record),
        }
    }
}

impl Iterator for AlignmentReader {
    type Item = Result<AlignedRead>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_next() {
            Ok(0) => {
                self.done = true;
                log::debug!(
                    "Finished {:?} after {} records",
                    self.path,
                    self.records_read
                );
                None
            }
            Ok(_) => {
                self.records_read += 1;
                Some(Ok(AlignedRead::from(&self.record)))
            }
            Err(e) => {
                self.records_read += 1;
                // only a record that failed to decode leaves the stream usable
                if e.kind() != std::io::ErrorKind::InvalidData {
                    self.done = true;
                }
                Some(Err(PileupError::Io(e)))
            }
        }
    }
}
