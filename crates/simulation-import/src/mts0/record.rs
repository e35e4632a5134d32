// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Fortran unformatted sequential records: `[i32 N][N bytes][i32 N]` in native byte order.
// The trailing marker repeats the leading one and doubles as a corruption check.

use crate::error::{ImportError, Result};
use std::io::{self, Write};
use std::mem::size_of;
use std::path::Path;

const MARKER_LEN: usize = size_of::<i32>();

/// Walks the records of an in-memory node file.
pub(crate) struct RecordReader<'a> {
    path: &'a Path,
    bytes: &'a [u8],
    offset: usize,
    record: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(path: &'a Path, bytes: &'a [u8]) -> Self {
        Self {
            path,
            bytes,
            offset: 0,
            record: 0,
        }
    }

    fn marker(&mut self) -> Result<usize> {
        let end = self.offset + MARKER_LEN;
        let Some(slice) = self.bytes.get(self.offset..end) else {
            return Err(ImportError::format(
                self.path,
                format!(
                    "record {} truncated: no length marker at byte {}",
                    self.record + 1,
                    self.offset
                ),
            ));
        };
        let value: i32 = bytemuck::pod_read_unaligned(slice);
        self.offset = end;
        usize::try_from(value).map_err(|_| {
            ImportError::format(
                self.path,
                format!("record {} has negative length {}", self.record + 1, value),
            )
        })
    }

    /// Payload of the next record.
    pub fn next_record(&mut self) -> Result<&'a [u8]> {
        let len = self.marker()?;
        let start = self.offset;
        let payload = self.bytes.get(start..start + len).ok_or_else(|| {
            ImportError::format(
                self.path,
                format!(
                    "record {} truncated: expected {} bytes, {} left",
                    self.record + 1,
                    len,
                    self.bytes.len() - start
                ),
            )
        })?;
        self.offset = start + len;

        let trailing = self.marker()?;
        if trailing != len {
            return Err(ImportError::format(
                self.path,
                format!(
                    "record {} length mismatch: leading marker {}, trailing marker {}",
                    self.record + 1,
                    len,
                    trailing
                ),
            ));
        }
        self.record += 1;
        Ok(payload)
    }

    /// A record holding exactly one `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        let payload = self.next_record()?;
        if payload.len() != size_of::<i32>() {
            return Err(self.size_error(payload.len(), size_of::<i32>()));
        }
        Ok(bytemuck::pod_read_unaligned(payload))
    }

    /// A record holding exactly `count` doubles.
    pub fn read_f64s(&mut self, count: usize) -> Result<Vec<f64>> {
        let payload = self.next_record()?;
        let expected = count * size_of::<f64>();
        if payload.len() != expected {
            return Err(self.size_error(payload.len(), expected));
        }
        Ok(payload
            .chunks_exact(size_of::<f64>())
            .map(bytemuck::pod_read_unaligned::<f64>)
            .collect())
    }

    /// Bytes after the last record read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn size_error(&self, actual: usize, expected: usize) -> ImportError {
        ImportError::format(
            self.path,
            format!(
                "record {} holds {} bytes, expected {}",
                self.record, actual, expected
            ),
        )
    }
}

/// Writes one record around `payload`.
pub(crate) fn write_record<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = i32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("record of {} bytes does not fit a 32-bit marker", payload.len()),
        )
    })?;
    writer.write_all(bytemuck::bytes_of(&len))?;
    writer.write_all(payload)?;
    writer.write_all(bytemuck::bytes_of(&len))
}


// End of File
