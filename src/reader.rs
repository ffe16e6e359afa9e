use crate::boxes::BoxIndex;
use crate::known_boxes::ILST_PATH;
use crate::parser::{Result, check_boxes, check_ftyp, index_boxes};
use crate::tags::{Mp4Tags, read_tags};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Knobs for a read session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Upper-case freeform tag names.
    pub upper_custom: bool,
    /// Require an `ftyp` box with a known major brand.
    pub check_ftyp: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            upper_custom: false,
            check_ftyp: true,
        }
    }
}

impl ReadOptions {
    pub fn upper_custom(mut self, yes: bool) -> Self {
        self.upper_custom = yes;
        self
    }

    pub fn check_ftyp(mut self, yes: bool) -> Self {
        self.check_ftyp = yes;
        self
    }
}

/// One open container.
///
/// Every read moves the stream position, so all methods take `&mut self`;
/// to read several files in parallel open one `Mp4` per file.
pub struct Mp4<R> {
    reader: R,
    size: u64,
    options: ReadOptions,
}

impl Mp4<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReadOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        let f = File::open(path)?;
        let size = f.metadata()?.len();
        Ok(Self::with_options(BufReader::new(f), size, options))
    }
}

impl<R: Read + Seek> Mp4<R> {
    /// Wrap a stream of `size` bytes.
    pub fn from_reader(reader: R, size: u64) -> Self {
        Self::with_options(reader, size, ReadOptions::default())
    }

    pub fn with_options(reader: R, size: u64, options: ReadOptions) -> Self {
        Self { reader, size, options }
    }

    /// Wrap a stream, taking its size from its end.
    pub fn from_seekable(mut reader: R, options: ReadOptions) -> Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        Ok(Self::with_options(reader, size, options))
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn options(&self) -> ReadOptions {
        self.options
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Index and validate the box tree without decoding any tags.
    pub fn read_boxes(&mut self) -> Result<BoxIndex> {
        if self.options.check_ftyp {
            check_ftyp(&mut self.reader)?;
        }
        let index = index_boxes(&mut self.reader, self.size)?;
        debug!("indexed {} boxes over {} bytes", index.len(), self.size);
        check_boxes(&index)?;
        Ok(index)
    }

    /// Decode tags against an index built by [`Mp4::read_boxes`].
    pub fn read_tags_from(&mut self, index: &BoxIndex) -> Result<Mp4Tags> {
        if !index.contains(ILST_PATH) {
            debug!("no {ILST_PATH}, returning empty tags");
            return Ok(Mp4Tags::default());
        }
        read_tags(&mut self.reader, index, self.options.upper_custom)
    }

    /// Full parse: index, validate, decode.
    pub fn read(&mut self) -> Result<(Mp4Tags, BoxIndex)> {
        let index = self.read_boxes()?;
        let tags = self.read_tags_from(&index)?;
        Ok((tags, index))
    }

    pub fn read_tags(&mut self) -> Result<Mp4Tags> {
        self.read().map(|(tags, _)| tags)
    }

    /// Raw bytes `[offset, offset + len)`, for dumping a box.
    pub fn read_range(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        Ok(crate::util::read_slice(&mut self.reader, offset, len)?)
    }
}
