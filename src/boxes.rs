use serde::Serialize;
use std::fmt;

/// Leading byte of the iTunes "©" atoms (`©alb`, `©nam`, ...).
pub const COPYRIGHT_MARKER: u8 = 0xA9;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Name of this type as it appears in a dotted path.
    ///
    /// `©xyz` atoms become `(c)xyz`, with the trailing three bytes lowercased.
    pub fn path_segment(&self) -> String {
        if self.0[0] == COPYRIGHT_MARKER {
            format!("(c){}", String::from_utf8_lossy(&self.0[1..]).to_lowercase())
        } else {
            String::from_utf8_lossy(&self.0).into_owned()
        }
    }

    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.path_segment()) } }

#[derive(Debug, Clone)]
pub struct BoxHeader {
    pub size: u64,          // total size including header
    pub typ: FourCC,
    pub header_size: u64,   // 8, or 16 for 64-bit sizes
    pub start: u64,         // file offset of header start
}

impl BoxHeader {
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// One indexed box.
///
/// `path` is the dotted chain of ancestor types down to and including this
/// box, e.g. `moov.udta.meta.ilst.(c)nam.data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mp4Box {
    pub start_offset: u64,
    pub end_offset: u64,
    pub size: u64,
    pub path: String,
}

impl Mp4Box {
    /// Last segment of the path, i.e. this box's own type.
    pub fn name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    pub fn depth(&self) -> usize {
        self.path.matches('.').count()
    }
}

/// Flat, pre-order index of every box reached while walking a file.
///
/// Paths are not unique: all tracks share `moov.trak...`, all custom tags
/// share `moov.udta.meta.ilst.----...`. Callers that need to correlate
/// siblings do it by ordinal position in [`BoxIndex::get_boxes_by_path`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoxIndex {
    boxes: Vec<Mp4Box>,
}

impl BoxIndex {
    pub fn new(boxes: Vec<Mp4Box>) -> Self {
        Self { boxes }
    }

    /// First box in document order with exactly this path.
    pub fn get_box_by_path(&self, path: &str) -> Option<&Mp4Box> {
        self.boxes.iter().find(|b| b.path == path)
    }

    /// Every box with this path, in document order.
    pub fn get_boxes_by_path(&self, path: &str) -> Vec<&Mp4Box> {
        self.boxes.iter().filter(|b| b.path == path).collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_box_by_path(path).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mp4Box> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl<'a> IntoIterator for &'a BoxIndex {
    type Item = &'a Mp4Box;
    type IntoIter = std::slice::Iter<'a, Mp4Box>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
