pub mod boxes;
pub mod chapters;
pub mod fields;
pub mod known_boxes;
pub mod parser;
pub mod reader;
pub mod tables;
pub mod tags;
pub mod util;

pub use boxes::{BoxHeader, BoxIndex, FourCC, Mp4Box};
pub use chapters::Chapter;
pub use parser::{ParseError, Result, check_boxes, index_boxes, read_box_header};
pub use reader::{Mp4, ReadOptions};
pub use tables::{Genre, ImageType, ItunesAdvisory, ItunesStik};
pub use tags::{Mp4Tags, Picture};
