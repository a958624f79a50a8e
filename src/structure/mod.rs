mod block;
mod classify;
mod list;
mod section;
mod table;

pub use block::{Block, Image, Paragraph, blocks_text};
pub use classify::{BULLET_GLYPH, BlockClassifier, Classification, strip_bullet};
pub use list::{List, ListAdd, ListEntry, ListItem};
pub use section::{Document, ROOT_LEVEL, Section, SectionAssembler, assemble};
pub use table::{Cell, Row, Table};
