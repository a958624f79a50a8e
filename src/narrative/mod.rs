mod linker;
mod render;

pub use linker::{
    CONTENT_ID_PREFIX, ITEM_ID_PREFIX, Narrative, NarrativeContentItem, NarrativeContentNode,
    flatten,
};
pub use render::render_blocks;
