//! Rendering module for converting block trees to Markdown.

mod block;
mod options;
mod rich_text;
mod table;

pub use block::BlockRenderer;
pub use options::RenderOptions;
pub use rich_text::render_rich_text;
pub use table::assemble_table;
