//! Note and category page emission for the vault.

mod categories;
pub mod frontmatter;
mod note;
mod settings;

pub use categories::CategoryPages;
pub use note::{base_code, NoteRenderer};
pub use settings::RenderSettings;
