//! Server-rendered widget markup.
//!
//! Every fragment is built with `maud`, so text from the backend or the user
//! is escaped by construction and never parsed as markup.
//!
//! # Structure
//!
//! - [`page`]: full page shell with the input form and one-click buttons
//! - [`chat`]: chat log fragment, entries and cards
//! - [`status`]: self-polling status panel fragment

pub mod chat;
pub mod page;
pub mod status;

pub use chat::{render_entry, render_log};
pub use page::{PageView, render_page};
pub use status::render_status;
