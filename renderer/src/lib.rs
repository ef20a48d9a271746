pub mod element;
pub mod error;
pub mod html;
pub mod ids;
pub mod render;
pub mod session;
pub mod store;

pub use element::{ElementBody, UiElement};
pub use error::ActionError;
pub use html::{HtmlOptions, to_html};
pub use render::{render, render_source};
pub use session::{Action, PageSession};
pub use store::BlockStore;
