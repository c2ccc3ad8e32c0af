//! # html2layout – HTML fragment → styled layout tree
//!
//! This crate converts a restricted subset of HTML with inline CSS into a
//! tree of styled layout nodes that a document layout engine can render
//! directly. The pipeline stages are:
//!
//! 1. **Normalise** – decode entities and fix up whitespace ([`normalize`])
//! 2. **Parse** – HTML string → DOM tree ([`dom`])
//! 3. **Style** – inline `style` declarations, tag defaults and caller
//!    overrides → text and container styles ([`declarations`], [`style`],
//!    [`units`])
//! 4. **Build** – classify each element ([`dispatch`]) and emit the
//!    [`LayoutNode`] tree ([`builder`], [`layout_tree`])
//!
//! Use [`convert`] or [`convert_default`] to run all of them.

pub mod builder;
pub mod declarations;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod layout_tree;
pub mod normalize;
pub mod pipeline;
pub mod style;
pub mod templates;
pub mod units;

// Re-exports for convenience
pub use error::ConvertError;
pub use layout_tree::LayoutNode;
pub use pipeline::{convert, convert_default, ConvertConfig};
