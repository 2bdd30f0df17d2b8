//! ML (Markup Language) Parser Module
//!
//! Streaming markup tokenizer, HTML tag table and the sigil scanner used on
//! template text around expression holes.

pub mod html_tags;
pub mod sigils;
pub mod tokenizer;
pub mod tokens;

pub use html_tags::is_void_element;
pub use sigils::{scan_binding_sigil, scan_block_marker, Sigil, SigilScan};
pub use tokenizer::{TokenHandler, Tokenizer};
pub use tokens::{AttrQuote, SlotPosition, TokenizerState};
