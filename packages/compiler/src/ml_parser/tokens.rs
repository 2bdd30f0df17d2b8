//! ML Parser Tokens
//!
//! Lexer states of the streaming tokenizer and the positions an expression
//! hole can occupy between two chunks.

use crate::chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrQuote {
    Single,
    Double,
}

impl AttrQuote {
    pub fn as_char(self) -> char {
        match self {
            AttrQuote::Single => chars::SQ,
            AttrQuote::Double => chars::DQ,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    Text,
    TagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueQuoted(AttrQuote),
    AttributeValueUnquoted,
    SelfClosingStartTag,
    ClosingTagName,
    AfterClosingTagName,
    MarkupDeclaration,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    BogusComment,
}

/// Markup context of an expression hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPosition {
    /// Between nodes, in text content.
    Text,
    /// The whole value of the named attribute.
    AttributeValue { name: String },
    /// Inside an attribute value that already has static text.
    PartialAttributeValue { name: String },
    /// Directly after the tag name characters read so far.
    TagName(String),
    /// Right after `<`.
    TagOpen,
    /// Between attributes of an open tag.
    InTag,
    ClosingTag,
    Comment,
}

impl SlotPosition {
    pub fn describe(&self) -> String {
        match self {
            SlotPosition::Text => "text".to_string(),
            SlotPosition::AttributeValue { name } => format!("attribute \"{}\"", name),
            SlotPosition::PartialAttributeValue { name } => {
                format!("partial value of attribute \"{}\"", name)
            }
            SlotPosition::TagName(name) => format!("tag name <{}", name),
            SlotPosition::TagOpen => "tag opening".to_string(),
            SlotPosition::InTag => "open tag".to_string(),
            SlotPosition::ClosingTag => "closing tag".to_string(),
            SlotPosition::Comment => "comment".to_string(),
        }
    }
}
