//! Streaming Markup Tokenizer
//!
//! A SAX-style HTML tokenizer that is fed one chunk at a time. Template text
//! arrives split around expression holes, so all lexer state survives between
//! `write` calls and the caller can ask where the next hole falls
//! (`slot_position`) before deciding how to bind it.

use super::tokens::{AttrQuote, SlotPosition, TokenizerState};
use crate::chars;
use crate::error::{CompileError, Result};

/// Receives markup events in document order.
pub trait TokenHandler {
    fn on_open_tag_name(&mut self, name: &str) -> Result<()>;
    fn on_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()>;
    fn on_open_tag_end(&mut self, self_closing: bool) -> Result<()>;
    fn on_text(&mut self, text: &str) -> Result<()>;
    fn on_close_tag(&mut self, name: &str) -> Result<()>;
    fn on_comment(&mut self, text: &str) -> Result<()>;
    fn on_end(&mut self) -> Result<()>;
}

#[derive(Debug)]
pub struct Tokenizer {
    state: TokenizerState,
    text: String,
    tag_name: String,
    attr_name: String,
    attr_value: String,
    comment: String,
    /// The pending attribute value was claimed by an expression hole.
    attr_bound: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            state: TokenizerState::Text,
            text: String::new(),
            tag_name: String::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            comment: String::new(),
            attr_bound: false,
        }
    }

    pub fn write(&mut self, chunk: &str, handler: &mut dyn TokenHandler) -> Result<()> {
        for ch in chunk.chars() {
            self.consume(ch, handler)?;
        }
        Ok(())
    }

    /// Flush the buffered text run so that a placeholder written next lands
    /// after it.
    pub fn flush_text(&mut self, handler: &mut dyn TokenHandler) -> Result<()> {
        if self.state == TokenizerState::Text && !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            handler.on_text(&text)?;
        }
        Ok(())
    }

    /// Where an expression hole at the current position would land.
    pub fn slot_position(&self) -> SlotPosition {
        match self.state {
            TokenizerState::Text => SlotPosition::Text,
            TokenizerState::TagName => SlotPosition::TagName(self.tag_name.clone()),
            TokenizerState::BeforeAttributeValue => SlotPosition::AttributeValue {
                name: self.attr_name.clone(),
            },
            TokenizerState::AttributeValueQuoted(_) if self.attr_value.is_empty() => {
                SlotPosition::AttributeValue {
                    name: self.attr_name.clone(),
                }
            }
            TokenizerState::AttributeValueQuoted(_) | TokenizerState::AttributeValueUnquoted => {
                SlotPosition::PartialAttributeValue {
                    name: self.attr_name.clone(),
                }
            }
            TokenizerState::TagOpen => SlotPosition::TagOpen,
            TokenizerState::ClosingTagName | TokenizerState::AfterClosingTagName => {
                SlotPosition::ClosingTag
            }
            TokenizerState::MarkupDeclaration
            | TokenizerState::CommentStartDash
            | TokenizerState::Comment
            | TokenizerState::CommentEndDash
            | TokenizerState::CommentEnd
            | TokenizerState::BogusComment => SlotPosition::Comment,
            TokenizerState::BeforeAttributeName
            | TokenizerState::AttributeName
            | TokenizerState::AfterAttributeName
            | TokenizerState::SelfClosingStartTag => SlotPosition::InTag,
        }
    }

    /// Claim the pending attribute value for an expression hole and return the
    /// attribute name. No `on_attribute` event is emitted for it.
    pub fn bind_attribute_value(&mut self) -> Result<String> {
        let name = std::mem::take(&mut self.attr_name);
        match self.state {
            TokenizerState::BeforeAttributeValue => {
                self.state = TokenizerState::BeforeAttributeName;
            }
            TokenizerState::AttributeValueQuoted(_) if self.attr_value.is_empty() => {
                self.attr_bound = true;
            }
            _ => {
                return Err(CompileError::unsupported(format!(
                    "expression must be the whole value of attribute \"{}\"",
                    name
                )))
            }
        }
        Ok(name)
    }

    /// Finish the stream.
    pub fn end(&mut self, handler: &mut dyn TokenHandler) -> Result<()> {
        match self.state {
            TokenizerState::Text => self.flush_text(handler)?,
            TokenizerState::TagOpen => {
                self.text.push(chars::LT);
                self.state = TokenizerState::Text;
                self.flush_text(handler)?;
            }
            TokenizerState::MarkupDeclaration
            | TokenizerState::CommentStartDash
            | TokenizerState::Comment
            | TokenizerState::CommentEndDash
            | TokenizerState::CommentEnd
            | TokenizerState::BogusComment => {
                return Err(CompileError::markup("unterminated comment"));
            }
            _ => {
                return Err(CompileError::markup(format!(
                    "unterminated tag <{}",
                    self.tag_name
                )));
            }
        }
        handler.on_end()
    }

    fn consume(&mut self, ch: char, handler: &mut dyn TokenHandler) -> Result<()> {
        match self.state {
            TokenizerState::Text => {
                if ch == chars::LT {
                    self.state = TokenizerState::TagOpen;
                } else {
                    self.text.push(ch);
                }
            }
            TokenizerState::TagOpen => {
                if chars::is_ascii_letter(ch) || ch == chars::HASH {
                    self.flush_pending_text(handler)?;
                    self.tag_name.clear();
                    self.tag_name.push(ch);
                    self.state = TokenizerState::TagName;
                } else if ch == chars::SLASH {
                    self.flush_pending_text(handler)?;
                    self.tag_name.clear();
                    self.state = TokenizerState::ClosingTagName;
                } else if ch == chars::BANG {
                    self.flush_pending_text(handler)?;
                    self.comment.clear();
                    self.state = TokenizerState::MarkupDeclaration;
                } else {
                    self.text.push(chars::LT);
                    self.state = TokenizerState::Text;
                    self.consume(ch, handler)?;
                }
            }
            TokenizerState::TagName => {
                if chars::is_name_end(ch) {
                    handler.on_open_tag_name(&self.tag_name)?;
                    self.state = TokenizerState::BeforeAttributeName;
                    self.consume(ch, handler)?;
                } else {
                    self.tag_name.push(ch);
                }
            }
            TokenizerState::BeforeAttributeName => {
                if chars::is_whitespace(ch) {
                    // skip
                } else if ch == chars::GT {
                    self.finish_open_tag(false, handler)?;
                } else if ch == chars::SLASH {
                    self.state = TokenizerState::SelfClosingStartTag;
                } else if ch == chars::EQ || chars::is_quote(ch) || ch == chars::LT {
                    return Err(CompileError::markup(format!(
                        "unexpected character '{}' in tag <{}>",
                        ch, self.tag_name
                    )));
                } else {
                    self.attr_name.clear();
                    self.attr_name.push(ch);
                    self.state = TokenizerState::AttributeName;
                }
            }
            TokenizerState::AttributeName => {
                if chars::is_name_end(ch) {
                    self.state = TokenizerState::AfterAttributeName;
                    self.consume(ch, handler)?;
                } else {
                    self.attr_name.push(ch);
                }
            }
            TokenizerState::AfterAttributeName => {
                if chars::is_whitespace(ch) {
                    // skip
                } else if ch == chars::EQ {
                    self.attr_value.clear();
                    self.state = TokenizerState::BeforeAttributeValue;
                } else {
                    self.emit_attribute(None, handler)?;
                    self.state = TokenizerState::BeforeAttributeName;
                    self.consume(ch, handler)?;
                }
            }
            TokenizerState::BeforeAttributeValue => {
                if chars::is_whitespace(ch) {
                    // skip
                } else if ch == chars::DQ {
                    self.state = TokenizerState::AttributeValueQuoted(AttrQuote::Double);
                } else if ch == chars::SQ {
                    self.state = TokenizerState::AttributeValueQuoted(AttrQuote::Single);
                } else if ch == chars::GT {
                    self.emit_attribute(Some(""), handler)?;
                    self.finish_open_tag(false, handler)?;
                } else {
                    self.attr_value.push(ch);
                    self.state = TokenizerState::AttributeValueUnquoted;
                }
            }
            TokenizerState::AttributeValueQuoted(quote) => {
                if ch == quote.as_char() {
                    if self.attr_bound {
                        self.attr_bound = false;
                    } else {
                        let value = std::mem::take(&mut self.attr_value);
                        self.emit_attribute(Some(&value), handler)?;
                    }
                    self.state = TokenizerState::BeforeAttributeName;
                } else if self.attr_bound {
                    return Err(CompileError::unsupported(
                        "text after expression inside attribute value",
                    ));
                } else {
                    self.attr_value.push(ch);
                }
            }
            TokenizerState::AttributeValueUnquoted => {
                if chars::is_whitespace(ch) || ch == chars::GT {
                    let value = std::mem::take(&mut self.attr_value);
                    self.emit_attribute(Some(&value), handler)?;
                    self.state = TokenizerState::BeforeAttributeName;
                    if ch == chars::GT {
                        self.finish_open_tag(false, handler)?;
                    }
                } else {
                    self.attr_value.push(ch);
                }
            }
            TokenizerState::SelfClosingStartTag => {
                if ch == chars::GT {
                    self.finish_open_tag(true, handler)?;
                } else {
                    self.state = TokenizerState::BeforeAttributeName;
                    self.consume(ch, handler)?;
                }
            }
            TokenizerState::ClosingTagName => {
                if ch == chars::GT {
                    self.finish_close_tag(handler)?;
                } else if chars::is_whitespace(ch) {
                    self.state = TokenizerState::AfterClosingTagName;
                } else {
                    self.tag_name.push(ch);
                }
            }
            TokenizerState::AfterClosingTagName => {
                if ch == chars::GT {
                    self.finish_close_tag(handler)?;
                } else if !chars::is_whitespace(ch) {
                    return Err(CompileError::markup(format!(
                        "unexpected character '{}' in closing tag </{}>",
                        ch, self.tag_name
                    )));
                }
            }
            TokenizerState::MarkupDeclaration => {
                if ch == chars::MINUS {
                    self.state = TokenizerState::CommentStartDash;
                } else {
                    self.state = TokenizerState::BogusComment;
                    self.consume(ch, handler)?;
                }
            }
            TokenizerState::CommentStartDash => {
                if ch == chars::MINUS {
                    self.state = TokenizerState::Comment;
                } else {
                    self.comment.push(chars::MINUS);
                    self.state = TokenizerState::BogusComment;
                    self.consume(ch, handler)?;
                }
            }
            TokenizerState::Comment => {
                if ch == chars::MINUS {
                    self.state = TokenizerState::CommentEndDash;
                } else {
                    self.comment.push(ch);
                }
            }
            TokenizerState::CommentEndDash => {
                if ch == chars::MINUS {
                    self.state = TokenizerState::CommentEnd;
                } else {
                    self.comment.push(chars::MINUS);
                    self.comment.push(ch);
                    self.state = TokenizerState::Comment;
                }
            }
            TokenizerState::CommentEnd => {
                if ch == chars::GT {
                    self.finish_comment(handler)?;
                } else if ch == chars::MINUS {
                    self.comment.push(chars::MINUS);
                } else {
                    self.comment.push_str("--");
                    self.comment.push(ch);
                    self.state = TokenizerState::Comment;
                }
            }
            TokenizerState::BogusComment => {
                if ch == chars::GT {
                    self.finish_comment(handler)?;
                } else {
                    self.comment.push(ch);
                }
            }
        }
        Ok(())
    }

    fn flush_pending_text(&mut self, handler: &mut dyn TokenHandler) -> Result<()> {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            handler.on_text(&text)?;
        }
        Ok(())
    }

    fn emit_attribute(&mut self, value: Option<&str>, handler: &mut dyn TokenHandler) -> Result<()> {
        let name = std::mem::take(&mut self.attr_name);
        handler.on_attribute(&name, value)
    }

    fn finish_open_tag(&mut self, self_closing: bool, handler: &mut dyn TokenHandler) -> Result<()> {
        self.state = TokenizerState::Text;
        handler.on_open_tag_end(self_closing)
    }

    fn finish_close_tag(&mut self, handler: &mut dyn TokenHandler) -> Result<()> {
        self.state = TokenizerState::Text;
        let name = std::mem::take(&mut self.tag_name);
        handler.on_close_tag(&name)
    }

    fn finish_comment(&mut self, handler: &mut dyn TokenHandler) -> Result<()> {
        self.state = TokenizerState::Text;
        let comment = std::mem::take(&mut self.comment);
        handler.on_comment(&comment)
    }
}
