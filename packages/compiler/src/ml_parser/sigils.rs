//! Sigil Scanner
//!
//! Classifies the punctuation that surrounds an expression hole in raw template
//! text. Binding sigils sit at the very end of the chunk before the hole
//! (`*${x}`, `^${x}`, `$${x}`); the block marker sits at the very start of the
//! chunk after it (`${x}#`). A backslash in front of either turns it back into
//! plain text.

use crate::chars;

/// Reactive classification requested for a binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sigil {
    #[default]
    None,
    Map,
    Subscribe,
    Once,
}

impl Sigil {
    fn from_char(ch: char) -> Option<Sigil> {
        match ch {
            chars::STAR => Some(Sigil::Map),
            chars::CARET => Some(Sigil::Subscribe),
            chars::DOLLAR => Some(Sigil::Once),
            _ => None,
        }
    }
}

/// Result of scanning the trailing edge of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigilScan {
    pub sigil: Sigil,
    pub text: String,
}

/// Scan the end of the chunk that precedes an expression hole.
pub fn scan_binding_sigil(text: &str) -> SigilScan {
    let Some(last) = text.chars().last() else {
        return SigilScan {
            sigil: Sigil::None,
            text: String::new(),
        };
    };
    let Some(sigil) = Sigil::from_char(last) else {
        return SigilScan {
            sigil: Sigil::None,
            text: text.to_string(),
        };
    };

    let body = &text[..text.len() - last.len_utf8()];
    if is_escaped(body) {
        let mut unescaped = body[..body.len() - 1].to_string();
        unescaped.push(last);
        return SigilScan {
            sigil: Sigil::None,
            text: unescaped,
        };
    }

    SigilScan {
        sigil,
        text: body.to_string(),
    }
}

/// Scan the start of the chunk that follows an expression hole.
///
/// Returns whether the hole is block-targeted and the chunk with the marker
/// (or its escape) removed.
pub fn scan_block_marker(text: &str) -> (bool, String) {
    if let Some(rest) = text.strip_prefix(chars::HASH) {
        return (true, rest.to_string());
    }
    if let Some(rest) = text.strip_prefix("\\#") {
        return (false, format!("#{}", rest));
    }
    (false, text.to_string())
}

/// True when `body` ends with an odd run of backslashes, i.e. the character
/// following it is escaped.
fn is_escaped(body: &str) -> bool {
    let run = body
        .chars()
        .rev()
        .take_while(|&c| c == chars::BACKSLASH)
        .count();
    run % 2 == 1
}
