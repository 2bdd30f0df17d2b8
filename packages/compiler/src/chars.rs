/*
 * Character Codes
 *
 * Characters the markup tokenizer and sigil scanner care about.
 */

pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const FF: char = '\x0C';
pub const CR: char = '\r';
pub const SPACE: char = ' ';

pub const BANG: char = '!';
pub const DQ: char = '"';
pub const HASH: char = '#';
pub const DOLLAR: char = '$';
pub const SQ: char = '\'';
pub const STAR: char = '*';
pub const MINUS: char = '-';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const BACKSLASH: char = '\\';
pub const CARET: char = '^';

pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, TAB | LF | FF | CR | SPACE)
}

pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ
}

/// Characters that end a tag or attribute name.
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch) || ch == GT || ch == SLASH || ch == EQ || ch == LT || is_quote(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\n'));
        assert!(!is_whitespace('a'));
    }

    #[test]
    fn test_name_end() {
        assert!(is_name_end('>'));
        assert!(is_name_end('='));
        assert!(is_name_end(' '));
        assert!(!is_name_end('-'));
        assert!(!is_name_end(':'));
    }
}
