/**
 * Tokenizer Tests
 *
 * Streaming tokenizer behaviour across chunk boundaries and the slot
 * positions reported between chunks.
 */

#[cfg(test)]
mod tests {
    use fragment_compiler::error::{CompileError, Result};
    use fragment_compiler::ml_parser::{SlotPosition, TokenHandler, Tokenizer};

    #[derive(Default)]
    struct Events(Vec<String>);

    impl TokenHandler for Events {
        fn on_open_tag_name(&mut self, name: &str) -> Result<()> {
            self.0.push(format!("<{}", name));
            Ok(())
        }
        fn on_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
            self.0.push(format!("@{}={}", name, value.unwrap_or("-")));
            Ok(())
        }
        fn on_open_tag_end(&mut self, self_closing: bool) -> Result<()> {
            self.0.push(if self_closing { "/>" } else { ">" }.to_string());
            Ok(())
        }
        fn on_text(&mut self, text: &str) -> Result<()> {
            self.0.push(format!("#{}", text));
            Ok(())
        }
        fn on_close_tag(&mut self, name: &str) -> Result<()> {
            self.0.push(format!("</{}", name));
            Ok(())
        }
        fn on_comment(&mut self, text: &str) -> Result<()> {
            self.0.push(format!("!{}", text));
            Ok(())
        }
        fn on_end(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn positions(chunks: &[&str]) -> Vec<SlotPosition> {
        let mut tokenizer = Tokenizer::new();
        let mut events = Events::default();
        let mut out = Vec::new();
        for chunk in chunks {
            tokenizer.write(chunk, &mut events).unwrap();
            out.push(tokenizer.slot_position());
        }
        out
    }

    #[test]
    fn should_report_text_position_inside_elements() {
        assert_eq!(positions(&["<p>Hello "]), vec![SlotPosition::Text]);
    }

    #[test]
    fn should_report_tag_positions() {
        assert_eq!(
            positions(&["<div "]),
            vec![SlotPosition::InTag]
        );
        assert_eq!(
            positions(&["<#:"]),
            vec![SlotPosition::TagName("#:".to_string())]
        );
        assert_eq!(positions(&["<p></"]), vec![SlotPosition::ClosingTag]);
        assert_eq!(positions(&["<!-- "]), vec![SlotPosition::Comment]);
    }

    #[test]
    fn should_report_partial_attribute_values() {
        assert_eq!(
            positions(&["<p class=\"a "]),
            vec![SlotPosition::PartialAttributeValue {
                name: "class".to_string()
            }]
        );
        assert_eq!(
            positions(&["<p class='"]),
            vec![SlotPosition::AttributeValue {
                name: "class".to_string()
            }]
        );
    }

    #[test]
    fn should_emit_events_in_document_order() {
        let mut tokenizer = Tokenizer::new();
        let mut events = Events::default();
        tokenizer
            .write("<ul><li id=a>x</li><!--c--><br/></ul>", &mut events)
            .unwrap();
        tokenizer.end(&mut events).unwrap();
        assert_eq!(
            events.0,
            vec!["<ul", ">", "<li", "@id=a", ">", "#x", "</li", "!c", "<br", "/>", "</ul"]
        );
        assert_eq!(tokenizer.slot_position(), SlotPosition::Text);
    }

    #[test]
    fn should_fail_on_unterminated_comment() {
        let mut tokenizer = Tokenizer::new();
        let mut events = Events::default();
        tokenizer.write("<!-- open", &mut events).unwrap();
        assert!(matches!(
            tokenizer.end(&mut events),
            Err(CompileError::Markup { .. })
        ));
    }

    #[test]
    fn should_reject_equals_before_attribute_name() {
        let mut tokenizer = Tokenizer::new();
        let mut events = Events::default();
        assert!(tokenizer.write("<p =x>", &mut events).is_err());
    }
}
