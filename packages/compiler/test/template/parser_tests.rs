/**
 * Template Parser Tests
 *
 * Skeleton HTML, placeholder positions and node-index grouping for parsed
 * templates.
 */

#[cfg(test)]
mod tests {
    use fragment_compiler::ml_parser::Sigil;
    use fragment_compiler::template::{
        parse_template, BinderExpression, BinderIndex, ParsedTemplate, TargetKind, TemplateInput,
    };
    use fragment_compiler::CompileError;

    fn parse(quasis: &[&str], expressions: &[&str]) -> Result<ParsedTemplate, CompileError> {
        let input = TemplateInput::new(
            quasis.iter().map(|q| q.to_string()).collect(),
            expressions
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let is_identifier = e.chars().all(|c| c.is_alphanumeric() || c == '_');
                    BinderExpression::new(*e, (i as u32 + 1) * 10, is_identifier)
                })
                .collect(),
        );
        parse_template(&input)
    }

    fn summary(parsed: &ParsedTemplate) -> Vec<(String, Option<usize>)> {
        parsed
            .binders
            .iter()
            .map(|b| (b.expression.source.clone(), b.el_index))
            .collect()
    }

    #[test]
    fn should_compile_hello_name_skeleton() {
        let parsed = parse(&["<span>Hello ", "</span>"], &["name"]).unwrap();
        assert_eq!(
            parsed.html,
            "<span data-bind>Hello <text-node></text-node></span>"
        );
        let binder = &parsed.binders[0];
        assert_eq!(binder.target.kind, TargetKind::Text);
        assert_eq!(binder.index, BinderIndex::Child(1));
        assert_eq!(binder.sigil, Sigil::None);
    }

    #[test]
    fn should_keep_void_element_bare() {
        let parsed = parse(&["<input>"], &[]).unwrap();
        assert_eq!(parsed.html, "<input>");
    }

    #[test]
    fn should_group_binders_by_element_in_document_order() {
        let parsed = parse(
            &["<div class=", ">", "<p>", " ", "</p></div>", ""],
            &["cls", "a", "b", "c", "d"],
        )
        .unwrap();
        assert_eq!(
            parsed.html,
            "<div class=\"\" data-bind><text-node></text-node><p data-bind><text-node></text-node> <text-node></text-node></p></div><text-node></text-node>"
        );
        assert_eq!(
            summary(&parsed),
            vec![
                ("cls".to_string(), Some(0)),
                ("a".to_string(), Some(0)),
                ("b".to_string(), Some(1)),
                ("c".to_string(), Some(1)),
                ("d".to_string(), Some(2)),
            ]
        );
        assert_eq!(parsed.binders[4].index, BinderIndex::Child(1));
    }

    #[test]
    fn should_index_outer_element_before_nested_one() {
        let parsed = parse(&["<div class=", "><p>", "</p></div>"], &["a", "b"]).unwrap();
        assert_eq!(
            parsed.html,
            "<div class=\"\" data-bind><p data-bind><text-node></text-node></p></div>"
        );
        assert_eq!(
            summary(&parsed),
            vec![("a".to_string(), Some(0)), ("b".to_string(), Some(1))]
        );
    }

    #[test]
    fn should_index_siblings_after_their_parent_subtree() {
        let parsed = parse(
            &["<ul><li><b>", "</b></li><li>", "</li></ul>"],
            &["x", "y"],
        )
        .unwrap();
        assert_eq!(
            summary(&parsed),
            vec![("x".to_string(), Some(0)), ("y".to_string(), Some(1))]
        );
    }

    #[test]
    fn should_count_children_for_positional_index() {
        let parsed = parse(&["<p>a<b>x</b><!--c-->", "</p>"], &["v"]).unwrap();
        assert_eq!(parsed.binders[0].index, BinderIndex::Child(3));
    }

    #[test]
    fn should_strip_sigils_and_block_markers() {
        let parsed = parse(&["<p>*", "^", "$", "#</p>"], &["a", "b", "c"]).unwrap();
        let sigils: Vec<Sigil> = parsed.binders.iter().map(|b| b.sigil).collect();
        assert_eq!(sigils, vec![Sigil::Map, Sigil::Subscribe, Sigil::Once]);
        assert!(parsed.binders[2].is_block());
        assert_eq!(
            parsed.html,
            "<p data-bind><text-node></text-node><text-node></text-node><!-- block --></p>"
        );
    }

    #[test]
    fn should_keep_escaped_sigils_as_text() {
        let parsed = parse(&["<p>\\$", "\\#</p>"], &["price"]).unwrap();
        assert_eq!(
            parsed.html,
            "<p data-bind>$<text-node></text-node>#</p>"
        );
        assert_eq!(parsed.binders[0].sigil, Sigil::None);
        assert!(!parsed.binders[0].is_block());
    }

    #[test]
    fn should_reject_partial_attribute_value() {
        let err = parse(&["<p class=\"a ", "\"></p>"], &["b"]).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
        assert_eq!(err.offset(), Some(10));
    }

    #[test]
    fn should_reject_expression_in_tag() {
        let err = parse(&["<div ", "></div>"], &["attrs"]).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
    }

    #[test]
    fn should_reject_expression_in_comment() {
        let err = parse(&["<!-- ", " -->"], &["x"]).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
    }

    #[test]
    fn should_reject_open_component_tag() {
        let err = parse(&["<#:", "></#:>"], &["Card"]).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
    }

    #[test]
    fn should_reject_sigil_on_component_property() {
        let err = parse(&["<#:", " title=*", "/>"], &["Card", "t"]).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
    }

    #[test]
    fn should_close_unclosed_elements_at_end() {
        let parsed = parse(&["<div><p>", ""], &["x"]).unwrap();
        assert_eq!(
            parsed.html,
            "<div><p data-bind><text-node></text-node></p></div>"
        );
    }

    #[test]
    fn should_fail_on_unterminated_tag() {
        let err = parse(&["<div"], &[]).unwrap_err();
        assert!(matches!(err, CompileError::Markup { .. }));
    }
}
