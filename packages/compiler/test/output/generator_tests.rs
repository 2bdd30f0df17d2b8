/**
 * Code Generator Tests
 *
 * Parse a template, register it with a module state and check the generated
 * statements and file-level declarations.
 */

#[cfg(test)]
mod tests {
    use fragment_compiler::template::{parse_template, BinderExpression, TemplateInput};
    use fragment_compiler::{generate, ModuleState, TemplateCode};

    fn compile(
        state: &mut ModuleState,
        quasis: &[&str],
        expressions: &[(&str, &[&str])],
    ) -> TemplateCode {
        let input = TemplateInput::new(
            quasis.iter().map(|q| q.to_string()).collect(),
            expressions
                .iter()
                .map(|(source, _)| {
                    let is_identifier = source.chars().all(|c| c.is_alphanumeric());
                    BinderExpression::new(*source, 0, is_identifier)
                })
                .collect(),
        );
        let mut parsed = parse_template(&input).unwrap();
        for binder in parsed.binders.iter_mut() {
            let (_, observables) = expressions[binder.slot];
            binder.observables = observables.iter().map(|o| o.to_string()).collect();
        }
        let fragment = state.add_fragment(&parsed.html);
        generate(&mut parsed.binders, fragment, state).unwrap()
    }

    #[test]
    fn should_compile_value_binding_with_direct_return() {
        let mut state = ModuleState::new();
        let code = compile(&mut state, &["<span>Hello ", "</span>"], &[("name", &[])]);
        assert_eq!(
            code.to_function_body(""),
            "{\n  const __nodes = __render0();\n  __bind0(__nodes[0])(name);\n  return __nodes[__nodes.length];\n}"
        );
        assert_eq!(
            state.declarations(),
            vec![
                "const __render0 = renderer(makeFragment(`<span data-bind>Hello <text-node></text-node></span>`));",
                "const __bind0 = __textBinder(1);",
            ]
        );
    }

    #[test]
    fn should_release_only_subscriptions_in_order() {
        let mut state = ModuleState::new();
        let code = compile(
            &mut state,
            &["<p>^", "", "^", "</p>"],
            &[("a", &[]), ("b", &[]), ("c", &[])],
        );
        assert_eq!(code.unsubscribes, vec!["__sub0", "__sub2"]);
        let source = code.to_statements("");
        assert!(source.contains("__fragment.unsubscribe = () => {\n  __sub0.unsubscribe();\n  __sub2.unsubscribe();\n};"));
        assert!(source.ends_with("return __fragment;"));
        assert!(!source.contains("__sub1"));
    }

    #[test]
    fn should_share_identical_fragments_between_sites() {
        let mut state = ModuleState::new();
        let first = compile(&mut state, &["<b>", "</b>"], &[("x", &[])]);
        let second = compile(&mut state, &["<b>", "</b>"], &[("y", &[])]);
        assert_eq!(first.fragment_index, 0);
        assert_eq!(second.fragment_index, 0);
        assert_eq!(state.fragment_count(), 1);
        assert_eq!(state.binder_count(), 1);
        assert_eq!(state.declarations().len(), 2);
    }

    #[test]
    fn should_keep_distinct_bindings_apart() {
        let mut state = ModuleState::new();
        compile(&mut state, &["<b>", "</b>"], &[("x", &[])]);
        compile(&mut state, &["<b>", "#</b>"], &[("x", &[])]);
        assert_eq!(state.fragment_count(), 2);
        assert_eq!(state.binder_count(), 2);
    }

    #[test]
    fn should_derive_first_value_of_observable() {
        let mut state = ModuleState::new();
        let code = compile(&mut state, &["<i>$", "</i>"], &[("count", &["count"])]);
        assert_eq!(
            code.statements[1],
            "const __sub0 = __first(count, __bind0(__nodes[0]));"
        );
        assert_eq!(
            state.import_names(),
            vec!["renderer", "makeFragment", "__textBinder", "__first"]
        );
    }

    #[test]
    fn should_map_unmarked_expression_over_observable() {
        let mut state = ModuleState::new();
        let code = compile(
            &mut state,
            &["<a href=", ">link</a>"],
            &[("url + '?q'", &["url"])],
        );
        assert_eq!(
            code.statements[1],
            "const __sub0 = __map(url, url => (url + '?q'), __bind0(__nodes[0]));"
        );
        assert_eq!(state.declarations()[1], "const __bind0 = __attrBinder(\"href\");");
    }

    #[test]
    fn should_render_component_with_static_and_bound_props() {
        let mut state = ModuleState::new();
        let code = compile(
            &mut state,
            &["<section><#:", " title=", " mode=\"compact\"/></section>"],
            &[("Card", &[]), ("t", &[])],
        );
        assert_eq!(
            code.statements[1..],
            [
                "const __sub0b = __bind0(__nodes[0]);".to_string(),
                "__sub0b.observer(Card({ title: t, mode: \"compact\" }));".to_string(),
            ]
        );
        assert_eq!(state.declarations()[1], "const __bind0 = __componentBinder(0);");
    }
}
