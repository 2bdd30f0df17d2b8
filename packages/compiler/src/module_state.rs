//! Module State
//!
//! File-wide tables shared by every template compiled from one source file.
//! Identical skeleton HTML and identical binder initializers are declared once
//! and referenced by index from every site that needs them.
//!
//! A `ModuleState` belongs to exactly one compile call; files compiled in
//! parallel each get their own.

use crate::template::{Binder, BinderInit, BindingType};
use bitflags::bitflags;
use indexmap::{IndexMap, IndexSet};

pub const RENDERER: &str = "renderer";
pub const MAKE_FRAGMENT: &str = "makeFragment";
pub const FIRST_HELPER: &str = "__first";
pub const MAP_HELPER: &str = "__map";
pub const COMBINE_HELPER: &str = "__combine";

bitflags! {
    /// Runtime names the compiled file imports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuntimeHelpers: u16 {
        const RENDERER = 1 << 0;
        const MAKE_FRAGMENT = 1 << 1;
        const TEXT_BINDER = 1 << 2;
        const BLOCK_BINDER = 1 << 3;
        const ATTR_BINDER = 1 << 4;
        const COMPONENT_BINDER = 1 << 5;
        const FIRST = 1 << 6;
        const MAP = 1 << 7;
        const COMBINE = 1 << 8;
    }
}

const HELPER_NAMES: &[(RuntimeHelpers, &str)] = &[
    (RuntimeHelpers::RENDERER, RENDERER),
    (RuntimeHelpers::MAKE_FRAGMENT, MAKE_FRAGMENT),
    (RuntimeHelpers::TEXT_BINDER, crate::template::binder::TEXT_BINDER),
    (RuntimeHelpers::BLOCK_BINDER, crate::template::binder::BLOCK_BINDER),
    (RuntimeHelpers::ATTR_BINDER, crate::template::binder::ATTRIBUTE_BINDER),
    (RuntimeHelpers::COMPONENT_BINDER, crate::template::binder::COMPONENT_BINDER),
    (RuntimeHelpers::FIRST, FIRST_HELPER),
    (RuntimeHelpers::MAP, MAP_HELPER),
    (RuntimeHelpers::COMBINE, COMBINE_HELPER),
];

impl RuntimeHelpers {
    /// Import names in canonical order.
    pub fn names(self) -> Vec<&'static str> {
        HELPER_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    fn for_import_name(name: &str) -> RuntimeHelpers {
        HELPER_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
            .unwrap_or_else(RuntimeHelpers::empty)
    }

    /// Derivation helper a binding type calls, if any.
    pub fn for_binding_type(binding_type: BindingType) -> RuntimeHelpers {
        match binding_type {
            BindingType::First => RuntimeHelpers::FIRST,
            BindingType::Map | BindingType::MapFirst => RuntimeHelpers::MAP,
            BindingType::Combine | BindingType::CombineFirst => RuntimeHelpers::COMBINE,
            BindingType::Value | BindingType::Subscribe => RuntimeHelpers::empty(),
        }
    }
}

impl Default for RuntimeHelpers {
    fn default() -> Self {
        RuntimeHelpers::RENDERER | RuntimeHelpers::MAKE_FRAGMENT
    }
}

#[derive(Debug, Default)]
pub struct ModuleState {
    fragments: IndexSet<String>,
    binders: IndexMap<String, BinderInit>,
    helpers: RuntimeHelpers,
}

impl ModuleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished skeleton and return its fragment index.
    pub fn add_fragment(&mut self, html: &str) -> usize {
        match self.fragments.get_index_of(html) {
            Some(index) => index,
            None => self.fragments.insert_full(html.to_string()).0,
        }
    }

    /// Register the initializer a binder needs and return its table index.
    pub fn add_binder(&mut self, binder: &Binder) -> usize {
        let init = binder.init();
        self.helpers |= RuntimeHelpers::for_import_name(init.name);
        let entry = self.binders.entry(init.key());
        let index = entry.index();
        entry.or_insert(init);
        index
    }

    pub fn use_binding_type(&mut self, binding_type: BindingType) {
        self.helpers |= RuntimeHelpers::for_binding_type(binding_type);
    }

    pub fn import_names(&self) -> Vec<&'static str> {
        self.helpers.names()
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn binder_count(&self) -> usize {
        self.binders.len()
    }

    /// File-level declarations: every fragment renderer, then every binder
    /// initializer, each in first-use order.
    pub fn declarations(&self) -> Vec<String> {
        let renderers = self.fragments.iter().enumerate().map(|(index, html)| {
            format!(
                "const __render{} = {}({}(`{}`));",
                index, RENDERER, MAKE_FRAGMENT, html
            )
        });
        let binders = self
            .binders
            .values()
            .enumerate()
            .map(|(index, init)| format!("const __bind{} = {};", index, init.to_js()));
        renderers.chain(binders).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml_parser::Sigil;
    use crate::template::{BinderExpression, BinderIndex, TargetKind};

    fn binder(kind: TargetKind, index: BinderIndex) -> Binder {
        Binder::new(kind, Sigil::None, BinderExpression::new("x", 0, true), 0, index)
    }

    #[test]
    fn should_dedup_fragments() {
        let mut state = ModuleState::new();
        assert_eq!(state.add_fragment("<p></p>"), 0);
        assert_eq!(state.add_fragment("<br>"), 1);
        assert_eq!(state.add_fragment("<p></p>"), 0);
        assert_eq!(state.fragment_count(), 2);
    }

    #[test]
    fn should_dedup_binders_by_shape_and_arg() {
        let mut state = ModuleState::new();
        let a = state.add_binder(&binder(TargetKind::Text, BinderIndex::Child(1)));
        let b = state.add_binder(&binder(TargetKind::Block, BinderIndex::Child(1)));
        let c = state.add_binder(&binder(TargetKind::Text, BinderIndex::Child(1)));
        assert_eq!((a, b, c), (0, 1, 0));
        assert_eq!(state.binder_count(), 2);
    }

    #[test]
    fn should_print_declarations_in_first_use_order() {
        let mut state = ModuleState::new();
        state.add_fragment("<span data-bind><text-node></text-node></span>");
        state.add_binder(&binder(
            TargetKind::Attribute,
            BinderIndex::Attribute("href".into()),
        ));
        assert_eq!(
            state.declarations(),
            vec![
                "const __render0 = renderer(makeFragment(`<span data-bind><text-node></text-node></span>`));",
                "const __bind0 = __attrBinder(\"href\");",
            ]
        );
    }

    #[test]
    fn should_map_binder_factory_names_to_helpers() {
        assert_eq!(
            RuntimeHelpers::for_import_name("__componentBinder"),
            RuntimeHelpers::COMPONENT_BINDER
        );
        assert_eq!(
            RuntimeHelpers::for_import_name("__blockBinder"),
            RuntimeHelpers::BLOCK_BINDER
        );
        assert!(RuntimeHelpers::for_import_name("unknown").is_empty());
    }

    #[test]
    fn should_collect_import_names() {
        let mut state = ModuleState::new();
        assert_eq!(state.import_names(), vec!["renderer", "makeFragment"]);
        state.add_binder(&binder(TargetKind::Text, BinderIndex::Child(0)));
        state.use_binding_type(BindingType::CombineFirst);
        state.use_binding_type(BindingType::Value);
        state.add_binder(&binder(TargetKind::Text, BinderIndex::Child(2)));
        assert_eq!(
            state.import_names(),
            vec!["renderer", "makeFragment", "__textBinder", "__combine"]
        );
    }
}
