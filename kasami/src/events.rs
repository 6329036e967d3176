#![deny(warnings)]

use crate::grammar::{Grammar, SymbolId};
use crate::trees::{NodeRef, ParseTree};

/// Callbacks observe a node, they can't change the tree.
pub type Callback<'a> = Box<dyn Fn(NodeRef<'_>) + 'a>;

pub const PRE_EVENT_SUFFIX: &str = "_pre_event";
pub const POST_EVENT_SUFFIX: &str = "_post_event";

#[derive(Default)]
struct Hooks<'a> {
    pre: Option<Callback<'a>>,
    post: Option<Callback<'a>>,
}

/// Walks parse trees depth first, calling the pre-event of a node before
/// its children and the post-event after them. Callbacks are registered by
/// rule name and resolved to symbol ids once, at registration.
pub struct EventDispatcher<'a> {
    grammar: &'a Grammar,
    hooks: Vec<Hooks<'a>>,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        EventDispatcher {
            grammar,
            hooks: (0..grammar.num_symbols()).map(|_| Hooks::default()).collect(),
        }
    }

    fn rule_hooks(&mut self, rule: &str) -> Option<&mut Hooks<'a>> {
        let hooks = self.grammar.symbol_id(rule)
            .filter(|id| self.grammar.rule_name(*id).is_some())
            .and_then(|id| self.hooks.get_mut(id));
        if hooks.is_none() {
            log::warn!("Ignoring event for unknown rule {:?}", rule);
        }
        hooks
    }

    pub fn pre_event(&mut self, rule: &str, callback: impl Fn(NodeRef<'_>) + 'a) {
        if let Some(hooks) = self.rule_hooks(rule) {
            hooks.pre = Some(Box::new(callback));
        }
    }

    pub fn post_event(&mut self, rule: &str, callback: impl Fn(NodeRef<'_>) + 'a) {
        if let Some(hooks) = self.rule_hooks(rule) {
            hooks.post = Some(Box::new(callback));
        }
    }

    /// Register using the `<Rule>_pre_event` / `<Rule>_post_event` naming.
    pub fn event(&mut self, name: &str, callback: impl Fn(NodeRef<'_>) + 'a) {
        if let Some(rule) = name.strip_suffix(PRE_EVENT_SUFFIX) {
            self.pre_event(rule, callback);
        } else if let Some(rule) = name.strip_suffix(POST_EVENT_SUFFIX) {
            self.post_event(rule, callback);
        } else {
            log::warn!("Ignoring event {:?}: no pre/post suffix", name);
        }
    }

    /// Build from a name → callback mapping such as `{"Carbon_pre_event": f}`.
    pub fn from_events<I, S>(grammar: &'a Grammar, events: I) -> Self
        where I: IntoIterator<Item=(S, Callback<'a>)>, S: AsRef<str>
    {
        let mut dispatcher = EventDispatcher::new(grammar);
        for (name, callback) in events {
            dispatcher.event(name.as_ref(), callback);
        }
        dispatcher
    }

    fn hooks_for(&self, rule: SymbolId) -> Option<&Hooks<'a>> {
        self.hooks.get(rule)
    }

    pub fn dispatch(&self, tree: &ParseTree) {
        self.walker(tree.root());
    }

    fn walker(&self, node: NodeRef<'_>) {
        let hooks = self.hooks_for(node.rule());
        if let Some(pre) = hooks.and_then(|h| h.pre.as_ref()) {
            pre(node);
        }
        if let Some((left, right)) = node.children() {
            self.walker(left);
            self.walker(right);
        }
        if let Some(post) = hooks.and_then(|h| h.post.as_ref()) {
            post(node);
        }
    }
}
