//! The document tree the page behaviors operate on
//!
//! Elements live in an arena and are addressed by [`ElementId`]. The tree is
//! built once from page content; behaviors only mutate class lists, inline
//! styles and focus. Geometry is filled in by [`super::layout`].

use super::selector::{Selector, SelectorError};
use super::style::{ComputedStyle, InlineStyle, StyleDeclarations, StyleState, Stylesheet};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Arena index of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered, duplicate-free class list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    /// Returns true if the class was added
    pub fn add(&mut self, class: &str) -> bool {
        if self.contains(class) {
            return false;
        }
        self.0.push(class.to_string());
        true
    }

    /// Returns true if the class was present
    pub fn remove(&mut self, class: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != class);
        before != self.0.len()
    }
}

/// Document-relative box in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Builder for new elements
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    focusable: bool,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: None,
            focusable: tag.eq_ignore_ascii_case("a"),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: ClassList,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    focusable: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    inline: InlineStyle,
    style: StyleState,
    styled: bool,
    rect: Rect,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn class_list(&self) -> &ClassList {
        &self.classes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn inline_style(&self) -> &InlineStyle {
        &self.inline
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    /// Layout box (document coordinates)
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Equivalent of `offsetTop`
    pub fn offset_top(&self) -> f32 {
        self.rect.top
    }

    /// Equivalent of `offsetHeight`
    pub fn offset_height(&self) -> f32 {
        self.rect.height
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }
}

/// Arena-backed element tree with a stylesheet and focus
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    stylesheet: Stylesheet,
    focused: Option<ElementId>,
    dirty: BTreeSet<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document containing only `<html><body>`
    pub fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            stylesheet: Stylesheet::new(),
            focused: None,
            dirty: BTreeSet::new(),
        };
        let html = doc.push(None, ElementSpec::new("html"));
        doc.push(Some(html), ElementSpec::new("body"));
        doc
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    pub fn body(&self) -> ElementId {
        ElementId(1)
    }

    fn push(&mut self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: spec.tag,
            id: spec.id,
            classes: ClassList(Vec::new()),
            attrs: spec.attrs,
            text: spec.text,
            focusable: spec.focusable,
            parent,
            children: Vec::new(),
            inline: InlineStyle::default(),
            style: StyleState::default(),
            styled: false,
            rect: Rect::default(),
        });
        for class in &spec.classes {
            self.elements[id.0].classes.add(class);
        }
        if let Some(p) = parent {
            self.elements[p.0].children.push(id);
        }
        self.dirty.insert(id);
        id
    }

    /// Append a child element under `parent`
    pub fn append(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        self.push(Some(parent), spec)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// All element ids in document (pre-)order
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            if let Some(el) = self.get(next) {
                stack.extend(el.children.iter().rev().copied());
            }
            Some(next)
        })
    }

    // ─── Queries ─────────────────────────────────────────────

    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.ids().find(|&id| selector.matches(self, id)))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(&selector))
    }

    pub fn select(&self, selector: &Selector) -> Vec<ElementId> {
        self.ids().filter(|&id| selector.matches(self, id)).collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.ids()
            .find(|&el| self.get(el).and_then(Element::id) == Some(id))
    }

    // ─── Mutation ────────────────────────────────────────────

    pub fn class_list_mut(&mut self, id: ElementId) -> Option<&mut ClassList> {
        // class changes can alter matching for the whole subtree (descendant rules)
        self.mark_subtree_dirty(id);
        self.elements.get_mut(id.0).map(|e| &mut e.classes)
    }

    /// Overlay declarations onto the element's inline style
    pub fn set_inline_style(&mut self, id: ElementId, patch: &StyleDeclarations) -> bool {
        let Some(el) = self.elements.get_mut(id.0) else {
            return false;
        };
        el.inline.apply(patch);
        self.dirty.insert(id);
        true
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn set_focus(&mut self, id: Option<ElementId>) {
        if self.focused == id {
            return;
        }
        for changed in [self.focused, id].into_iter().flatten() {
            self.dirty.insert(changed);
        }
        self.focused = id;
    }

    /// Focusable elements in document order
    pub fn focusable(&self) -> Vec<ElementId> {
        self.ids()
            .filter(|&id| self.get(id).is_some_and(Element::is_focusable))
            .collect()
    }

    /// Mutable stylesheet access restyles the whole document on next commit
    pub fn stylesheet_mut(&mut self) -> &mut Stylesheet {
        let all: Vec<ElementId> = self.ids().collect();
        self.dirty.extend(all);
        &mut self.stylesheet
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.elements.get_mut(id.0) {
            el.rect = rect;
        }
    }

    fn mark_subtree_dirty(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.elements.get(next.0) {
                stack.extend(el.children.iter().copied());
                self.dirty.insert(next);
            }
        }
    }

    // ─── Style ───────────────────────────────────────────────

    /// Cascade result for one element right now (not yet committed)
    pub fn compute_style(&self, id: ElementId) -> ComputedStyle {
        let mut decl = StyleDeclarations::default();
        for rule in self.stylesheet.rules() {
            if rule.selector.matches(self, id) {
                decl.apply(&rule.declarations);
            }
        }
        if let Some(el) = self.get(id) {
            decl.apply(&el.inline);
        }
        ComputedStyle::from_declarations(&decl, &self.stylesheet)
    }

    /// Style recalculation: commit the computed style of every changed
    /// element at `now`, starting transitions where declared.
    ///
    /// Returns the number of elements whose committed style changed.
    pub fn commit_styles(&mut self, now: Duration) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        let mut changed = 0;
        for id in dirty {
            let next = self.compute_style(id);
            if let Some(el) = self.elements.get_mut(id.0) {
                let first = !el.styled;
                el.styled = true;
                if el.style.commit(next, now, first) && !first {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// True if any element is mid-transition at `now`
    pub fn is_animating(&self, now: Duration) -> bool {
        self.elements.iter().any(|e| e.style.is_animating(now))
    }
}
