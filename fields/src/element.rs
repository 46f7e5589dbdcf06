//! The slice of an input element a field controller is allowed to touch.
//!
//! Controllers receive their element as an owned handle instead of looking
//! it up by id, so they run the same against a real page bridge or the
//! in-memory [`MemoryElement`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const VALID_CLASS: &str = "is-valid";
pub const INVALID_CLASS: &str = "is-invalid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Valid,
    Invalid,
}

impl FeedbackKind {
    /// Class of the feedback node placed next to the field.
    pub fn feedback_class(self) -> &'static str {
        match self {
            FeedbackKind::Valid => "valid-feedback",
            FeedbackKind::Invalid => "invalid-feedback",
        }
    }

    /// Class set on the field itself.
    pub fn state_class(self) -> &'static str {
        match self {
            FeedbackKind::Valid => VALID_CLASS,
            FeedbackKind::Invalid => INVALID_CLASS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

pub trait FieldElement: Send + Sync {
    fn id(&self) -> &str;

    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Appends a feedback node to the field's container.
    fn append_feedback(&self, feedback: Feedback);

    /// Removes the field's feedback node, if there is one.
    fn remove_feedback(&self);

    fn focus(&self);
}

pub type ElementHandle = Arc<dyn FieldElement>;

/// Resolves element ids at form initialization time.
pub trait Page: Send + Sync {
    fn element(&self, id: &str) -> Option<ElementHandle>;
}

/// Drops any valid/invalid class and feedback node from `element`.
pub fn clear_validation(element: &dyn FieldElement) {
    element.remove_class(VALID_CLASS);
    element.remove_class(INVALID_CLASS);
    element.remove_feedback();
}

/// Replaces the field's validation state; exactly one state is left applied.
pub fn render_validation(element: &dyn FieldElement, valid: bool, message: &str) {
    clear_validation(element);

    let kind = if valid {
        FeedbackKind::Valid
    } else {
        FeedbackKind::Invalid
    };
    element.add_class(kind.state_class());
    element.append_feedback(Feedback {
        kind,
        text: message.to_string(),
    });
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct MemoryState {
    value: String,
    classes: BTreeSet<String>,
    feedback: Vec<Feedback>,
    focus_count: usize,
}

/// Element kept entirely in memory, for headless use and tests.
#[derive(Debug)]
pub struct MemoryElement {
    id: String,
    state: Mutex<MemoryState>,
}

impl MemoryElement {
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            state: Mutex::new(MemoryState::default()),
        })
    }

    pub fn with_value(id: impl Into<String>, value: &str) -> Arc<Self> {
        let element = Self::new(id);
        element.set_value(value);
        element
    }

    pub fn classes(&self) -> Vec<String> {
        lock(&self.state).classes.iter().cloned().collect()
    }

    /// Feedback nodes currently attached; never more than one when driven by a controller.
    pub fn feedback(&self) -> Vec<Feedback> {
        lock(&self.state).feedback.clone()
    }

    pub fn feedback_text(&self) -> Option<String> {
        lock(&self.state).feedback.last().map(|f| f.text.clone())
    }

    pub fn focus_count(&self) -> usize {
        lock(&self.state).focus_count
    }
}

impl FieldElement for MemoryElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> String {
        lock(&self.state).value.clone()
    }

    fn set_value(&self, value: &str) {
        lock(&self.state).value = value.to_string();
    }

    fn add_class(&self, class: &str) {
        lock(&self.state).classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        lock(&self.state).classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        lock(&self.state).classes.contains(class)
    }

    fn append_feedback(&self, feedback: Feedback) {
        lock(&self.state).feedback.push(feedback);
    }

    fn remove_feedback(&self) {
        lock(&self.state).feedback.clear();
    }

    fn focus(&self) {
        lock(&self.state).focus_count += 1;
    }
}

/// Page made of [`MemoryElement`]s keyed by id.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: HashMap<String, Arc<MemoryElement>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &str) -> Arc<MemoryElement> {
        let element = MemoryElement::new(id);
        self.elements.insert(id.to_string(), Arc::clone(&element));
        element
    }

    pub fn get(&self, id: &str) -> Option<Arc<MemoryElement>> {
        self.elements.get(id).cloned()
    }
}

impl Page for MemoryPage {
    fn element(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .get(id)
            .map(|element| Arc::clone(element) as ElementHandle)
    }
}
