//! A headless stand-in for the page DOM: forms with their declared
//! action and method, and the handful of element properties the pages
//! toggle (visibility, display, text, click handler name).

use crate::domain::model::FormData;
use reqwest::Method;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Default,
    Flex,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub visibility: Visibility,
    pub display: Display,
    pub text: String,
    pub onclick: Option<String>,
}

impl Element {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            classes: vec![class.into()],
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn onclick(mut self, handler: impl Into<String>) -> Self {
        self.onclick = Some(handler.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: String,
    pub action: String,
    pub method: Method,
    /// Values the form carries before the user edits it.
    pub defaults: FormData,
    /// What is currently filled in; cleared back to `defaults` by a reset.
    pub values: FormData,
}

impl Form {
    pub fn new(id: impl Into<String>, method: Method, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            method,
            defaults: FormData::new(),
            values: FormData::new(),
        }
    }

    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.append(name, value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    forms: BTreeMap<String, Form>,
    elements: Vec<Element>,
}

pub type SharedDocument = Arc<Mutex<Document>>;

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn add_form(&mut self, form: Form) {
        self.forms.insert(form.id.clone(), form);
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.add_form(form);
        self
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.add_element(element);
        self
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.get(id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut Form> {
        self.forms.get_mut(id)
    }

    pub fn form_ids(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
    }

    pub fn elements_with_class_mut<'a>(
        &'a mut self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.iter_mut().filter(move |e| e.has_class(class))
    }

    pub fn elements_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    pub fn set_visibility(&mut self, id: &str, visibility: Visibility) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.visibility = visibility;
                true
            }
            None => false,
        }
    }

    pub fn set_display(&mut self, id: &str, display: Display) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.display = display;
                true
            }
            None => false,
        }
    }

    /// Restores a form's values to its defaults. Missing forms are ignored.
    pub fn reset_form(&mut self, id: &str) {
        if let Some(form) = self.forms.get_mut(id) {
            form.values = form.defaults.clone();
        }
    }

    /// Points an existing form at another endpoint. Returns false when absent.
    pub fn override_form(&mut self, id: &str, action: Option<&str>, method: Option<Method>) -> bool {
        let Some(form) = self.forms.get_mut(id) else {
            return false;
        };
        if let Some(action) = action {
            form.action = action.to_string();
        }
        if let Some(method) = method {
            form.method = method;
        }
        true
    }
}

/// Locks a shared document, recovering the data if a holder panicked.
pub fn lock(document: &SharedDocument) -> MutexGuard<'_, Document> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_defaults() {
        let mut doc = Document::new().with_form(
            Form::new("submitter", Method::POST, "/api/contests/1/submissions")
                .default_value("team_id", "1"),
        );
        doc.form_mut("submitter").unwrap().values = FormData::new().with("answer", "42");

        doc.reset_form("submitter");

        let form = doc.form("submitter").unwrap();
        assert_eq!(form.values.get("team_id"), Some("1"));
        assert_eq!(form.values.get("answer"), None);
    }

    #[test]
    fn override_changes_only_given_parts() {
        let mut doc = Document::new().with_form(Form::new("update", Method::PATCH, "/a"));

        assert!(doc.override_form("update", None, Some(Method::PUT)));
        assert!(!doc.override_form("missing", Some("/b"), None));

        let form = doc.form("update").unwrap();
        assert_eq!(form.action, "/a");
        assert_eq!(form.method, Method::PUT);
    }

    #[test]
    fn class_lookup_touches_every_match() {
        let mut doc = Document::new()
            .with_element(Element::with_class("fake-team"))
            .with_element(Element::with_class("team"))
            .with_element(Element::with_class("fake-team"));

        for element in doc.elements_with_class_mut("fake-team") {
            element.visibility = Visibility::Hidden;
        }

        assert_eq!(
            doc.elements_with_class("fake-team")
                .filter(|e| e.visibility == Visibility::Hidden)
                .count(),
            2
        );
        assert_eq!(doc.elements_with_class("team").next().unwrap().visibility, Visibility::Visible);
    }
}
