//! The page the handler reads from and paints into.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::verdict;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("No element with id '{0}'")]
    ElementNotFound(String),
    #[error("Document lock poisoned")]
    Poisoned,
}

/// Display surface seen by the handler: one input to read, one container
/// to replace.
pub trait UiPort: Send + Sync {
    fn read_input_text(&self) -> Result<String, UiError>;

    fn render_result(
        &self,
        text: &str,
        sentiment: &str,
        color: &str,
        size: &str,
    ) -> Result<(), UiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub value: String,
    pub inner_html: String,
}

/// In-memory page: elements addressed by id.
#[derive(Debug)]
pub struct Document {
    input_id: String,
    result_id: String,
    elements: Mutex<HashMap<String, Element>>,
}

impl Document {
    /// An empty page that reads `input_id` and writes `result_id`.
    pub fn new(input_id: impl Into<String>, result_id: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            result_id: result_id.into(),
            elements: Mutex::new(HashMap::new()),
        }
    }

    /// The stock form: `text` input holding `value` and an empty `result`.
    pub fn with_form(value: impl Into<String>) -> Self {
        let doc = Self::new("text", "result");
        doc.insert("text", Element { value: value.into(), ..Element::default() });
        doc.insert("result", Element::default());
        doc
    }

    pub fn insert(&self, id: impl Into<String>, element: Element) {
        // A poisoned map still holds consistent data; inserts are whole-value.
        let mut elements = self.elements.lock().unwrap_or_else(|e| e.into_inner());
        elements.insert(id.into(), element);
    }

    pub fn set_value(&self, id: &str, value: impl Into<String>) -> Result<(), UiError> {
        self.with_element(id, |el| el.value = value.into())
    }

    pub fn element(&self, id: &str) -> Option<Element> {
        self.elements.lock().ok()?.get(id).cloned()
    }

    /// Current markup of the result container.
    pub fn result_html(&self) -> Result<String, UiError> {
        self.with_element(&self.result_id, |el| el.inner_html.clone())
    }

    fn with_element<R>(&self, id: &str, f: impl FnOnce(&mut Element) -> R) -> Result<R, UiError> {
        let mut elements = self.elements.lock().map_err(|_| UiError::Poisoned)?;
        let element = elements
            .get_mut(id)
            .ok_or_else(|| UiError::ElementNotFound(id.to_string()))?;
        Ok(f(element))
    }
}

impl UiPort for Document {
    fn read_input_text(&self) -> Result<String, UiError> {
        self.with_element(&self.input_id, |el| el.value.clone())
    }

    fn render_result(
        &self,
        text: &str,
        sentiment: &str,
        color: &str,
        size: &str,
    ) -> Result<(), UiError> {
        let markup = verdict::fragment(text, sentiment, color, size);
        self.with_element(&self.result_id, |el| el.inner_html = markup)
    }
}
