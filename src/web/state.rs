use crate::{content::Validator, model::ModelManager};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    validator: Validator,
}

impl AppState {
    pub fn new(mm: ModelManager, validator: Validator) -> Self {
        Self { mm, validator }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    /// Validator applied to submissions unless a request overrides it.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}
