//! Choice lists for the sample form's operator and sample-type pickers.

use tracing::error;

use crate::{error::ClientError, resource::ResourceController, transport::SampleApi};

pub struct FormOptions {
    operators: ResourceController<Vec<String>>,
    sample_types: ResourceController<Vec<String>>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self {
            operators: ResourceController::new("operators")
                .with_on_error(|message| error!("failed to load operators: {message}")),
            sample_types: ResourceController::new("sample-types")
                .with_on_error(|message| error!("failed to load sample types: {message}")),
        }
    }

    /// Loads both lists concurrently. Either list may still be usable when
    /// the other fails; the first error is returned.
    pub async fn load(&self, api: &dyn SampleApi) -> Result<(), ClientError> {
        let (operators, sample_types) = futures::join!(
            self.operators.execute(|| api.list_operators()),
            self.sample_types.execute(|| api.list_sample_types()),
        );
        operators?;
        sample_types?;
        Ok(())
    }

    pub fn operators(&self) -> Vec<String> {
        self.operators.data().unwrap_or_default()
    }

    pub fn sample_types(&self) -> Vec<String> {
        self.sample_types.data().unwrap_or_default()
    }

    pub fn operators_controller(&self) -> &ResourceController<Vec<String>> {
        &self.operators
    }

    pub fn sample_types_controller(&self) -> &ResourceController<Vec<String>> {
        &self.sample_types
    }

    /// Choices matching `query`, case-insensitively, for a searchable picker.
    pub fn matching_operators(&self, query: &str) -> Vec<String> {
        filter_choices(self.operators(), query)
    }

    pub fn matching_sample_types(&self, query: &str) -> Vec<String> {
        filter_choices(self.sample_types(), query)
    }
}

fn filter_choices(choices: Vec<String>, query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return choices;
    }
    choices
        .into_iter()
        .filter(|choice| choice.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
#[path = "../tests/form_options_tests.rs"]
mod tests;
