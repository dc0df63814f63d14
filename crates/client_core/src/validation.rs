//! Form-level checks run before a mutation is handed to a controller.

use chrono::NaiveDate;
use shared::protocol::{BioSample, BioSampleCreate, CommentCreate};

use crate::error::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw, untrimmed field values of the sample create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleForm {
    pub location: String,
    pub sample_type_name: String,
    pub sampling_date: String,
    pub operator_name: String,
}

impl SampleForm {
    /// Prefills the edit form from a loaded sample.
    pub fn from_sample(sample: &BioSample) -> Self {
        Self {
            location: sample.location.clone(),
            sample_type_name: sample.sample_type_name.clone(),
            sampling_date: sample.sampling_date.format(DATE_FORMAT).to_string(),
            operator_name: sample.operator_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<BioSampleCreate, ValidationError> {
        let missing: Vec<&'static str> = [
            ("location", &self.location),
            ("sample type", &self.sample_type_name),
            ("sampling date", &self.sampling_date),
            ("operator", &self.operator_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let raw_date = self.sampling_date.trim();
        let sampling_date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(raw_date.to_string()))?;

        Ok(BioSampleCreate {
            location: self.location.trim().to_string(),
            sample_type_name: self.sample_type_name.trim().to_string(),
            sampling_date,
            operator_name: self.operator_name.trim().to_string(),
        })
    }
}

pub fn validate_comment(content: &str, author: &str) -> Result<CommentCreate, ValidationError> {
    let content = content.trim();
    let author = author.trim();
    let mut missing = Vec::new();
    if content.is_empty() {
        missing.push("content");
    }
    if author.is_empty() {
        missing.push("author");
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    Ok(CommentCreate {
        content: content.to_string(),
        author: author.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SampleForm {
        SampleForm {
            location: "  North pond ".into(),
            sample_type_name: "Water".into(),
            sampling_date: "2024-03-18".into(),
            operator_name: " Dr. Ada ".into(),
        }
    }

    #[test]
    fn trims_values_on_success() {
        let draft = filled().validate().expect("valid");
        assert_eq!(draft.location, "North pond");
        assert_eq!(draft.operator_name, "Dr. Ada");
        assert_eq!(
            draft.sampling_date,
            NaiveDate::from_ymd_opt(2024, 3, 18).expect("date")
        );
    }

    #[test]
    fn reports_every_blank_field() {
        let form = SampleForm {
            location: "   ".into(),
            operator_name: String::new(),
            ..filled()
        };
        let err = form.validate().expect_err("blank fields");
        assert!(err.is_field_missing("location"));
        assert!(err.is_field_missing("operator"));
        assert!(!err.is_field_missing("sample type"));
    }

    #[test]
    fn rejects_malformed_date() {
        let form = SampleForm {
            sampling_date: "18/03/2024".into(),
            ..filled()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidDate("18/03/2024".into()))
        );
    }

    #[test]
    fn comment_requires_content_and_author() {
        let err = validate_comment(" ", "bob").expect_err("blank content");
        assert_eq!(err, ValidationError::MissingFields(vec!["content"]));

        let draft = validate_comment(" looks fine ", " bob ").expect("valid");
        assert_eq!(draft.content, "looks fine");
        assert_eq!(draft.author, "bob");
    }
}
