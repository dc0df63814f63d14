use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{BioSampleId, CommentId, Keyed};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioSample {
    pub id: BioSampleId,
    pub location: String,
    pub sample_type_name: String,
    pub sampling_date: NaiveDate,
    pub operator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Keyed for BioSample {
    type Key = BioSampleId;

    fn key(&self) -> BioSampleId {
        self.id
    }
}

/// Body for both `POST /biosamples/` and `PUT /biosamples/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioSampleCreate {
    pub location: String,
    pub sample_type_name: String,
    pub sampling_date: NaiveDate,
    pub operator_name: String,
}

impl From<&BioSample> for BioSampleCreate {
    fn from(sample: &BioSample) -> Self {
        Self {
            location: sample.location.clone(),
            sample_type_name: sample.sample_type_name.clone(),
            sampling_date: sample.sampling_date,
            operator_name: sample.operator_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(alias = "biosampleId")]
    pub bio_sample_id: BioSampleId,
    pub content: String,
    pub author: String,
    pub created_at: NaiveDateTime,
}

impl Keyed for Comment {
    type Key = CommentId;

    fn key(&self) -> CommentId {
        self.id
    }
}

/// The sample id travels in the URL, not in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreate {
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub total_count: u64,
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: u64,
    pub offset: u64,
}
