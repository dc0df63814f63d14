//! In-memory `SampleApi` used by the screen tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::{BioSampleId, CommentId},
    protocol::{BioSample, BioSampleCreate, Comment, CommentCreate, ListQuery, PaginatedResponse},
};

use crate::{error::ClientError, transport::SampleApi};

pub(crate) fn sample(id: i64) -> BioSample {
    BioSample {
        id: BioSampleId(id),
        location: format!("site-{id}"),
        sample_type_name: "Water".into(),
        sampling_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
        operator_name: "Ada".into(),
        created_at: None,
    }
}

pub(crate) fn draft(location: &str) -> BioSampleCreate {
    BioSampleCreate {
        location: location.into(),
        sample_type_name: "Soil".into(),
        sampling_date: NaiveDate::from_ymd_opt(2024, 6, 2).expect("date"),
        operator_name: "Grace".into(),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    samples: Mutex<Vec<BioSample>>,
    comments: Mutex<Vec<Comment>>,
    next_id: AtomicI64,
    failures: Mutex<HashMap<&'static str, String>>,
    queries: Mutex<Vec<(&'static str, ListQuery)>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    pub(crate) fn with_samples(count: i64) -> Self {
        let api = Self::default();
        *api.samples.lock().expect("samples") = (1..=count).map(sample).collect();
        api.next_id.store(count + 1, Ordering::SeqCst);
        api
    }

    pub(crate) fn with_comments(self, sample_id: i64, count: i64) -> Self {
        {
            let mut comments = self.comments.lock().expect("comments");
            for n in 0..count {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                comments.push(Comment {
                    id: CommentId(id),
                    bio_sample_id: BioSampleId(sample_id),
                    content: format!("comment {n}"),
                    author: "bob".into(),
                    created_at: NaiveDate::from_ymd_opt(2024, 5, 2)
                        .and_then(|date| date.and_hms_opt(9, 0, n as u32))
                        .expect("timestamp"),
                });
            }
        }
        self
    }

    /// Makes every later call to `op` fail with `message` until `recover`.
    pub(crate) fn fail(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .expect("failures")
            .insert(op, message.to_string());
    }

    pub(crate) fn recover(&self, op: &'static str) {
        self.failures.lock().expect("failures").remove(op);
    }

    pub(crate) fn queries(&self, op: &'static str) -> Vec<ListQuery> {
        self.queries
            .lock()
            .expect("queries")
            .iter()
            .filter(|(name, _)| *name == op)
            .map(|(_, query)| *query)
            .collect()
    }

    pub(crate) fn call_count(&self, op: &'static str) -> usize {
        self.calls
            .lock()
            .expect("calls")
            .iter()
            .filter(|name| **name == op)
            .count()
    }

    pub(crate) fn remove_sample(&self, id: i64) {
        self.samples
            .lock()
            .expect("samples")
            .retain(|sample| sample.id.0 != id);
    }

    fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        self.calls.lock().expect("calls").push(op);
        match self.failures.lock().expect("failures").get(op) {
            Some(message) => Err(ClientError::transport(message.clone())),
            None => Ok(()),
        }
    }

    fn record(&self, op: &'static str, query: ListQuery) {
        self.queries.lock().expect("queries").push((op, query));
    }
}

fn page_of<T: Clone>(newest_last: &[T], query: ListQuery) -> PaginatedResponse<T> {
    let results = newest_last
        .iter()
        .rev()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .cloned()
        .collect();
    PaginatedResponse {
        results,
        total_count: newest_last.len() as u64,
    }
}

#[async_trait]
impl SampleApi for FakeApi {
    async fn list_biosamples(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<BioSample>, ClientError> {
        self.enter("list_biosamples")?;
        self.record("list_biosamples", query);
        Ok(page_of(&self.samples.lock().expect("samples"), query))
    }

    async fn get_biosample(&self, id: BioSampleId) -> Result<Option<BioSample>, ClientError> {
        self.enter("get_biosample")?;
        Ok(self
            .samples
            .lock()
            .expect("samples")
            .iter()
            .find(|sample| sample.id == id)
            .cloned())
    }

    async fn create_biosample(&self, draft: &BioSampleCreate) -> Result<BioSample, ClientError> {
        self.enter("create_biosample")?;
        let created = BioSample {
            id: BioSampleId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            location: draft.location.clone(),
            sample_type_name: draft.sample_type_name.clone(),
            sampling_date: draft.sampling_date,
            operator_name: draft.operator_name.clone(),
            created_at: None,
        };
        self.samples.lock().expect("samples").push(created.clone());
        Ok(created)
    }

    async fn update_biosample(
        &self,
        id: BioSampleId,
        draft: &BioSampleCreate,
    ) -> Result<BioSample, ClientError> {
        self.enter("update_biosample")?;
        let mut samples = self.samples.lock().expect("samples");
        let sample = samples
            .iter_mut()
            .find(|sample| sample.id == id)
            .ok_or_else(|| ClientError::api(404, "BioSample not found"))?;
        sample.location = draft.location.clone();
        sample.sample_type_name = draft.sample_type_name.clone();
        sample.sampling_date = draft.sampling_date;
        sample.operator_name = draft.operator_name.clone();
        Ok(sample.clone())
    }

    async fn delete_biosample(&self, id: BioSampleId) -> Result<(), ClientError> {
        self.enter("delete_biosample")?;
        self.remove_sample(id.0);
        Ok(())
    }

    async fn list_operators(&self) -> Result<Vec<String>, ClientError> {
        self.enter("list_operators")?;
        Ok(vec!["Ada".into(), "Grace".into(), "Linus".into()])
    }

    async fn list_sample_types(&self) -> Result<Vec<String>, ClientError> {
        self.enter("list_sample_types")?;
        Ok(vec!["Water".into(), "Soil".into()])
    }

    async fn list_comments(
        &self,
        sample_id: BioSampleId,
        query: ListQuery,
    ) -> Result<PaginatedResponse<Comment>, ClientError> {
        self.enter("list_comments")?;
        self.record("list_comments", query);
        let comments: Vec<Comment> = self
            .comments
            .lock()
            .expect("comments")
            .iter()
            .filter(|comment| comment.bio_sample_id == sample_id)
            .cloned()
            .collect();
        Ok(page_of(&comments, query))
    }

    async fn create_comment(
        &self,
        sample_id: BioSampleId,
        draft: &CommentCreate,
    ) -> Result<Comment, ClientError> {
        self.enter("create_comment")?;
        let comment = Comment {
            id: CommentId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            bio_sample_id: sample_id,
            content: draft.content.clone(),
            author: draft.author.clone(),
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|date| date.and_hms_opt(12, 0, 0))
                .expect("timestamp"),
        };
        self.comments.lock().expect("comments").push(comment.clone());
        Ok(comment)
    }
}
