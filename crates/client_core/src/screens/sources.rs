use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::BioSampleId,
    protocol::{BioSample, BioSampleCreate, Comment, CommentCreate, ListQuery, PaginatedResponse},
};

use crate::{error::ClientError, screens::list::{ListScreen, ListSource}, transport::SampleApi};

pub type SampleListScreen = ListScreen<SampleSource>;
pub type CommentsSection = ListScreen<CommentSource>;

#[derive(Clone)]
pub struct SampleSource {
    api: Arc<dyn SampleApi>,
}

impl SampleSource {
    pub fn new(api: Arc<dyn SampleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for SampleSource {
    type Item = BioSample;
    type Draft = BioSampleCreate;

    fn label(&self) -> &'static str {
        "samples"
    }

    async fn fetch_page(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<BioSample>, ClientError> {
        self.api.list_biosamples(query).await
    }

    async fn create(&self, draft: BioSampleCreate) -> Result<BioSample, ClientError> {
        self.api.create_biosample(&draft).await
    }
}

/// Comments threaded under one sample.
#[derive(Clone)]
pub struct CommentSource {
    api: Arc<dyn SampleApi>,
    sample_id: BioSampleId,
}

impl CommentSource {
    pub fn new(api: Arc<dyn SampleApi>, sample_id: BioSampleId) -> Self {
        Self { api, sample_id }
    }

    pub fn sample_id(&self) -> BioSampleId {
        self.sample_id
    }
}

#[async_trait]
impl ListSource for CommentSource {
    type Item = Comment;
    type Draft = CommentCreate;

    fn label(&self) -> &'static str {
        "comments"
    }

    async fn fetch_page(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<Comment>, ClientError> {
        self.api.list_comments(self.sample_id, query).await
    }

    async fn create(&self, draft: CommentCreate) -> Result<Comment, ClientError> {
        self.api.create_comment(self.sample_id, &draft).await
    }
}
