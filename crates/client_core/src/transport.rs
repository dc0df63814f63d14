//! REST access to the biosample API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::BioSampleId,
    error::ApiError,
    protocol::{BioSample, BioSampleCreate, Comment, CommentCreate, ListQuery, PaginatedResponse},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::ClientError};

#[async_trait]
pub trait SampleApi: Send + Sync {
    async fn list_biosamples(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<BioSample>, ClientError>;
    /// `Ok(None)` when the server reports the sample does not exist.
    async fn get_biosample(&self, id: BioSampleId) -> Result<Option<BioSample>, ClientError>;
    async fn create_biosample(&self, draft: &BioSampleCreate) -> Result<BioSample, ClientError>;
    async fn update_biosample(
        &self,
        id: BioSampleId,
        draft: &BioSampleCreate,
    ) -> Result<BioSample, ClientError>;
    async fn delete_biosample(&self, id: BioSampleId) -> Result<(), ClientError>;
    async fn list_operators(&self) -> Result<Vec<String>, ClientError>;
    async fn list_sample_types(&self) -> Result<Vec<String>, ClientError>;
    async fn list_comments(
        &self,
        sample_id: BioSampleId,
        query: ListQuery,
    ) -> Result<PaginatedResponse<Comment>, ClientError>;
    async fn create_comment(
        &self,
        sample_id: BioSampleId,
        draft: &CommentCreate,
    ) -> Result<Comment, ClientError>;
}

pub struct HttpSampleApi {
    http: Client,
    base_url: Url,
}

impl HttpSampleApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })?;
        debug!(%method, %url, "api request");
        Ok(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api(
            ApiError::from_body(status.as_u16(), &body).into(),
        ))
    }

    async fn json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode {
            what,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl SampleApi for HttpSampleApi {
    async fn list_biosamples(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<BioSample>, ClientError> {
        let request = self.request(Method::GET, "biosamples/")?.query(&query);
        self.json("biosample list", request).await
    }

    async fn get_biosample(&self, id: BioSampleId) -> Result<Option<BioSample>, ClientError> {
        let request = self.request(Method::GET, &format!("biosamples/{id}"))?;
        match self.json("biosample", request).await {
            Ok(sample) => Ok(Some(sample)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_biosample(&self, draft: &BioSampleCreate) -> Result<BioSample, ClientError> {
        let request = self.request(Method::POST, "biosamples/")?.json(draft);
        self.json("created biosample", request).await
    }

    async fn update_biosample(
        &self,
        id: BioSampleId,
        draft: &BioSampleCreate,
    ) -> Result<BioSample, ClientError> {
        let request = self
            .request(Method::PUT, &format!("biosamples/{id}"))?
            .json(draft);
        self.json("updated biosample", request).await
    }

    async fn delete_biosample(&self, id: BioSampleId) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("biosamples/{id}"))?;
        // The body is a bare acknowledgement.
        self.send(request).await?;
        Ok(())
    }

    async fn list_operators(&self) -> Result<Vec<String>, ClientError> {
        let request = self.request(Method::GET, "operators/")?;
        self.json("operator list", request).await
    }

    async fn list_sample_types(&self) -> Result<Vec<String>, ClientError> {
        let request = self.request(Method::GET, "sample-types/")?;
        self.json("sample type list", request).await
    }

    async fn list_comments(
        &self,
        sample_id: BioSampleId,
        query: ListQuery,
    ) -> Result<PaginatedResponse<Comment>, ClientError> {
        let request = self
            .request(Method::GET, &format!("comments/{sample_id}"))?
            .query(&query);
        self.json("comment list", request).await
    }

    async fn create_comment(
        &self,
        sample_id: BioSampleId,
        draft: &CommentCreate,
    ) -> Result<Comment, ClientError> {
        let request = self
            .request(Method::POST, &format!("comments/{sample_id}"))?
            .json(draft);
        self.json("created comment", request).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
