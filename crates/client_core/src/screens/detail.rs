//! Single-sample view with edit, delete and the nested comment list.

use std::{num::NonZeroU64, sync::Arc};

use shared::{
    domain::BioSampleId,
    protocol::{BioSample, BioSampleCreate},
};
use tracing::{error, info, warn};

use crate::{
    error::ClientError,
    resource::{RequestStatus, ResourceController, GENERIC_FAILURE_MESSAGE},
    screens::sources::{CommentSource, CommentsSection},
    transport::SampleApi,
};

/// Outcome of looking a sample up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    NotFetched,
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Loaded,
    NotFound,
    Errored,
    Editing,
    ConfirmingDelete,
    Deleted,
}

/// What the caller should do after a detail-screen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    BackToList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading,
    /// Fetch failed; offer a retry and a way back to the list.
    Failed { message: String },
    NotFound,
    Ready {
        sample: BioSample,
        editing: bool,
        confirming_delete: bool,
        deleting: bool,
        update_error: Option<String>,
        delete_error: Option<String>,
    },
    Deleted,
}

pub struct DetailScreen {
    api: Arc<dyn SampleApi>,
    sample_id: BioSampleId,
    comments_per_page: NonZeroU64,
    /// `Some(None)` records a settled lookup that found nothing.
    sample: ResourceController<Option<BioSample>>,
    update: ResourceController<BioSample>,
    delete: ResourceController<()>,
    comments: Option<CommentsSection>,
    phase: DetailPhase,
}

impl DetailScreen {
    pub fn new(
        api: Arc<dyn SampleApi>,
        sample_id: BioSampleId,
        comments_per_page: NonZeroU64,
    ) -> Self {
        let sample = ResourceController::new("biosample").with_on_error(|message| {
            error!("failed to load sample: {message}");
        });
        let splice = sample.clone();
        let update = ResourceController::new("biosample-update")
            .with_on_success(move |updated: &BioSample| {
                splice.set_data(Some(Some(updated.clone())));
            })
            .with_on_error(|message| error!("failed to update sample: {message}"));
        let delete = ResourceController::new("biosample-delete")
            .with_on_error(|message| error!("failed to delete sample: {message}"));

        Self {
            api,
            sample_id,
            comments_per_page,
            sample,
            update,
            delete,
            comments: None,
            phase: DetailPhase::Loading,
        }
    }

    pub fn sample_id(&self) -> BioSampleId {
        self.sample_id
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    pub fn sample_controller(&self) -> &ResourceController<Option<BioSample>> {
        &self.sample
    }

    pub fn update_controller(&self) -> &ResourceController<BioSample> {
        &self.update
    }

    pub fn delete_controller(&self) -> &ResourceController<()> {
        &self.delete
    }

    pub fn comments(&self) -> Option<&CommentsSection> {
        self.comments.as_ref()
    }

    pub fn comments_mut(&mut self) -> Option<&mut CommentsSection> {
        self.comments.as_mut()
    }

    pub fn lookup(&self) -> Lookup<BioSample> {
        self.sample.with_data(|data| match data {
            None => Lookup::NotFetched,
            Some(None) => Lookup::NotFound,
            Some(Some(sample)) => Lookup::Found(sample.clone()),
        })
    }

    pub fn view(&self) -> DetailView {
        match self.phase {
            DetailPhase::Loading => DetailView::Loading,
            DetailPhase::Deleted => DetailView::Deleted,
            DetailPhase::Errored => DetailView::Failed {
                message: self
                    .sample
                    .error()
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            },
            DetailPhase::NotFound => DetailView::NotFound,
            DetailPhase::Loaded | DetailPhase::Editing | DetailPhase::ConfirmingDelete => {
                match self.lookup() {
                    Lookup::Found(sample) => DetailView::Ready {
                        sample,
                        editing: self.phase == DetailPhase::Editing,
                        confirming_delete: self.phase == DetailPhase::ConfirmingDelete,
                        deleting: self.delete.is_pending(),
                        update_error: self.update.error(),
                        delete_error: self.delete.error(),
                    },
                    Lookup::NotFound => DetailView::NotFound,
                    Lookup::NotFetched => DetailView::Loading,
                }
            }
        }
    }

    /// Fetches the sample, clearing any previously shown sample first so a
    /// different id never flashes stale data. Mounts the comment list once the
    /// sample is found.
    pub async fn load(&mut self) -> Result<Lookup<BioSample>, ClientError> {
        self.phase = DetailPhase::Loading;
        self.sample.set_data(None);

        let id = self.sample_id;
        let api = &self.api;
        let outcome = self.sample.execute(|| api.get_biosample(id)).await;
        match outcome {
            Ok(Some(sample)) => {
                self.phase = DetailPhase::Loaded;
                self.mount_comments(sample.id).await;
                Ok(Lookup::Found(sample))
            }
            Ok(None) => {
                info!(sample_id = id.0, "sample not found");
                self.phase = DetailPhase::NotFound;
                self.comments = None;
                Ok(Lookup::NotFound)
            }
            Err(err) => {
                self.phase = DetailPhase::Errored;
                Err(err)
            }
        }
    }

    pub async fn retry(&mut self) -> Result<Lookup<BioSample>, ClientError> {
        self.load().await
    }

    /// Switches to another sample id and loads it. Update and delete outcomes
    /// belong to the previous sample and are cleared.
    pub async fn navigate_to(
        &mut self,
        sample_id: BioSampleId,
    ) -> Result<Lookup<BioSample>, ClientError> {
        if sample_id != self.sample_id {
            self.update.reset();
            self.delete.reset();
        }
        self.sample_id = sample_id;
        self.load().await
    }

    async fn mount_comments(&mut self, sample_id: BioSampleId) {
        let stale = self
            .comments
            .as_ref()
            .map_or(true, |section| section.source().sample_id() != sample_id);
        if stale {
            self.comments = Some(CommentsSection::new(
                CommentSource::new(Arc::clone(&self.api), sample_id),
                self.comments_per_page,
            ));
        }
        if let Some(section) = self.comments.as_mut() {
            if let Err(err) = section.load().await {
                warn!(sample_id = sample_id.0, "comments unavailable: {err}");
            }
        }
    }

    pub fn open_edit(&mut self) -> bool {
        self.transition(DetailPhase::Loaded, DetailPhase::Editing)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.transition(DetailPhase::Editing, DetailPhase::Loaded)
    }

    /// Sends the edit. The server's copy of the sample replaces the shown one
    /// without a refetch and the edit surface closes. On failure the surface
    /// stays open with the error on the update controller.
    ///
    /// Returns `Ok(None)` when no sample is loaded.
    pub async fn submit_edit(
        &mut self,
        draft: BioSampleCreate,
    ) -> Result<Option<BioSample>, ClientError> {
        let Some(current) = self.lookup().found().map(|sample| sample.id) else {
            return Ok(None);
        };
        let api = &self.api;
        let updated = self
            .update
            .execute(|| api.update_biosample(current, &draft))
            .await?;
        self.phase = DetailPhase::Loaded;
        Ok(Some(updated))
    }

    pub fn request_delete(&mut self) -> bool {
        self.transition(DetailPhase::Loaded, DetailPhase::ConfirmingDelete)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.transition(DetailPhase::ConfirmingDelete, DetailPhase::Loaded)
    }

    /// Deletes the shown sample. Success means the caller leaves this screen.
    pub async fn confirm_delete(&mut self) -> Result<Navigation, ClientError> {
        let Some(current) = self.lookup().found().map(|sample| sample.id) else {
            return Ok(Navigation::Stay);
        };
        let api = &self.api;
        self.delete
            .execute(|| api.delete_biosample(current))
            .await?;
        info!(sample_id = current.0, "sample deleted");
        self.phase = DetailPhase::Deleted;
        Ok(Navigation::BackToList)
    }

    pub fn navigate_back(&self) -> Navigation {
        Navigation::BackToList
    }

    pub fn is_busy(&self) -> bool {
        [
            self.sample.status(),
            self.update.status(),
            self.delete.status(),
        ]
        .contains(&RequestStatus::Pending)
    }

    fn transition(&mut self, from: DetailPhase, to: DetailPhase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = to;
        true
    }
}

#[cfg(test)]
#[path = "../tests/detail_tests.rs"]
mod tests;
