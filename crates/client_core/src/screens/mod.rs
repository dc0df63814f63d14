//! Screen orchestration: each screen owns its controllers and pagination and
//! wires them together with explicit calls.

pub mod comment_form;
pub mod detail;
pub mod form_options;
pub mod list;
pub mod sources;

pub use comment_form::CommentForm;
pub use detail::{DetailPhase, DetailScreen, DetailView, Lookup, Navigation};
pub use form_options::FormOptions;
pub use list::{ListPhase, ListScreen, ListSource, ListView};
pub use sources::{CommentSource, CommentsSection, SampleListScreen, SampleSource};
