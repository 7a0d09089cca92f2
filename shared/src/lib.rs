pub mod api;
pub mod carousel;
pub mod flow;
pub mod progress;
pub mod upload;

pub use api::{
    BatchFailure, BatchResult, BatchResults, BatchState, BatchStatus, Catalog, CatalogItem,
    TryAllRequest, TryAllResponse, TryOnRequest, TryOnResponse, UploadResponse,
};
pub use carousel::{CarouselState, DragRelease};
pub use flow::{FlowDenial, SessionFlow, Stage};
pub use progress::{BatchPhase, Milestone, MilestoneTracker};
pub use upload::{validate_photo, PhotoRejection, MAX_UPLOAD_BYTES};
