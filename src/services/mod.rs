pub mod api_client;
pub mod blob_store;
pub mod dispatcher;
pub mod session;

pub use api_client::{ClientError, ImageProcessor, ImageUpload, LightFrameClient, ProcessedImage};
pub use blob_store::{Blob, BlobStore};
pub use dispatcher::{DispatchError, Dispatcher};
pub use session::{sniff_mime, Session, SessionHandle};
