pub mod media;
pub mod video;

pub use media::{AssetClass, MediaType, Orientation};
pub use video::VideoRecord;
