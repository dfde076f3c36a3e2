pub mod oembed;
pub mod utils;

pub use oembed::OEmbedTitleSource;
pub use utils::{
    VIDEO_ID_LEN, VideoId, build_embed_url, build_thumbnail_url, extract_video_id,
};
