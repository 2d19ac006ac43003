//! Listing-page parsing.
//!
//! Nitter renders each media item as an anchor into its `/pic/` proxy. The
//! [`LinkExtractor`] selects those anchors, makes them absolute against the
//! configured instance, and pins them to the original-quality variant.

mod links;

pub use links::{
    LinkExtractor, MEDIA_PATH_PREFIX, ORIGINAL_QUALITY, QUALITY_PARAM, with_original_quality,
};
