//! HTTP protocol layer module
//!
//! Response builders, `ETag` handling and MIME detection shared by the
//! asset store and the request pipeline.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_502_response,
    build_asset_response, build_options_response,
};
