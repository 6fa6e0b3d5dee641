#![forbid(unsafe_code)]

//! Small HTTP service returning the English captions of a YouTube video as a
//! single block of text.
//!
//! The request path is `api` → `transcript` → `video_id` + `captions`, with
//! `youtube` providing the production caption client.

pub mod api;
pub mod captions;
pub mod config;
pub mod error;
pub mod transcript;
pub mod video_id;
pub mod youtube;
