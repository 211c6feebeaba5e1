pub mod comment_service;
pub mod metadata_service;
pub mod sentiment;
pub mod statistics;
pub mod writer;
pub mod youtube_api;
