pub mod auth;
pub mod gallery;
pub mod images;
pub mod media;
