mod common;

mod auth;
mod gallery;
