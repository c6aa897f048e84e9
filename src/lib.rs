pub mod api;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod generation;
pub mod repository;
pub mod service;
pub mod storage;
