//! NutriEvolve Library
//!
//! Data-access core for a clinic-management application: query execution,
//! field mapping, entity services and the role-based route guard.

pub mod auth;
pub mod db;
pub mod mapper;
pub mod models;
pub mod services;
