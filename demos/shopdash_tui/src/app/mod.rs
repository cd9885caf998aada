pub mod app_model;
pub mod app_view;
