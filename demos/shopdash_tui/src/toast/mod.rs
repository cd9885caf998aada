pub mod toast_view;
