pub mod product_view;
