//! What the product list shows for a given state, independent of any
//! toolkit. Front-ends draw a [`ProductListScreen`]; they never inspect
//! [`ProductListState`] directly.

use crate::product::{Product, ProductId};
use crate::product_list::{ProductListState, DELETE_CONFIRM_MESSAGE};

pub const HEADING: &str = "My items";
pub const LOADING_LABEL: &str = "Loading products";
pub const NO_PRODUCT_LABEL: &str = "No product found";
pub const CREATE_LABEL: &str = "Create a new product.";
pub const BULK_DELETE_LABEL: &str = "Delete Products";
pub const CREATE_ROUTE: &str = "/dashboard/products/create";

pub fn edit_route(id: &ProductId) -> String {
    format!("/dashboard/products/edit/{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: ProductId,
    pub image_url: Option<String>,
    pub title: String,
    pub price_label: String,
    pub quantity_label: String,
    pub edit_route: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            image_url: product.cover_image_url().map(str::to_string),
            title: product.title.clone(),
            price_label: format!("Rs:{}", product.price),
            quantity_label: format!("Quantity :{}", product.quantity),
            edit_route: edit_route(&product.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductListBody {
    Cards(Vec<ProductCard>),
    NoProductFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub product_id: ProductId,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductListScreen {
    /// Nothing but the loading indicator.
    Loading,
    Ready {
        heading: &'static str,
        /// Shown next to the heading; it has no action attached.
        bulk_delete_label: &'static str,
        create_label: &'static str,
        create_route: &'static str,
        body: ProductListBody,
        confirm: Option<ConfirmPrompt>,
    },
}

pub fn render_product_list(state: &ProductListState) -> ProductListScreen {
    if state.is_loading {
        return ProductListScreen::Loading;
    }

    let body = if state.filtered.is_empty() {
        ProductListBody::NoProductFound
    } else {
        ProductListBody::Cards(state.filtered.iter().map(ProductCard::from).collect())
    };

    ProductListScreen::Ready {
        heading: HEADING,
        bulk_delete_label: BULK_DELETE_LABEL,
        create_label: CREATE_LABEL,
        create_route: CREATE_ROUTE,
        body,
        confirm: state.pending_delete.clone().map(|product_id| ConfirmPrompt {
            product_id,
            message: DELETE_CONFIRM_MESSAGE,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Async;

    fn loaded(products: Vec<Product>) -> ProductListState {
        ProductListState::default()
            .on_fetch(1, Async::Loading(None))
            .on_fetch(1, Async::success(Some(products)))
    }

    #[test]
    fn loading_shows_only_the_indicator() {
        let state = ProductListState::default().on_fetch(1, Async::Loading(None));
        assert_eq!(render_product_list(&state), ProductListScreen::Loading);
    }

    #[test]
    fn empty_snapshot_shows_placeholder_and_create_entry() {
        match render_product_list(&loaded(vec![])) {
            ProductListScreen::Ready {
                body,
                create_route,
                create_label,
                ..
            } => {
                assert_eq!(body, ProductListBody::NoProductFound);
                assert_eq!(create_route, CREATE_ROUTE);
                assert_eq!(create_label, CREATE_LABEL);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn cards_follow_filtered_view() {
        let state = loaded(vec![
            Product::new("a1", "Red Shoe", 1499.0, 3).with_image("https://cdn/shoe.png"),
            Product::new("b2", "Blue Hat", 250.5, 0),
        ])
        .set_search("hat".into());

        let ProductListScreen::Ready { body, confirm, .. } = render_product_list(&state) else {
            panic!("expected ready screen");
        };
        assert_eq!(confirm, None);
        assert_eq!(
            body,
            ProductListBody::Cards(vec![ProductCard {
                id: ProductId::new("b2"),
                image_url: None,
                title: "Blue Hat".into(),
                price_label: "Rs:250.5".into(),
                quantity_label: "Quantity :0".into(),
                edit_route: "/dashboard/products/edit/b2".into(),
            }])
        );
    }

    #[test]
    fn card_uses_first_image_only() {
        let product = Product::new("a1", "Red Shoe", 1499.0, 3)
            .with_image("https://cdn/first.png")
            .with_image("https://cdn/second.png");
        let card = ProductCard::from(&product);
        assert_eq!(card.image_url.as_deref(), Some("https://cdn/first.png"));
        assert_eq!(card.price_label, "Rs:1499");
    }

    #[test]
    fn pending_delete_shows_confirmation() {
        let state = loaded(vec![Product::new("a1", "Red Shoe", 1.0, 1)])
            .request_delete(ProductId::new("a1"));
        let ProductListScreen::Ready { confirm, .. } = render_product_list(&state) else {
            panic!("expected ready screen");
        };
        assert_eq!(
            confirm,
            Some(ConfirmPrompt {
                product_id: ProductId::new("a1"),
                message: DELETE_CONFIRM_MESSAGE,
            })
        );
    }
}
