//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; prices are fixed when a line is added.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use forkful_backend::repo::CatalogRepository;
use forkful_core::pricing;
use forkful_core::{Cart, CartItem, CartItemId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use super::products::parse_item_form;
use crate::config::StoreInfo;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub options: Vec<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the view from the session cart.
    #[must_use]
    pub fn new(cart: &Cart, store: &StoreInfo) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartItemView::new(item, store))
                .collect(),
            subtotal: store.price(cart.subtotal()),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(item: &CartItem, store: &StoreInfo) -> Self {
        Self {
            id: item.id.to_string(),
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            options: item.option_labels(),
            quantity: item.quantity,
            price: store.price(item.unit_price),
            line_price: store.price(item.total_price),
            image: item.image.clone(),
        }
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart outcome fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_result.html")]
pub struct AddResultTemplate {
    pub added: bool,
    pub message: String,
}

impl AddResultTemplate {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            added: false,
            message: message.into(),
        }
    }
}

fn parse_item_id(raw: &str) -> Result<CartItemId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("invalid cart item".to_string()))
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        layout: Layout::load(&state, &session).await,
        cart: CartView::new(&cart, state.store()),
    }
}

/// Add item to cart (HTMX).
///
/// The posted selection is checked against the product's option rules and
/// priced server-side. A broken rule comes back as a message in the fragment;
/// a successful add also triggers `cart-updated` so the badge refreshes.
#[instrument(skip(state, session, pairs))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = parse_item_form(&pairs)?;
    let Some(product_id) = form.product_id else {
        return Err(AppError::BadRequest("missing product".to_string()));
    };
    if form.quantity == 0 {
        return Ok(AddResultTemplate::rejected("Choose at least one.").into_response());
    }

    let catalog = CatalogRepository::new(state.backend());
    let product = catalog.product(product_id).await?;
    if !product.available {
        return Ok(
            AddResultTemplate::rejected(format!("{} is not available right now.", product.name))
                .into_response(),
        );
    }
    let options = catalog.options(product_id).await?;

    if let Err(e) = pricing::validate_selection(&form.selection, &options) {
        return Ok(AddResultTemplate::rejected(capitalize(&e.to_string())).into_response());
    }

    let quote = pricing::quote(&form.selection, &options, product.price, form.quantity);
    let item = CartItem::new(
        product.id,
        product.name.clone(),
        quote.unit_price,
        form.quantity,
        product.image_url.clone(),
        pricing::chosen_names(&form.selection, &options),
    );

    let mut cart = load_cart(&session).await;
    cart.add(item);
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Item added",
        Some(&[("product_id", &product.id.to_string())]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        AddResultTemplate {
            added: true,
            message: format!("{} × {} added to your cart.", form.quantity, product.name),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_item_id(&form.item_id)?;
    let mut cart = load_cart(&session).await;

    if !cart.update_quantity(id, form.quantity.min(super::products::MAX_QUANTITY)) {
        tracing::debug!(item_id = %id, "Cart line already gone");
    }
    save_cart(&session, &cart).await?;

    Ok(items_fragment(&cart, state.store()))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_item_id(&form.item_id)?;
    let mut cart = load_cart(&session).await;

    if cart.remove(id) {
        save_cart(&session, &cart).await?;
    }

    Ok(items_fragment(&cart, state.store()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}

fn items_fragment(cart: &Cart, store: &StoreInfo) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::new(cart, store),
        },
    )
        .into_response()
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
