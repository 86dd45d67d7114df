//! Checkout: collect contact details and a delivery address, then place the order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use forkful_backend::repo::{OrderRepository, ProfileRepository};
use forkful_core::order::{NewOrder, NewProfile};
use forkful_core::{Address, Cart, OrderId, OrderStatus, Phone};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use super::cart::CartView;
use crate::error::add_breadcrumb;
use crate::models::session::{keys, load_cart, remember_order, save_cart};
use crate::state::AppState;

/// Checkout form data. Also kept in the session to prefill the next visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub full_name: String,
    pub phone: Phone,
    pub address: Address,
}

impl CheckoutForm {
    /// Check required fields and normalize the phone.
    ///
    /// # Errors
    ///
    /// Returns one message per problem, in form order.
    pub fn validate(&self) -> std::result::Result<ValidCheckout, Vec<String>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push("Please tell us your name.".to_string());
        }

        let phone = match Phone::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push(format!("Invalid phone: {e}."));
                None
            }
        };

        for (value, label) in [
            (&self.street, "Street"),
            (&self.number, "Number"),
            (&self.neighborhood, "Neighborhood"),
            (&self.city, "City"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{label} is required."));
            }
        }

        match phone {
            Some(phone) if errors.is_empty() => Ok(ValidCheckout {
                full_name: full_name.to_string(),
                phone,
                address: Address {
                    street: self.street.trim().to_string(),
                    number: self.number.trim().to_string(),
                    neighborhood: self.neighborhood.trim().to_string(),
                    city: self.city.trim().to_string(),
                    state: self.state.trim().to_string(),
                    zip: self.zip.trim().to_string(),
                },
            }),
            _ => Err(errors),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
}

/// Display the checkout form; an empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let form = session
        .get::<CheckoutForm>(keys::CUSTOMER)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    render(&state, &session, &cart, form, Vec::new())
        .await
        .into_response()
}

/// Place the order.
///
/// The customer profile is upserted by phone, the order is written as
/// `pending` with the cart snapshot, and the cart is emptied. Validation or
/// backend failures re-render the form with what was typed.
///
/// Once the order exists the visitor is always redirected to it; a failed
/// session write after that point is logged, not surfaced.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let checkout = match form.validate() {
        Ok(checkout) => checkout,
        Err(errors) => {
            return render(&state, &session, &cart, form, errors)
                .await
                .into_response();
        }
    };

    let profile = match ProfileRepository::new(state.backend())
        .upsert_by_phone(&NewProfile {
            full_name: checkout.full_name.clone(),
            phone: checkout.phone.to_string(),
        })
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "Failed to save customer profile");
            return backend_failure(&state, &session, &cart, form).await;
        }
    };

    let new_order = NewOrder {
        user_id: profile.id,
        items: cart.to_line_items(),
        address: checkout.address,
        status: OrderStatus::Pending,
        total: cart.subtotal(),
    };

    let order = match OrderRepository::new(state.backend()).place(&new_order).await {
        Ok(order) => order,
        Err(e) => {
            tracing::error!(error = %e, user_id = %profile.id, "Failed to place order");
            return backend_failure(&state, &session, &cart, form).await;
        }
    };

    tracing::info!(
        order_id = %order.id,
        user_id = %profile.id,
        total = %order.total,
        items = order.item_count(),
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", &order.id.to_string())]),
    );

    if let Err(e) = finish_checkout(&session, &mut cart, order.id, &form).await {
        tracing::error!(error = %e, order_id = %order.id, "Failed to update session after checkout");
    }

    Redirect::to(&format!("/orders/{}", order.id)).into_response()
}

/// Empty the cart, then remember the order and the form for next time.
///
/// The cart goes first so a retry after a partial failure can't place the
/// same cart twice.
async fn finish_checkout(
    session: &Session,
    cart: &mut Cart,
    order_id: OrderId,
    form: &CheckoutForm,
) -> std::result::Result<(), tower_sessions::session::Error> {
    cart.clear();
    save_cart(session, cart).await?;
    remember_order(session, order_id).await?;
    session.insert(keys::CUSTOMER, form).await
}

async fn render(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    form: CheckoutForm,
    errors: Vec<String>,
) -> CheckoutTemplate {
    CheckoutTemplate {
        layout: Layout::load(state, session).await,
        cart: CartView::new(cart, state.store()),
        form,
        errors,
    }
}

async fn backend_failure(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    form: CheckoutForm,
) -> Response {
    let errors = vec!["We couldn't place your order right now. Please try again.".to_string()];
    render(state, session, cart, form, errors)
        .await
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use forkful_core::{CartItem, ProductId};
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::session::placed_orders;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            full_name: " Ana Souza ".to_string(),
            phone: "(11) 98765-4321".to_string(),
            street: "Rua Augusta".to_string(),
            number: "1500".to_string(),
            neighborhood: "Consolação".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip: String::new(),
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let checkout = filled().validate().unwrap();
        assert_eq!(checkout.full_name, "Ana Souza");
        assert_eq!(checkout.phone.as_str(), "11987654321");
        assert_eq!(checkout.address.street, "Rua Augusta");
        assert!(checkout.address.zip.is_empty());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let form = CheckoutForm {
            phone: "abc".to_string(),
            ..CheckoutForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[0], "Please tell us your name.");
        assert!(errors[1].starts_with("Invalid phone"));
        assert_eq!(errors[5], "City is required.");
    }

    #[test]
    fn test_validate_state_and_zip_optional() {
        let form = CheckoutForm {
            state: String::new(),
            ..filled()
        };
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn test_finish_checkout_empties_cart_and_remembers_order() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut cart = Cart::default();
        cart.add(CartItem::new(
            ProductId::generate(),
            "Margherita".to_string(),
            "13.00".parse().unwrap(),
            2,
            None,
            BTreeMap::new(),
        ));
        save_cart(&session, &cart).await.unwrap();
        let order_id = OrderId::generate();

        finish_checkout(&session, &mut cart, order_id, &filled())
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert!(load_cart(&session).await.is_empty());
        assert_eq!(placed_orders(&session).await, vec![order_id]);
        let remembered: CheckoutForm = session.get(keys::CUSTOMER).await.unwrap().unwrap();
        assert_eq!(remembered.phone, "(11) 98765-4321");
    }
}
