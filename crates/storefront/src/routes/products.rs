//! Product detail and live price quotes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
};
use forkful_backend::repo::CatalogRepository;
use forkful_core::pricing::{self, PriceQuote, Selection};
use forkful_core::{OptionId, Product, ProductId, ProductOption, VariationId};
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use crate::config::StoreInfo;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest quantity accepted from a form in one go.
pub const MAX_QUANTITY: u32 = 99;

/// Prefix of form keys carrying a variation choice: `option:<option id>`.
const OPTION_KEY_PREFIX: &str = "option:";

// =============================================================================
// Form Parsing
// =============================================================================

/// Product form as posted by the detail page.
///
/// Checkbox groups repeat the same key, so the raw form is a list of pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub selection: Selection,
}

/// Parse `product_id`, `quantity` and `option:<id>` pairs.
///
/// Missing quantity means one; quantities above [`MAX_QUANTITY`] are capped.
/// Empty option values (an unticked radio placeholder) are skipped.
///
/// # Errors
///
/// Returns `BadRequest` for malformed ids or quantities.
pub fn parse_item_form(pairs: &[(String, String)]) -> Result<ItemForm> {
    let mut form = ItemForm {
        product_id: None,
        quantity: 1,
        selection: Selection::new(),
    };

    for (key, value) in pairs {
        let value = value.trim();
        if key == "product_id" {
            let id = value
                .parse::<ProductId>()
                .map_err(|_| AppError::BadRequest("invalid product".to_string()))?;
            form.product_id = Some(id);
        } else if key == "quantity" {
            let quantity = value
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest("invalid quantity".to_string()))?;
            form.quantity = quantity.min(MAX_QUANTITY);
        } else if let Some(option) = key.strip_prefix(OPTION_KEY_PREFIX) {
            if value.is_empty() {
                continue;
            }
            let option_id = option
                .parse::<OptionId>()
                .map_err(|_| AppError::BadRequest("invalid option".to_string()))?;
            let variation_id = value
                .parse::<VariationId>()
                .map_err(|_| AppError::BadRequest("invalid choice".to_string()))?;
            let chosen = form.selection.entry(option_id).or_default();
            if !chosen.contains(&variation_id) {
                chosen.push(variation_id);
            }
        }
    }

    Ok(form)
}

// =============================================================================
// Views
// =============================================================================

/// Variation display data.
#[derive(Clone)]
pub struct VariationView {
    pub id: String,
    pub name: String,
    /// Surcharge label such as `+ R$ 3.00`; empty for free variations.
    pub delta: String,
}

/// Option group display data.
#[derive(Clone)]
pub struct OptionView {
    pub id: String,
    pub title: String,
    pub required: bool,
    /// Render as radio buttons.
    pub single: bool,
    pub hint: String,
    pub variations: Vec<VariationView>,
}

impl OptionView {
    fn new(option: &ProductOption, store: &StoreInfo) -> Self {
        let hint = match (option.required, option.max_selections) {
            (true, Some(1)) => "Choose 1".to_string(),
            (true, Some(max)) => format!("Choose 1 to {max}"),
            (true, None) => "Choose at least 1".to_string(),
            (false, Some(max)) => format!("Optional, up to {max}"),
            (false, None) => "Optional".to_string(),
        };

        Self {
            id: option.id.to_string(),
            title: option.title.clone(),
            required: option.required,
            single: option.is_single_choice(),
            hint,
            variations: option
                .variations
                .iter()
                .map(|v| VariationView {
                    id: v.id.to_string(),
                    name: v.name.clone(),
                    delta: if v.price.is_zero() {
                        String::new()
                    } else {
                        format!("+ {}", store.price(v.price))
                    },
                })
                .collect(),
        }
    }
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category_name: String,
    pub available: bool,
}

impl ProductView {
    fn new(product: &Product, store: &StoreInfo) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: store.price(product.price),
            image_url: product.image_url.clone(),
            category_name: product.category_name.clone(),
            available: product.available,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub options: Vec<OptionView>,
    pub quote: QuoteView,
}

/// Price quote display data.
#[derive(Clone)]
pub struct QuoteView {
    pub unit_price: String,
    pub total: String,
    pub quantity: u32,
    /// Selection rule currently violated, shown as a hint.
    pub problem: Option<String>,
}

/// Price quote fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/price_quote.html")]
pub struct QuoteTemplate {
    pub quote: QuoteView,
}

impl QuoteView {
    fn new(quote: &PriceQuote, problem: Option<String>, store: &StoreInfo) -> Self {
        Self {
            unit_price: store.price(quote.unit_price),
            total: store.price(quote.total),
            quantity: quote.quantity,
            problem,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = parse_product_id(&id)?;
    let catalog = CatalogRepository::new(state.backend());
    let product = catalog.product(id).await?;
    let options = catalog.options(id).await?;

    let quote = price_selection(&product, &options, &Selection::new(), 1, state.store());

    Ok(ProductShowTemplate {
        layout: Layout::load(&state, &session).await,
        product: ProductView::new(&product, state.store()),
        options: options
            .iter()
            .map(|o| OptionView::new(o, state.store()))
            .collect(),
        quote,
    })
}

/// Price the posted selection (HTMX).
///
/// Rule violations don't fail the request; they come back as a hint next to
/// the price.
#[instrument(skip(state, pairs))]
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<QuoteTemplate> {
    let id = parse_product_id(&id)?;
    let form = parse_item_form(&pairs)?;

    let catalog = CatalogRepository::new(state.backend());
    let product = catalog.product(id).await?;
    let options = catalog.options(id).await?;

    Ok(QuoteTemplate {
        quote: price_selection(
            &product,
            &options,
            &form.selection,
            form.quantity,
            state.store(),
        ),
    })
}

fn price_selection(
    product: &Product,
    options: &[ProductOption],
    selection: &Selection,
    quantity: u32,
    store: &StoreInfo,
) -> QuoteView {
    let quote = pricing::quote(selection, options, product.price, quantity);
    let problem = pricing::validate_selection(selection, options)
        .err()
        .map(|e| e.to_string());
    QuoteView::new(&quote, problem, store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use forkful_core::{CurrencyCode, Variation};

    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn store() -> StoreInfo {
        StoreInfo {
            name: "Cantina".to_string(),
            phone: None,
            currency: CurrencyCode::BRL,
        }
    }

    fn pizza() -> (Product, Vec<ProductOption>) {
        let product = Product {
            id: ProductId::generate(),
            name: "Margherita".to_string(),
            description: String::new(),
            price: "10.00".parse().unwrap(),
            image_url: None,
            category_id: None,
            category_name: String::new(),
            available: true,
        };
        let size = ProductOption {
            id: OptionId::generate(),
            title: "Size".to_string(),
            required: true,
            max_selections: Some(1),
            variations: vec![Variation {
                id: VariationId::generate(),
                name: "Large".to_string(),
                price: "3.00".parse().unwrap(),
            }],
        };
        (product, vec![size])
    }

    #[test]
    fn test_parse_item_form_collects_repeated_options() {
        let option = OptionId::generate();
        let a = VariationId::generate();
        let b = VariationId::generate();
        let product = ProductId::generate();
        let form = parse_item_form(&pairs(&[
            ("product_id", &product.to_string()),
            ("quantity", "3"),
            (&format!("option:{option}"), &a.to_string()),
            (&format!("option:{option}"), &b.to_string()),
            (&format!("option:{option}"), &a.to_string()),
            ("csrf", "ignored"),
        ]))
        .unwrap();

        assert_eq!(form.product_id, Some(product));
        assert_eq!(form.quantity, 3);
        assert_eq!(form.selection[&option], vec![a, b]);
    }

    #[test]
    fn test_parse_item_form_defaults_and_caps() {
        let form = parse_item_form(&pairs(&[("quantity", "500")])).unwrap();
        assert_eq!(form.quantity, MAX_QUANTITY);
        assert!(form.product_id.is_none());

        let option = OptionId::generate();
        let form = parse_item_form(&pairs(&[(&format!("option:{option}"), "")])).unwrap();
        assert_eq!(form.quantity, 1);
        assert!(form.selection.is_empty());
    }

    #[test]
    fn test_parse_item_form_rejects_garbage() {
        assert!(parse_item_form(&pairs(&[("quantity", "-1")])).is_err());
        assert!(parse_item_form(&pairs(&[("product_id", "pizza")])).is_err());
        assert!(parse_item_form(&pairs(&[("option:size", "large")])).is_err());
    }

    #[test]
    fn test_price_selection_worked_example() {
        let (product, options) = pizza();
        let selection = Selection::from([(options[0].id, vec![options[0].variations[0].id])]);
        let quote = price_selection(&product, &options, &selection, 2, &store());
        assert_eq!(quote.total, "R$ 26.00");
        assert_eq!(quote.unit_price, "R$ 13.00");
        assert!(quote.problem.is_none());
    }

    #[test]
    fn test_price_selection_reports_missing_required() {
        let (product, options) = pizza();
        let quote = price_selection(&product, &options, &Selection::new(), 1, &store());
        assert_eq!(quote.total, "R$ 10.00");
        assert_eq!(
            quote.problem.as_deref(),
            Some("please choose an option for \"Size\"")
        );
    }

    #[test]
    fn test_option_hints() {
        let (_, options) = pizza();
        let view = OptionView::new(&options[0], &store());
        assert!(view.single);
        assert_eq!(view.hint, "Choose 1");
        assert_eq!(view.variations[0].delta, "+ R$ 3.00");
    }
}
