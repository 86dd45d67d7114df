//! Product listing (home page).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use forkful_backend::repo::{CatalogRepository, ProductFilter};
use forkful_core::{Category, CategoryId, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Layout;
use crate::config::StoreInfo;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category_name: String,
}

impl ProductCard {
    fn new(product: &Product, store: &StoreInfo) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: store.price(product.price),
            image_url: product.image_url.clone(),
            category_name: product.category_name.clone(),
        }
    }
}

/// Category navigation entry.
#[derive(Clone)]
pub struct CategoryLink {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryLink>,
    pub products: Vec<ProductCard>,
    pub search: String,
    pub all_active: bool,
    pub error: Option<String>,
}

/// Display the product listing.
///
/// Backend failures leave the page empty with a notice instead of erroring.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> HomeTemplate {
    let filter = filter_from_query(&query);
    let catalog = CatalogRepository::new(state.backend());

    let loaded = match catalog.categories().await {
        Ok(categories) => catalog
            .products(&filter)
            .await
            .map(|products| (categories, products)),
        Err(e) => Err(e),
    };

    let (categories, products) = match loaded {
        Ok(found) => found,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            return HomeTemplate {
                layout: Layout::load(&state, &session).await,
                categories: Vec::new(),
                products: Vec::new(),
                search: filter.search.unwrap_or_default(),
                all_active: filter.category.is_none(),
                error: Some("We couldn't load the menu. Please try again.".to_string()),
            };
        }
    };

    HomeTemplate {
        layout: Layout::load(&state, &session).await,
        categories: category_links(&categories, filter.category),
        products: products
            .iter()
            .map(|p| ProductCard::new(p, state.store()))
            .collect(),
        search: filter.search.unwrap_or_default(),
        all_active: filter.category.is_none(),
        error: None,
    }
}

/// Turn raw query params into a filter; an unparseable category means "all".
fn filter_from_query(query: &HomeQuery) -> ProductFilter {
    ProductFilter {
        category: query
            .category
            .as_deref()
            .and_then(|c| c.parse::<CategoryId>().ok()),
        search: query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_owned),
    }
}

fn category_links(categories: &[Category], active: Option<CategoryId>) -> Vec<CategoryLink> {
    categories
        .iter()
        .map(|c| CategoryLink {
            id: c.id.to_string(),
            name: c.name.clone(),
            active: Some(c.id) == active,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query() {
        let id = CategoryId::generate();
        let query = HomeQuery {
            category: Some(id.to_string()),
            q: Some("  pizza ".to_string()),
        };
        let filter = filter_from_query(&query);
        assert_eq!(filter.category, Some(id));
        assert_eq!(filter.search.as_deref(), Some("pizza"));
    }

    #[test]
    fn test_filter_ignores_garbage() {
        let query = HomeQuery {
            category: Some("drinks".to_string()),
            q: Some("   ".to_string()),
        };
        assert_eq!(filter_from_query(&query), ProductFilter::default());
    }

    #[test]
    fn test_category_links_mark_active() {
        let categories = vec![
            Category {
                id: CategoryId::generate(),
                name: "Pizzas".to_string(),
                position: 1,
            },
            Category {
                id: CategoryId::generate(),
                name: "Drinks".to_string(),
                position: 2,
            },
        ];
        let links = category_links(&categories, Some(categories[1].id));
        assert!(!links[0].active);
        assert!(links[1].active);
    }
}
