//! Option/variation price aggregation.
//!
//! A product's price is its base price plus the deltas of every chosen
//! variation, times quantity:
//!
//! ```text
//! total = quantity × (base + Σ selected variation deltas)
//! ```
//!
//! Lookups are scoped to the option the variation was selected under, and
//! unknown option or variation ids are ignored rather than rejected. Use
//! [`validate_selection`] before pricing when the selection comes from a form.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::ProductOption;
use crate::types::{OptionId, VariationId};

/// Chosen variation ids, keyed by the option they were chosen under.
pub type Selection = BTreeMap<OptionId, Vec<VariationId>>;

/// Result of pricing a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Price of a single unit including variation deltas.
    pub unit_price: Decimal,
    /// `unit_price × quantity`.
    pub total: Decimal,
    pub quantity: u32,
}

/// Reasons a selection can't be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("please choose an option for \"{title}\"")]
    RequiredOptionMissing { title: String },

    #[error("choose at most {max} for \"{title}\"")]
    TooManySelections { title: String, max: u32 },
}

/// Total price for `quantity` units of a product with the given selection.
///
/// ```
/// use forkful_core::pricing::calculate_total;
/// use forkful_core::Selection;
/// use rust_decimal::Decimal;
///
/// let total = calculate_total(&Selection::new(), &[], Decimal::new(1000, 2), 3);
/// assert_eq!(total, Decimal::new(3000, 2));
/// ```
#[must_use]
pub fn calculate_total(
    selection: &Selection,
    options: &[ProductOption],
    base_price: Decimal,
    quantity: u32,
) -> Decimal {
    unit_price(selection, options, base_price) * Decimal::from(quantity)
}

/// Base price plus the deltas of every selected, known variation.
#[must_use]
pub fn unit_price(selection: &Selection, options: &[ProductOption], base_price: Decimal) -> Decimal {
    let mut price = base_price;
    for (option_id, variation_ids) in selection {
        let Some(option) = options.iter().find(|o| o.id == *option_id) else {
            continue;
        };
        for variation_id in variation_ids {
            if let Some(variation) = option.variation(*variation_id) {
                price += variation.price;
            }
        }
    }
    price
}

/// Price a selection for display.
///
/// The unit price is `total ÷ quantity`; at quantity zero it falls back to
/// the per-unit price so the UI never shows a division artefact.
#[must_use]
pub fn quote(
    selection: &Selection,
    options: &[ProductOption],
    base_price: Decimal,
    quantity: u32,
) -> PriceQuote {
    let total = calculate_total(selection, options, base_price, quantity);
    let unit_price = if quantity == 0 {
        unit_price(selection, options, base_price)
    } else {
        total / Decimal::from(quantity)
    };

    PriceQuote {
        unit_price,
        total,
        quantity,
    }
}

/// Check required options and per-option selection caps.
///
/// Only variation ids that exist under their option count toward either rule.
///
/// # Errors
///
/// Returns the first violated rule, in catalog order.
pub fn validate_selection(
    selection: &Selection,
    options: &[ProductOption],
) -> Result<(), SelectionError> {
    for option in options {
        let chosen = selection.get(&option.id).map_or(0, |ids| {
            ids.iter().filter(|id| option.variation(**id).is_some()).count()
        });

        if option.required && chosen == 0 {
            return Err(SelectionError::RequiredOptionMissing {
                title: option.title.clone(),
            });
        }

        if let Some(max) = option.max_selections
            && chosen > max as usize
        {
            return Err(SelectionError::TooManySelections {
                title: option.title.clone(),
                max,
            });
        }
    }
    Ok(())
}

/// Chosen variation names per option title, in catalog order.
///
/// Options with nothing (known) selected are left out.
#[must_use]
pub fn chosen_names(selection: &Selection, options: &[ProductOption]) -> BTreeMap<String, Vec<String>> {
    let mut names = BTreeMap::new();
    for option in options {
        let Some(ids) = selection.get(&option.id) else {
            continue;
        };
        let chosen: Vec<String> = option
            .variations
            .iter()
            .filter(|v| ids.contains(&v.id))
            .map(|v| v.name.clone())
            .collect();
        if !chosen.is_empty() {
            names.insert(option.title.clone(), chosen);
        }
    }
    names
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::Variation;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn size_option() -> ProductOption {
        ProductOption {
            id: OptionId::generate(),
            title: "Size".into(),
            required: true,
            max_selections: Some(1),
            variations: vec![
                Variation {
                    id: VariationId::generate(),
                    name: "Small".into(),
                    price: Decimal::ZERO,
                },
                Variation {
                    id: VariationId::generate(),
                    name: "Large".into(),
                    price: dec("3.00"),
                },
            ],
        }
    }

    fn extras_option() -> ProductOption {
        ProductOption {
            id: OptionId::generate(),
            title: "Extras".into(),
            required: false,
            max_selections: Some(2),
            variations: vec![
                Variation {
                    id: VariationId::generate(),
                    name: "Bacon".into(),
                    price: dec("4.50"),
                },
                Variation {
                    id: VariationId::generate(),
                    name: "Egg".into(),
                    price: dec("2.00"),
                },
                Variation {
                    id: VariationId::generate(),
                    name: "Cheese".into(),
                    price: dec("1.25"),
                },
            ],
        }
    }

    #[test]
    fn test_worked_example() {
        let size = size_option();
        let selection = Selection::from([(size.id, vec![size.variations[1].id])]);
        let quote = quote(&selection, &[size], dec("10.00"), 2);

        assert_eq!(quote.total, dec("26.00"));
        assert_eq!(quote.unit_price, dec("13.00"));
        assert_eq!(quote.quantity, 2);
    }

    #[test]
    fn test_no_selection_is_base_times_quantity() {
        let options = [size_option(), extras_option()];
        for qty in [0, 1, 4, 17] {
            assert_eq!(
                calculate_total(&Selection::new(), &options, dec("7.90"), qty),
                dec("7.90") * Decimal::from(qty)
            );
        }
    }

    #[test]
    fn test_total_is_linear_in_quantity() {
        let extras = extras_option();
        let selection = Selection::from([(
            extras.id,
            vec![extras.variations[0].id, extras.variations[2].id],
        )]);
        let options = [extras];
        let one = calculate_total(&selection, &options, dec("20.00"), 1);
        assert_eq!(one, dec("25.75"));
        for qty in 2..6 {
            assert_eq!(
                calculate_total(&selection, &options, dec("20.00"), qty),
                one * Decimal::from(qty)
            );
        }
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let size = size_option();
        let extras = extras_option();
        let selection = Selection::from([
            // Variation from another option.
            (size.id, vec![extras.variations[0].id]),
            (OptionId::generate(), vec![VariationId::generate()]),
        ]);
        assert_eq!(
            calculate_total(&selection, &[size, extras], dec("10.00"), 1),
            dec("10.00")
        );
    }

    #[test]
    fn test_quote_zero_quantity() {
        let size = size_option();
        let selection = Selection::from([(size.id, vec![size.variations[1].id])]);
        let quote = quote(&selection, &[size], dec("10.00"), 0);
        assert_eq!(quote.total, Decimal::ZERO);
        assert_eq!(quote.unit_price, dec("13.00"));
    }

    #[test]
    fn test_validate_required_missing() {
        let size = size_option();
        let err = validate_selection(&Selection::new(), &[size]).unwrap_err();
        assert_eq!(
            err,
            SelectionError::RequiredOptionMissing {
                title: "Size".into()
            }
        );
    }

    #[test]
    fn test_validate_too_many() {
        let size = size_option();
        let extras = extras_option();
        let selection = Selection::from([
            (size.id, vec![size.variations[0].id]),
            (
                extras.id,
                extras.variations.iter().map(|v| v.id).collect::<Vec<_>>(),
            ),
        ]);
        let err = validate_selection(&selection, &[size, extras]).unwrap_err();
        assert_eq!(
            err,
            SelectionError::TooManySelections {
                title: "Extras".into(),
                max: 2
            }
        );
    }

    #[test]
    fn test_validate_ok_and_chosen_names() {
        let size = size_option();
        let extras = extras_option();
        let selection = Selection::from([
            (size.id, vec![size.variations[1].id]),
            // Selection order differs from catalog order.
            (
                extras.id,
                vec![extras.variations[1].id, extras.variations[0].id],
            ),
        ]);
        let options = [size, extras];
        assert!(validate_selection(&selection, &options).is_ok());

        let names = chosen_names(&selection, &options);
        assert_eq!(names["Size"], ["Large"]);
        assert_eq!(names["Extras"], ["Bacon", "Egg"]);
    }
}
