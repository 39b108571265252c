use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::CatalogItem;
use super::errors::DomainError;

/// Quantity and frozen unit price for one ingredient in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub quantity: i32,
    /// Price captured when the line was created; never re-read from the catalog.
    pub unit_price: BigDecimal,
}

impl CartLine {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Session-scoped cart contents.
///
/// Each ingredient appears at most once and every stored line has a
/// positive quantity. Mutations flip a dirty flag; the owner decides when
/// to commit the cart back to its session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: BTreeMap<Uuid, CartLine>,
    #[serde(skip)]
    dirty: bool,
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `item`, or sets it when `override_quantity` is true.
    ///
    /// A new line snapshots the catalog price; an existing line keeps the
    /// price it was created with.
    pub fn add(
        &mut self,
        item: &CatalogItem,
        quantity: i32,
        override_quantity: bool,
    ) -> Result<&CartLine, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::invalid("Quantity must be a positive integer"));
        }

        let current = self.lines.get(&item.id).map_or(0, |l| l.quantity);
        let quantity = if override_quantity {
            quantity
        } else {
            current
                .checked_add(quantity)
                .ok_or_else(|| DomainError::invalid("Quantity is too large"))?
        };

        self.dirty = true;
        let line = self.lines.entry(item.id).or_insert_with(|| CartLine {
            quantity: 0,
            unit_price: item.price.clone(),
        });
        line.quantity = quantity;
        Ok(line)
    }

    /// Drops the line for `item_id`. Returns whether anything was removed.
    pub fn remove(&mut self, item_id: Uuid) -> bool {
        let removed = self.lines.remove(&item_id).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    pub fn line(&self, item_id: Uuid) -> Option<&CartLine> {
        self.lines.get(&item_id)
    }

    pub fn lines(&self) -> impl Iterator<Item = (Uuid, &CartLine)> + '_ {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    pub fn item_ids(&self) -> Vec<Uuid> {
        self.lines.keys().copied().collect()
    }

    /// Joins every line with the catalog entries in `catalog`.
    ///
    /// Lines whose ingredient is missing from `catalog` are still yielded,
    /// with `item` set to `None`.
    pub fn view<'a>(
        &'a self,
        catalog: &'a HashMap<Uuid, CatalogItem>,
    ) -> impl Iterator<Item = CartLineView<'a>> + 'a {
        self.lines.iter().map(move |(id, line)| CartLineView {
            item_id: *id,
            line,
            item: catalog.get(id),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines, not the number of lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.values().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.lines
            .values()
            .fold(BigDecimal::from(0), |acc, l| acc + l.line_total())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CartLineView<'a> {
    pub item_id: Uuid,
    pub line: &'a CartLine,
    pub item: Option<&'a CatalogItem>,
}

impl CartLineView<'_> {
    pub fn catalog_missing(&self) -> bool {
        self.item.is_none()
    }

    pub fn line_total(&self) -> BigDecimal {
        self.line.line_total()
    }
}
