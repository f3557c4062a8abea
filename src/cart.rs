//! Per-identity cart carried alongside the session.
//!
//! The cart is a sequence of records with `product_id` as the unique key; order follows insertion
//! so clients render it deterministically. Mutations on absent items answer [`Error::NotFound`],
//! the one taxonomy shape the auth flows never produce.

// self
use crate::{_prelude::*, auth::ProductId};

/// One cart line: a product reference and how many of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
	/// Catalog product this line refers to; unique within a cart.
	pub product_id: ProductId,
	/// Units of the product; always at least `1` while the line exists.
	pub quantity: u32,
}

/// Insertion-ordered collection of cart lines keyed by product id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItems(Vec<CartItem>);
impl CartItems {
	/// Creates an empty cart.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of lines (not units) in the cart.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when the cart holds no lines.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Looks up the line for a product, if any.
	pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
		self.0.iter().find(|item| &item.product_id == product_id)
	}

	/// Adds one unit of a product, inserting a new line or incrementing the existing one.
	///
	/// Returns the resulting quantity.
	pub fn add(&mut self, product_id: ProductId) -> u32 {
		if let Some(item) = self.0.iter_mut().find(|item| item.product_id == product_id) {
			item.quantity = item.quantity.saturating_add(1);

			item.quantity
		} else {
			self.0.push(CartItem { product_id, quantity: 1 });

			1
		}
	}

	/// Sets the quantity of an existing line; a quantity of `0` removes the line.
	///
	/// Fails with [`Error::NotFound`] when the product is not cart-resident.
	pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<()> {
		let position = self
			.0
			.iter()
			.position(|item| &item.product_id == product_id)
			.ok_or_else(|| Error::NotFound { reason: format!("{product_id} is not in the cart") })?;

		if quantity == 0 {
			self.0.remove(position);
		} else {
			self.0[position].quantity = quantity;
		}

		Ok(())
	}

	/// Removes the line for a product.
	///
	/// Fails with [`Error::NotFound`] when the product is not cart-resident.
	pub fn remove(&mut self, product_id: &ProductId) -> Result<CartItem> {
		let position = self
			.0
			.iter()
			.position(|item| &item.product_id == product_id)
			.ok_or_else(|| Error::NotFound { reason: format!("{product_id} is not in the cart") })?;

		Ok(self.0.remove(position))
	}

	/// Empties the cart.
	pub fn clear(&mut self) {
		self.0.clear();
	}

	/// Iterates the lines in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
		self.0.iter()
	}
}
impl<'a> IntoIterator for &'a CartItems {
	type IntoIter = std::slice::Iter<'a, CartItem>;
	type Item = &'a CartItem;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
