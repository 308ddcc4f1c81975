use super::codec::{Fields, RecordCodec};
use super::store::{id_after, LoadReport, Record, RecordStore};
use crate::libs::error::{CodecError, StoreError};
use crate::libs::product::Product;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const PRODUCTS_FILE_NAME: &str = "products.csv";

impl RecordCodec for Product {
    const HEADER: &'static [&'static str] = &["ID", "Name", "Description", "Category", "Price", "Quantity", "MinStock"];
    const MIN_FIELDS: usize = 7;

    fn encode(&self) -> Result<Vec<String>, CodecError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CodecError::Unencodable {
                field: "price",
                reason: format!("{} is not a non-negative amount", self.price),
            });
        }
        Ok(vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.category.clone(),
            self.price.to_string(),
            self.quantity.to_string(),
            self.min_stock.to_string(),
        ])
    }

    fn decode(fields: &Fields<'_>) -> Result<Self, CodecError> {
        let price: f64 = fields.parse(4, "price")?;
        if !price.is_finite() || price < 0.0 {
            return Err(CodecError::invalid("price", fields.text(4), "must be a non-negative amount"));
        }
        Ok(Product {
            id: fields.parse(0, "id")?,
            name: fields.string(1),
            description: fields.string(2),
            category: fields.string(3),
            price,
            quantity: fields.parse(5, "quantity")?,
            min_stock: fields.parse(6, "minimum stock")?,
        })
    }
}

impl Record for Product {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

/// Inventory collection keyed by product id.
pub struct ProductStore {
    store: RecordStore<Product>,
    /// `None` once an id of `u32::MAX` has been used.
    next_id: Option<u32>,
}

impl ProductStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (store, _) = RecordStore::open(path);
        let mut products = ProductStore { store, next_id: Some(1) };
        products.sync_next_id();
        products
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn reload(&mut self) -> LoadReport {
        let report = self.store.load();
        self.sync_next_id();
        report
    }

    /// Reserves the next product id. Ids are never handed out twice by the
    /// same store, even if the product holding one is deleted.
    pub fn next_id(&mut self) -> Result<u32, StoreError> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    pub fn all(&self) -> Vec<Product> {
        self.store.all()
    }

    pub fn get(&self, id: u32) -> Option<Product> {
        self.store.get(&id)
    }

    pub fn add(&mut self, product: Product) -> Result<(), StoreError> {
        let id = product.id;
        self.store.add(product)?;
        self.next_id = id_after(self.next_id, id);
        Ok(())
    }

    pub fn update(&mut self, product: Product) -> Result<(), StoreError> {
        self.store.update(product)
    }

    pub fn delete(&mut self, id: u32) -> Result<Product, StoreError> {
        self.store.delete(&id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn low_stock(&self) -> Vec<Product> {
        self.store.iter().filter(|p| p.is_low_stock()).cloned().collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.store.iter().filter(|p| p.category.eq_ignore_ascii_case(category)).cloned().collect()
    }

    /// Distinct categories in alphabetical order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.store.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Total stock value (price × quantity) per category.
    pub fn value_by_category(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for product in self.store.iter() {
            *totals.entry(product.category.clone()).or_insert(0.0) += product.stock_value();
        }
        totals
    }

    pub fn total_value(&self) -> f64 {
        self.store.iter().map(Product::stock_value).sum()
    }

    fn sync_next_id(&mut self) {
        self.next_id = self.store.iter().fold(self.next_id, |next, p| id_after(next, p.id));
    }
}
