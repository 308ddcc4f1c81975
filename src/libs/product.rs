#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub min_stock: u32,
}

impl Product {
    pub fn new(id: u32, name: &str, description: &str, category: &str, price: f64, quantity: u32, min_stock: u32) -> Self {
        Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            price,
            quantity,
            min_stock,
        }
    }

    /// At or below the minimum stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
