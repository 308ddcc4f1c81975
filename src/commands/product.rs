use super::open_app;
use crate::{
    libs::{messages::Message, product::Product, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    command: Option<ProductCommand>,
}

#[derive(Debug, Subcommand)]
enum ProductCommand {
    List {
        /// Only products in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },
    Add {
        name: String,
        #[arg(short, long)]
        price: f64,
        #[arg(short, long, default_value_t = 0)]
        quantity: u32,
        #[arg(short, long, default_value_t = 0)]
        min_stock: u32,
        #[arg(short, long, default_value = "")]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Explicit id; the next free id is used when omitted
        #[arg(long)]
        id: Option<u32>,
    },
    Update {
        id: u32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<f64>,
        #[arg(short, long)]
        quantity: Option<u32>,
        #[arg(short, long)]
        min_stock: Option<u32>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    Delete {
        id: u32,
    },
    LowStock,
}

pub fn cmd(args: ProductArgs) -> Result<()> {
    match args.command {
        Some(ProductCommand::List { category }) => handle_list(category),
        Some(ProductCommand::Add {
            name,
            price,
            quantity,
            min_stock,
            category,
            description,
            id,
        }) => handle_add(id, Product::new(0, &name, &description, &category, price, quantity, min_stock)),
        Some(ProductCommand::Update {
            id,
            name,
            price,
            quantity,
            min_stock,
            category,
            description,
        }) => handle_update(id, |product| {
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(quantity) = quantity {
                product.quantity = quantity;
            }
            if let Some(min_stock) = min_stock {
                product.min_stock = min_stock;
            }
            if let Some(category) = category {
                product.category = category;
            }
            if let Some(description) = description {
                product.description = description;
            }
        }),
        Some(ProductCommand::Delete { id }) => handle_delete(id),
        Some(ProductCommand::LowStock) => handle_low_stock(),
        None => handle_list(None),
    }
}

fn handle_list(category: Option<String>) -> Result<()> {
    let app = open_app()?;
    let products = match category {
        Some(category) => app.products.by_category(&category),
        None => app.products.all(),
    };

    if products.is_empty() {
        msg_info!(Message::NoProductsFound);
        return Ok(());
    }

    msg_print!(Message::ProductsHeader, true);
    View::products(&products)
}

fn handle_add(id: Option<u32>, mut product: Product) -> Result<()> {
    if !is_valid_price(product.price) {
        msg_error!(Message::ProductInvalidPrice(product.price));
        return Ok(());
    }

    let mut app = open_app()?;
    product.id = match id {
        Some(id) => id,
        None => app.products.next_id()?,
    };
    let id = product.id;
    let name = product.name.clone();

    match app.products.add(product) {
        Ok(()) => msg_success!(Message::ProductCreated(id, name)),
        Err(e) if e.is_duplicate() => msg_error!(Message::ProductAlreadyExists(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn handle_update(id: u32, edit: impl FnOnce(&mut Product)) -> Result<()> {
    let mut app = open_app()?;
    let Some(mut product) = app.products.get(id) else {
        msg_error!(Message::ProductNotFound(id));
        return Ok(());
    };

    edit(&mut product);
    if !is_valid_price(product.price) {
        msg_error!(Message::ProductInvalidPrice(product.price));
        return Ok(());
    }

    app.products.update(product)?;
    msg_success!(Message::ProductUpdated(id));
    Ok(())
}

fn handle_delete(id: u32) -> Result<()> {
    let mut app = open_app()?;
    match app.products.delete(id) {
        Ok(_) => msg_success!(Message::ProductDeleted(id)),
        Err(e) if e.is_not_found() => msg_error!(Message::ProductNotFound(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn handle_low_stock() -> Result<()> {
    let app = open_app()?;
    let products = app.products.low_stock();

    if products.is_empty() {
        msg_info!(Message::NoLowStock);
        return Ok(());
    }

    msg_print!(Message::LowStockHeader, true);
    View::products(&products)
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}
