//! Storefront facade.
//!
//! [`Shop`] is the only surface the presentation layer talks to. Every
//! operation runs inside [`logged`], which opens a tracing span named after
//! the operation and reports failures before handing them back unchanged.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::cart::{price_cart, Cart, CartLine, PricedCart};
use crate::config::StoreConfig;
use crate::dto::{Customer, Product};
use crate::error::Result;
use crate::receipt::{HistoryRow, Receipt};
use crate::stores::{CustomersStore, DeleteBy, Ledger, NewCustomer, ProductsStore, RemoveBy};

/// Runs one shop operation inside a span and logs its outcome.
fn logged<T>(operation: &'static str, op: impl FnOnce() -> Result<T>) -> Result<T> {
    let span = tracing::info_span!("shop", operation);
    let _enter = span.enter();
    tracing::debug!("started");
    match op() {
        Ok(value) => {
            tracing::debug!("finished");
            Ok(value)
        }
        Err(err) => {
            tracing::error!(error = %err, "failed");
            Err(err)
        }
    }
}

pub struct Shop {
    customers: CustomersStore,
    products: ProductsStore,
    ledger: Ledger,
}

impl Shop {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            customers: CustomersStore::new(&config.customers_path),
            products: ProductsStore::new(&config.products_path),
            ledger: Ledger::new(&config.ledger_dir),
        }
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        logged("list_products", || self.products.list())
    }

    pub fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        logged("search_products", || self.products.search(query))
    }

    pub fn next_product_id(&self) -> Result<String> {
        logged("next_product_id", || self.products.next_id())
    }

    pub fn add(&self, product: Product) -> Result<()> {
        logged("add_product", || self.products.add(product))
    }

    pub fn remove(&self, key: &str, by: RemoveBy) -> Result<usize> {
        logged("remove_product", || self.products.remove(key, by))
    }

    /// Registers a customer and opens an empty ledger for them.
    /// Returns the new customer id.
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<String> {
        let today = Local::now().date_naive();
        self.register_at(first_name, last_name, email, password, phone, today)
    }

    /// [`Shop::register`] with an explicit registration date.
    pub fn register_at(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
        today: NaiveDate,
    ) -> Result<String> {
        logged("register", || {
            let new = NewCustomer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                phone: phone.map(str::to_string),
            };
            let customer = self.customers.register(new, today)?;
            self.ledger.open_account(&customer.id)?;
            Ok(customer.id)
        })
    }

    pub fn authenticate(&self, id: &str, password: &str) -> bool {
        let span = tracing::info_span!("shop", operation = "authenticate");
        let _enter = span.enter();
        let ok = self.customers.authenticate(id, password);
        if !ok {
            tracing::warn!(id, "authentication failed");
        }
        ok
    }

    pub fn customer(&self, id: &str) -> Result<Option<Customer>> {
        logged("get_customer", || self.customers.get(id))
    }

    /// Customers matching `predicate`, in table order.
    pub fn filter_customers<F>(&self, predicate: F) -> Result<Vec<Customer>>
    where
        F: Fn(&Customer) -> bool,
    {
        logged("filter_customers", || self.customers.filter(predicate))
    }

    pub fn update_phone(&self, id: &str, phone: &str) -> Result<()> {
        logged("update_phone", || self.customers.update_phone(id, phone))
    }

    pub fn update_email(&self, id: &str, email: &str) -> Result<()> {
        logged("update_email", || self.customers.update_email(id, email))
    }

    pub fn update_password(&self, id: &str, password: &str) -> Result<()> {
        logged("update_password", || self.customers.update_password(id, password))
    }

    /// Deletes matching customers. Their ledgers are kept.
    pub fn delete_customer(&self, key: &str, by: DeleteBy) -> Result<usize> {
        logged("delete_customer", || self.customers.delete(key, by))
    }

    /// Records the cart in the customer's ledger and returns it.
    /// An empty cart is returned as-is without touching the ledger.
    pub fn purchase(&self, customer_id: &str, cart: Cart) -> Result<Cart> {
        self.purchase_at(customer_id, cart, Local::now().naive_local())
    }

    pub fn purchase_at(&self, customer_id: &str, cart: Cart, at: NaiveDateTime) -> Result<Cart> {
        logged("purchase", || self.ledger.append(customer_id, cart, at))
    }

    /// Prices cart lines against the current catalog.
    pub fn price(&self, lines: &[CartLine]) -> Result<PricedCart> {
        logged("price", || Ok(price_cart(lines, &self.products.list()?)))
    }

    pub fn receipt(&self, customer_id: &str, cart: &Cart, at: NaiveDateTime) -> Result<Receipt> {
        logged("receipt", || {
            Ok(Receipt {
                customer_id: customer_id.to_string(),
                at,
                cart: price_cart(cart.lines(), &self.products.list()?),
            })
        })
    }

    /// Purchase history priced against the current catalog.
    pub fn history(&self, customer_id: &str) -> Result<Vec<HistoryRow>> {
        logged("history", || {
            let entries = self.ledger.history(customer_id)?;
            if entries.is_empty() {
                return Ok(Vec::new());
            }
            let catalog = self.products.list()?;
            Ok(entries
                .iter()
                .map(|entry| HistoryRow::new(entry.at, &price_cart(&entry.lines, &catalog)))
                .collect())
        })
    }
}
