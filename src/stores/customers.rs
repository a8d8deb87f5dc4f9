//! Customer table.
//!
//! Every mutation reads the whole table, changes it in memory and writes
//! it back. There is no locking: two writers can lose each other's updates.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::csv_utils::{load_table, save_table};
use crate::dto::{Customer, CUSTOMER_COLUMNS};
use crate::error::{Error, Result};
use crate::ids::{next_numeric_id, CUSTOMER_ID_FLOOR};
use crate::password::{hash_password, verify_password};

const PHONE_DIGITS: usize = 9;

/// Registration input. The password is plaintext here and hashed before storing.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl NewCustomer {
    /// Strips surrounding whitespace, which the table reader drops on load anyway.
    fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            phone: self.phone.map(|p| p.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBy {
    Id,
    /// Case-insensitive
    LastName,
}

pub struct CustomersStore {
    path: PathBuf,
}

impl CustomersStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<Customer>> {
        Ok(load_table(&self.path)?)
    }

    fn save(&self, customers: &[Customer]) -> Result<()> {
        Ok(save_table(&self.path, &CUSTOMER_COLUMNS, customers)?)
    }

    /// Adds a customer and returns the stored record.
    /// Fails if another record already uses the email (case-insensitive).
    pub fn register(&self, new: NewCustomer, today: NaiveDate) -> Result<Customer> {
        let new = new.trimmed();
        validate_email(&new.email)?;
        let phone = new.phone.filter(|p| !p.is_empty());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }

        let mut customers = self.load()?;
        if email_taken(&customers, &new.email, None) {
            return Err(Error::DuplicateEmail(new.email));
        }

        let id = next_numeric_id(customers.iter().map(|c| c.id.as_str()), CUSTOMER_ID_FLOOR);
        let customer = Customer {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            registration_date: today,
            password_hash: hash_password(&new.password),
            phone,
        };
        customers.push(customer.clone());
        self.save(&customers)?;
        tracing::info!(id = %customer.id, "customer registered");
        Ok(customer)
    }

    /// True only when `id` exists and `password` hashes to its stored hash.
    /// A missing or unreadable table counts as "no such customer".
    pub fn authenticate(&self, id: &str, password: &str) -> bool {
        match self.load() {
            Ok(customers) => customers
                .iter()
                .any(|c| c.id == id && verify_password(password, &c.password_hash)),
            Err(err) => {
                tracing::error!(error = %err, "customer table unreadable during authentication");
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.load()?.into_iter().find(|c| c.id == id))
    }

    /// Customers matching `predicate`, in table order.
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<Customer>>
    where
        F: Fn(&Customer) -> bool,
    {
        Ok(self.load()?.into_iter().filter(|c| predicate(c)).collect())
    }

    pub fn update_phone(&self, id: &str, phone: &str) -> Result<()> {
        let phone = phone.trim();
        validate_phone(phone)?;
        self.update(id, |c| c.phone = Some(phone.to_string()))
    }

    /// Changes the email, keeping emails unique across customers.
    pub fn update_email(&self, id: &str, email: &str) -> Result<()> {
        let email = email.trim();
        validate_email(email)?;
        let mut customers = self.load()?;
        if email_taken(&customers, email, Some(id)) {
            return Err(Error::DuplicateEmail(email.to_string()));
        }
        let customer = find_mut(&mut customers, id)?;
        customer.email = email.to_string();
        self.save(&customers)?;
        tracing::info!(id, "customer email updated");
        Ok(())
    }

    /// Stores the hash of the new plaintext password.
    pub fn update_password(&self, id: &str, password: &str) -> Result<()> {
        let password_hash = hash_password(password);
        self.update(id, |c| c.password_hash = password_hash)
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut Customer)) -> Result<()> {
        let mut customers = self.load()?;
        apply(find_mut(&mut customers, id)?);
        self.save(&customers)?;
        tracing::info!(id, "customer updated");
        Ok(())
    }

    /// Removes every matching customer and returns how many were removed.
    /// Ledger files are left in place.
    pub fn delete(&self, key: &str, by: DeleteBy) -> Result<usize> {
        let key = key.trim();
        let customers = self.load()?;
        let before = customers.len();
        let kept: Vec<Customer> = customers
            .into_iter()
            .filter(|c| match by {
                DeleteBy::Id => c.id != key,
                DeleteBy::LastName => c.last_name.to_lowercase() != key.to_lowercase(),
            })
            .collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Err(Error::NotFound(key.to_string()));
        }
        self.save(&kept)?;
        tracing::info!(key, ?by, removed, "customers deleted");
        Ok(removed)
    }
}

fn find_mut<'a>(customers: &'a mut [Customer], id: &str) -> Result<&'a mut Customer> {
    customers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| Error::NotFound(id.to_string()))
}

fn email_taken(customers: &[Customer], email: &str, except_id: Option<&str>) -> bool {
    let email = email.to_lowercase();
    customers
        .iter()
        .filter(|c| Some(c.id.as_str()) != except_id)
        .any(|c| c.email.to_lowercase() == email)
}

/// Basic shape check: must contain `@` and `.`.
pub fn validate_email(email: &str) -> Result<()> {
    if !email.contains('@') || !email.contains('.') {
        return Err(Error::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Exactly nine ASCII digits.
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPhone(phone.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (CustomersStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = CustomersStore::new(dir.path().join("customers.csv"));
        (store, dir)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let (store, _dir) = store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.get("1000").unwrap().is_none());
        assert!(!store.authenticate("1000", "anything"));
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let (store, _dir) = store();
        let ids: Vec<String> = (0..4)
            .map(|i| {
                store
                    .register(new_customer(&format!("user{i}@example.com")), today())
                    .unwrap()
                    .id
            })
            .collect();
        assert_eq!(ids, ["1000", "1001", "1002", "1003"]);
    }

    #[test]
    fn test_register_stores_hash_not_plaintext() {
        let (store, _dir) = store();
        let id = store.register(new_customer("jan@example.com"), today()).unwrap().id;

        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.password_hash, hash_password("hunter2"));
        assert_ne!(stored.password_hash, "hunter2");
        assert_eq!(stored.registration_date, today());
        assert_eq!(stored.phone, None);
    }

    #[test]
    fn test_duplicate_email_is_case_insensitive() {
        let (store, _dir) = store();
        store.register(new_customer("Jan@Example.com"), today()).unwrap();
        let result = store.register(new_customer("jan@example.COM"), today());
        assert!(matches!(result, Err(Error::DuplicateEmail(_))));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_surrounding_whitespace_does_not_bypass_email_uniqueness() {
        let (store, _dir) = store();
        store.register(new_customer("jan@example.com"), today()).unwrap();

        let result = store.register(new_customer(" JAN@example.com "), today());
        assert!(matches!(result, Err(Error::DuplicateEmail(_))));

        let emails: Vec<_> = store.load().unwrap().into_iter().map(|c| c.email).collect();
        assert_eq!(emails, ["jan@example.com"]);
    }

    #[test]
    fn test_register_stores_trimmed_fields() {
        let (store, _dir) = store();
        let mut padded = new_customer("  anna@example.com\t");
        padded.last_name = " Nowak ".to_string();
        padded.phone = Some(" 600700800 ".to_string());
        let stored = store.register(padded, today()).unwrap();

        assert_eq!(store.load().unwrap(), vec![stored.clone()]);
        assert_eq!(stored.email, "anna@example.com");
        assert_eq!(stored.phone.as_deref(), Some("600700800"));
        assert_eq!(store.delete(" Nowak ", DeleteBy::LastName).unwrap(), 1);
    }

    #[test]
    fn test_register_validates_shape() {
        let (store, _dir) = store();
        assert!(matches!(
            store.register(new_customer("not-an-email"), today()),
            Err(Error::InvalidEmail(_))
        ));

        let mut with_phone = new_customer("jan@example.com");
        with_phone.phone = Some("12345".to_string());
        assert!(matches!(
            store.register(with_phone, today()),
            Err(Error::InvalidPhone(_))
        ));

        let mut empty_phone = new_customer("jan@example.com");
        empty_phone.phone = Some(String::new());
        let customer = store.register(empty_phone, today()).unwrap();
        assert_eq!(customer.phone, None);
    }

    #[test]
    fn test_authenticate() {
        let (store, _dir) = store();
        let id = store.register(new_customer("jan@example.com"), today()).unwrap().id;

        assert!(store.authenticate(&id, "hunter2"));
        assert!(!store.authenticate(&id, "hunter3"));
        assert!(!store.authenticate("9999", "hunter2"));
    }

    #[test]
    fn test_update_phone() {
        let (store, _dir) = store();
        let id = store.register(new_customer("jan@example.com"), today()).unwrap().id;

        store.update_phone(&id, "600700800").unwrap();
        assert_eq!(
            store.get(&id).unwrap().unwrap().phone.as_deref(),
            Some("600700800")
        );
        assert!(matches!(
            store.update_phone(&id, "60070080a"),
            Err(Error::InvalidPhone(_))
        ));
        assert!(matches!(
            store.update_phone("4242", "600700800"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_email_keeps_uniqueness() {
        let (store, _dir) = store();
        let jan = store.register(new_customer("jan@example.com"), today()).unwrap().id;
        store.register(new_customer("anna@example.com"), today()).unwrap();

        assert!(matches!(
            store.update_email(&jan, "ANNA@example.com"),
            Err(Error::DuplicateEmail(_))
        ));
        // Changing only the case of one's own email is allowed.
        store.update_email(&jan, "JAN@example.com").unwrap();
        assert_eq!(store.get(&jan).unwrap().unwrap().email, "JAN@example.com");
    }

    #[test]
    fn test_update_password() {
        let (store, _dir) = store();
        let id = store.register(new_customer("jan@example.com"), today()).unwrap().id;

        store.update_password(&id, "correct horse").unwrap();
        assert!(store.authenticate(&id, "correct horse"));
        assert!(!store.authenticate(&id, "hunter2"));
    }

    #[test]
    fn test_delete_by_id_and_last_name() {
        let (store, _dir) = store();
        let jan = store.register(new_customer("jan@example.com"), today()).unwrap().id;
        let mut anna = new_customer("anna@example.com");
        anna.last_name = "Nowak".to_string();
        store.register(anna, today()).unwrap();

        assert_eq!(store.delete(&jan, DeleteBy::Id).unwrap(), 1);
        assert!(matches!(
            store.delete(&jan, DeleteBy::Id),
            Err(Error::NotFound(_))
        ));
        assert_eq!(store.delete("NOWAK", DeleteBy::LastName).unwrap(), 1);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_ids_continue_after_delete_of_max() {
        let (store, _dir) = store();
        store.register(new_customer("a@example.com"), today()).unwrap();
        let second = store.register(new_customer("b@example.com"), today()).unwrap().id;
        store.delete(&second, DeleteBy::Id).unwrap();

        // The allocator only sees live rows, so the freed max id is reused.
        let third = store.register(new_customer("c@example.com"), today()).unwrap().id;
        assert_eq!(third, "1001");
    }

    #[test]
    fn test_filter() {
        let (store, _dir) = store();
        store.register(new_customer("a@example.com"), today()).unwrap();
        let mut anna = new_customer("b@example.com");
        anna.last_name = "Nowak".to_string();
        store.register(anna, today()).unwrap();

        let nowaks = store.filter(|c| c.last_name == "Nowak").unwrap();
        assert_eq!(nowaks.len(), 1);
        assert_eq!(nowaks[0].email, "b@example.com");
    }
}
