//! Cart inspection over a dumped key-value storage file.
//!
//! The file is a flat JSON object of string keys to string values, the same
//! shape as a browser's local storage. The same `CartStore` the storefront
//! uses runs against it.

use std::path::{Path, PathBuf};

use garden_records_core::{
    AddOutcome, CandidateError, CartCandidate, CartStore, KeyValueStore, MemoryStorage, ProductId,
    QuantityChange, format_amount,
};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Failed to access storage file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Storage file {0} is not a JSON object of strings: {1}")]
    Format(PathBuf, #[source] serde_json::Error),

    #[error("Rejected: {0}")]
    Rejected(#[from] CandidateError),

    #[error("Product id must be a positive integer (got {0})")]
    InvalidId(i64),
}

/// A cart operation to run.
#[derive(Debug)]
pub enum CartCommand {
    Show,
    Add(CartCandidate),
    Qty { id: i64, delta: i64 },
    Remove { id: i64 },
    Clear,
}

/// [`KeyValueStore`] persisted to a JSON file on [`FileStorage::save`].
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: MemoryStorage,
}

impl FileStorage {
    /// Open `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, CartCommandError> {
        let items = match std::fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => MemoryStorage::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| CartCommandError::Format(path.to_path_buf(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryStorage::new(),
            Err(e) => return Err(CartCommandError::Io(path.to_path_buf(), e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    /// Write the storage back to its file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<(), CartCommandError> {
        let json = serde_json::to_string_pretty(&self.items)
            .map_err(|e| CartCommandError::Format(self.path.clone(), e))?;
        std::fs::write(&self.path, json).map_err(|e| CartCommandError::Io(self.path.clone(), e))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.set_item(key, value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove_item(key);
    }
}

/// Run `command` against the cart stored under `key` in `path`.
///
/// # Errors
///
/// Returns an error if the storage file is unusable, the add is rejected or
/// an id is not a positive integer.
pub fn run(path: &Path, key: &str, command: CartCommand) -> Result<(), CartCommandError> {
    let mut store = CartStore::with_key(FileStorage::open(path)?, key);
    let message = apply(&mut store, command)?;
    store.backend().save()?;

    #[allow(clippy::print_stdout)]
    {
        if let Some(message) = message {
            println!("{message}");
        }
        print_cart(&store);
    }

    Ok(())
}

/// Apply one command, returning a status line for mutations.
fn apply<S: KeyValueStore>(
    store: &mut CartStore<S>,
    command: CartCommand,
) -> Result<Option<String>, CartCommandError> {
    let message = match command {
        CartCommand::Show => None,
        CartCommand::Add(candidate) => {
            Some(match store.add_to_cart(&candidate)? {
                AddOutcome::Added => format!("{}: added", candidate.id),
                AddOutcome::Merged { quantity } => format!("{}: quantity {quantity}", candidate.id),
            })
        }
        CartCommand::Qty { id, delta } => {
            let id = parse_id(id)?;
            Some(match store.change_quantity(id, delta) {
                QuantityChange::Updated { quantity } => format!("{id}: quantity {quantity}"),
                QuantityChange::Removed => format!("{id}: removed"),
                QuantityChange::NotFound => format!("{id}: not in cart"),
            })
        }
        CartCommand::Remove { id } => {
            let id = parse_id(id)?;
            Some(if store.remove_from_cart(id) {
                format!("{id}: removed")
            } else {
                format!("{id}: not in cart")
            })
        }
        CartCommand::Clear => {
            store.clear_cart();
            Some("cart cleared".to_string())
        }
    };
    Ok(message)
}

fn parse_id(raw: i64) -> Result<ProductId, CartCommandError> {
    ProductId::parse_positive(raw).ok_or(CartCommandError::InvalidId(raw))
}

#[allow(clippy::print_stdout)]
fn print_cart<S: KeyValueStore>(store: &CartStore<S>) {
    let cart = store.get_cart();
    if cart.is_empty() {
        println!("Cart is empty. Total: 0.00");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:>6}  {:<32} {:<8} x{:<4} {:>10}",
            line.id,
            line.display_name(),
            line.kind,
            line.quantity,
            format_amount(line.line_total())
        );
    }
    println!(
        "{} items. Total: {}",
        cart.item_count(),
        format_amount(cart.total())
    );
}
