//! In-memory user store shared by the handlers.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id, assigned on insert.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Contact email, possibly empty.
    pub email: String,
}

/// Thread-safe list of users.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the three sample users.
    #[must_use]
    pub fn seeded() -> Self {
        let users = [
            ("Alice", "alice@example.com"),
            ("Bob", "bob@example.com"),
            ("Charlie", "charlie@example.com"),
        ]
        .into_iter()
        .zip(1..)
        .map(|((name, email), id)| User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
        })
        .collect();

        Self {
            users: RwLock::new(users),
        }
    }

    /// All users in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<User> {
        self.users.read().clone()
    }

    /// Users whose name contains `needle`, ignoring case.
    #[must_use]
    pub fn search(&self, needle: &str) -> Vec<User> {
        let needle = needle.to_lowercase();
        self.users
            .read()
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Append a user with the next free id and return it.
    pub fn insert(&self, name: String, email: String) -> User {
        let mut users = self.users.write();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User { id, name, email };
        users.push(user.clone());
        user
    }

    /// Number of stored users.
    #[must_use]
    pub fn count(&self) -> usize {
        self.users.read().len()
    }
}
