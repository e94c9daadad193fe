use serde::{Deserialize, Serialize};

/// An email address as accepted by message setters.
///
/// Callers either pass a bare address or an address paired with a display
/// name. Neither form is syntax-checked; whatever is given is propagated to
/// the provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    /// A bare address with no display name.
    Bare(String),
    /// An address with a display name.
    Named { email: String, name: String },
}

impl Address {
    /// Create an address with a display name.
    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            email: email.into(),
            name: name.into(),
        }
    }

    /// The address part.
    pub fn email(&self) -> &str {
        match self {
            Self::Bare(email) | Self::Named { email, .. } => email,
        }
    }

    /// The display name, if one was given.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Named { name, .. } => Some(name),
        }
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::Bare(email.to_owned())
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::Bare(email)
    }
}

impl<E: Into<String>, N: Into<String>> From<(E, N)> for Address {
    fn from((email, name): (E, N)) -> Self {
        Self::named(email, name)
    }
}

/// The sender of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Address> for Sender {
    fn from(address: Address) -> Self {
        match address {
            Address::Bare(email) => Self { email, name: None },
            Address::Named { email, name } => Self {
                email,
                name: Some(name),
            },
        }
    }
}

/// An ordered mapping of recipient address to display name.
///
/// Insertion order is kept. Inserting an address that is already present
/// replaces its display name in place instead of adding a second entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients(Vec<(String, String)>);

impl Recipients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a recipient. A bare address gets an empty name.
    pub fn insert(&mut self, address: impl Into<Address>) {
        let (email, name) = match address.into() {
            Address::Bare(email) => (email, String::new()),
            Address::Named { email, name } => (email, name),
        };
        match self.0.iter_mut().find(|(existing, _)| *existing == email) {
            Some(entry) => entry.1 = name,
            None => self.0.push((email, name)),
        }
    }

    /// Display name for the given address, if it is a recipient.
    pub fn get(&self, email: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == email)
            .map(|(_, name)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(email, name)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(email, name)| (email.as_str(), name.as_str()))
    }

    /// The addresses, without names, in insertion order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(email, _)| email.as_str())
    }
}

impl From<Address> for Recipients {
    fn from(address: Address) -> Self {
        let mut recipients = Self::new();
        recipients.insert(address);
        recipients
    }
}

impl From<&str> for Recipients {
    fn from(email: &str) -> Self {
        Address::from(email).into()
    }
}

impl From<String> for Recipients {
    fn from(email: String) -> Self {
        Address::from(email).into()
    }
}

impl<A: Into<Address>> FromIterator<A> for Recipients {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut recipients = Self::new();
        for address in iter {
            recipients.insert(address);
        }
        recipients
    }
}

impl<A: Into<Address>> From<Vec<A>> for Recipients {
    fn from(addresses: Vec<A>) -> Self {
        addresses.into_iter().collect()
    }
}
