//! The transactional property box.
//!
//! Writes land in a staged delta and only reach the store on [`save`]. Until
//! then reads see the staged value, and [`cancel`] throws the delta away.
//!
//! [`save`]: PropertyBox::save
//! [`cancel`]: PropertyBox::cancel

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::StateResult;
use crate::options::{Backend, StoreOptions};
use crate::store::{Props, PropsStore, SaveCallback};

/// Which properties [`PropertyBox::is_dirty`] should look at.
#[derive(Debug, Clone, PartialEq)]
pub enum DirtyQuery<'a> {
    /// Every key in the staged delta.
    Any,
    /// A single property.
    Name(&'a str),
    /// Any of the listed properties.
    Names(Vec<&'a str>),
    /// The own keys of a mapping; values are ignored.
    Keys(&'a Props),
}

impl<'a> From<&'a str> for DirtyQuery<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for DirtyQuery<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a [&'a str]> for DirtyQuery<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Self::Names(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for DirtyQuery<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Self::Names(names.to_vec())
    }
}

impl<'a> From<&'a [String]> for DirtyQuery<'a> {
    fn from(names: &'a [String]) -> Self {
        Self::Names(names.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for DirtyQuery<'a> {
    fn from(names: &'a Vec<String>) -> Self {
        Self::from(names.as_slice())
    }
}

impl<'a> From<&'a Props> for DirtyQuery<'a> {
    fn from(keys: &'a Props) -> Self {
        Self::Keys(keys)
    }
}

/// Uncommitted writes.
#[derive(Debug, Clone)]
struct Staged {
    /// Shallow copy of the committed snapshot with the writes applied.
    values: Props,
    /// Keys written since the delta was opened.
    written: HashSet<String>,
}

impl Staged {
    /// Strict comparison against the committed value.
    ///
    /// A written array or object is a new value and never equals what was
    /// committed, even when structurally identical. Everything else compares
    /// by value.
    fn differs(&self, name: &str, committed: Option<&Value>) -> bool {
        let staged = self.values.get(name);
        let written = self.written.contains(name);
        if written && matches!(staged, Some(Value::Array(_) | Value::Object(_))) {
            return true;
        }
        staged != committed
    }
}

/// Staging buffer in front of a [`PropsStore`].
pub struct PropertyBox {
    store: Box<dyn PropsStore>,
    staged: Option<Staged>,
}

impl PropertyBox {
    /// Wraps an existing store.
    pub fn new(store: Box<dyn PropsStore>) -> Self {
        Self {
            store,
            staged: None,
        }
    }

    /// Builds the store described by `backend` and wraps it.
    pub fn from_backend(backend: Backend) -> Self {
        Self::new(backend.into_store())
    }

    /// Validates `options` and wraps the resulting store.
    pub fn from_options(options: StoreOptions) -> StateResult<Self> {
        Ok(Self::from_backend(options.resolve()?))
    }

    /// Returns the committed snapshot as the store reports it.
    pub fn snapshot(&self) -> Value {
        self.store.read()
    }

    /// Returns the latest value of `name`: staged if written, committed
    /// otherwise, `None` when neither has it.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.staged.as_ref().and_then(|s| s.values.get(name)) {
            return Some(value.clone());
        }
        self.store.value(name)
    }

    /// Stages `value` for `name`. The store is not touched.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let staged = self.staged.get_or_insert_with(|| Staged {
            values: committed_props(self.store.as_ref()),
            written: HashSet::new(),
        });
        staged.values.insert(name.clone(), value);
        staged.written.insert(name);
    }

    /// Commits the staged delta to the store.
    ///
    /// The delta is cleared before the store sees it, so a failing
    /// asynchronous store cannot restore it. Without a delta this only
    /// invokes `callback`.
    pub fn save(&mut self, callback: Option<SaveCallback>) {
        match self.staged.take() {
            Some(staged) => {
                debug!("Committing {} staged props", staged.written.len());
                self.store.write(staged.values, true, callback);
            }
            None => {
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }

    /// Discards the staged delta.
    pub fn cancel(&mut self) {
        if let Some(staged) = self.staged.take() {
            debug!("Discarding {} staged props", staged.written.len());
        }
    }

    /// Discards the staged delta and writes `props` straight to the store.
    pub fn replace(&mut self, props: Props) {
        self.cancel();
        self.store.write(props, false, None);
    }

    /// Returns the staged delta itself, `None` when nothing is staged.
    pub fn delta(&self) -> Option<&Props> {
        self.staged.as_ref().map(|s| &s.values)
    }

    /// Returns true while a staged delta exists.
    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Returns true if any queried property differs between the committed
    /// snapshot and the staged delta. Always false without a delta.
    pub fn is_dirty<'a>(&self, query: impl Into<DirtyQuery<'a>>) -> bool {
        let Some(staged) = &self.staged else {
            return false;
        };

        let committed = committed_props(self.store.as_ref());
        let differs = |name: &str| staged.differs(name, committed.get(name));
        match query.into() {
            DirtyQuery::Any => staged.values.keys().any(|name| differs(name.as_str())),
            DirtyQuery::Name(name) => differs(name),
            DirtyQuery::Names(names) => names.into_iter().any(differs),
            DirtyQuery::Keys(keys) => keys.keys().any(|name| differs(name.as_str())),
        }
    }
}

impl fmt::Debug for PropertyBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBox")
            .field("staged", &self.delta())
            .finish_non_exhaustive()
    }
}

fn committed_props(store: &dyn PropsStore) -> Props {
    match store.read() {
        Value::Object(props) => props,
        _ => Props::new(),
    }
}
