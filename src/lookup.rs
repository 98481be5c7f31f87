//! Key/value lookup supplied by the host.
//!
//! The binder only ever looks up constructed keys; it never enumerates.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

pub trait Lookup {
    fn get(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Adapts a closure `Fn(&str) -> Option<String>` into a `Lookup`.
pub struct LookupFn<F>(pub F);

impl<F> Lookup for LookupFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        (self.0)(key).map(Cow::Owned)
    }
}

impl Lookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        HashMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Lookup for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        BTreeMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Lookup for IndexMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        IndexMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<T: Lookup + ?Sized> Lookup for &T {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).get(key)
    }
}

/// Build an ordered parameter map from `(key, value)` pairs.
pub fn params<K, V, I>(pairs: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
