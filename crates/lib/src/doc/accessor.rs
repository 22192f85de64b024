//! Typed field accessors with change listeners.
//!
//! A [`Field`] binds a key to a value type and reads/writes through
//! [`Doc::get`]/[`Doc::set`]. Interested parties register change listeners
//! on the field; they are invoked after every successful write. This keeps
//! view-binding concerns out of the document model itself.

use std::marker::PhantomData;

use super::{Doc, errors::DocError, value::Value};

/// A named, typed accessor over a document key.
///
/// ```
/// use overdoc::{Doc, Field};
///
/// let mut doc = Doc::new();
/// let mut age = Field::<i64>::new("age");
/// age.watch(|value| println!("age is now {value}"));
///
/// age.set(&mut doc, 30);
/// assert_eq!(age.get(&doc).unwrap(), 30);
/// ```
pub struct Field<T> {
    key: String,
    listeners: Vec<Box<dyn Fn(&T)>>,
    _marker: PhantomData<fn(T)>,
}

impl<T> Field<T>
where
    T: Into<Value> + Clone + for<'a> TryFrom<&'a Value, Error = DocError>,
{
    /// Creates an accessor for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            listeners: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// The key this accessor reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Registers a listener invoked after every successful write through
    /// this accessor.
    pub fn watch(&mut self, listener: impl Fn(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Reads the field from the document.
    pub fn get(&self, doc: &Doc) -> Result<T, DocError> {
        T::try_from(doc.get(&self.key)?)
    }

    /// Reads the field, falling back to a default when the key is absent
    /// or has the wrong type.
    pub fn get_or(&self, doc: &Doc, default: T) -> T {
        self.get(doc).unwrap_or(default)
    }

    /// Writes the field through [`Doc::set`] and notifies listeners.
    pub fn set(&self, doc: &mut Doc, value: T) {
        doc.set(self.key.clone(), value.clone());
        for listener in &self.listeners {
            listener(&value);
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
