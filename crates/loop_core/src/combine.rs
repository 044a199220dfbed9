//! Composes per-field updaters into one updater over a composite model.

use std::marker::PhantomData;

use crate::{next, CombineError, Next, Updater};

/// Starts an empty field mapping. Fields run in the order they are added.
pub fn combine_updaters<M, Ev, Ef>() -> CombineBuilder<M, Ev, Ef> {
    CombineBuilder {
        fields: Vec::new(),
        duplicate: None,
    }
}

pub struct CombineBuilder<M, Ev, Ef> {
    fields: Vec<Box<dyn FieldUpdater<M, Ev, Ef>>>,
    duplicate: Option<String>,
}

impl<M, Ev, Ef> CombineBuilder<M, Ev, Ef> {
    /// Maps `key` to `updater`, which sees the field through `get` and whose
    /// new value is written back with `set`.
    pub fn field<F, G, S, U>(mut self, key: impl Into<String>, get: G, set: S, updater: U) -> Self
    where
        F: 'static,
        G: Fn(&M) -> &F + Send + Sync + 'static,
        S: Fn(&mut M, F) + Send + Sync + 'static,
        U: Updater<F, Ev, Ef> + 'static,
    {
        let key = key.into();
        if self.duplicate.is_none() && self.fields.iter().any(|field| field.key() == key) {
            self.duplicate = Some(key.clone());
        }
        self.fields.push(Box::new(Field {
            key,
            get,
            set,
            updater,
            _field: PhantomData,
        }));
        self
    }

    pub fn build(self) -> Result<CombinedUpdater<M, Ev, Ef>, CombineError> {
        match self.duplicate {
            Some(key) => Err(CombineError::DuplicateKey(key)),
            None => Ok(CombinedUpdater {
                fields: self.fields,
            }),
        }
    }
}

/// Updater over a composite model built by [`combine_updaters`].
///
/// Always produces a model (a copy of the input with changed fields written
/// in); effects are concatenated in field order. Usable as a field updater
/// of another combination.
pub struct CombinedUpdater<M, Ev, Ef> {
    fields: Vec<Box<dyn FieldUpdater<M, Ev, Ef>>>,
}

impl<M, Ev, Ef> CombinedUpdater<M, Ev, Ef> {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key())
    }
}

impl<M, Ev, Ef> Updater<M, Ev, Ef> for CombinedUpdater<M, Ev, Ef>
where
    M: Clone,
{
    fn update(&self, model: &M, event: &Ev) -> Next<M, Ef> {
        let mut updated = model.clone();
        let mut effects = Vec::new();
        for field in &self.fields {
            field.apply(model, &mut updated, event, &mut effects);
        }
        next(updated, effects)
    }
}

trait FieldUpdater<M, Ev, Ef>: Send + Sync {
    fn key(&self) -> &str;

    /// Runs the sub-updater on `original`'s field and writes any new value into `target`.
    fn apply(&self, original: &M, target: &mut M, event: &Ev, effects: &mut Vec<Ef>);
}

struct Field<F, G, S, U> {
    key: String,
    get: G,
    set: S,
    updater: U,
    _field: PhantomData<fn() -> F>,
}

impl<M, Ev, Ef, F, G, S, U> FieldUpdater<M, Ev, Ef> for Field<F, G, S, U>
where
    G: Fn(&M) -> &F + Send + Sync,
    S: Fn(&mut M, F) + Send + Sync,
    U: Updater<F, Ev, Ef>,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn apply(&self, original: &M, target: &mut M, event: &Ev, effects: &mut Vec<Ef>) {
        let (model, sub_effects) = self.updater.update((self.get)(original), event).into_parts();
        if let Some(value) = model {
            (self.set)(target, value);
        }
        effects.extend(sub_effects);
    }
}
