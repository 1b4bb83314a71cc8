use crate::traits::ResolveSource;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use streamv_frontend::SchemaRef;
use streamv_utils::{Error, Id, StreamvResult};

/// Schema key hashed and compared by handle identity. Holding the `Rc`
/// keeps the schema alive, so a pointer can never be reused for a
/// different schema while it is bound here.
#[derive(Debug, Clone)]
struct SchemaKey(SchemaRef);

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

/// Source bindings for backend translation.
///
/// Lookup tries schema identity first, then falls back to the schema's
/// declared name. An unbound pair is a fatal [`Error::Resolution`] — there
/// is no silent default.
#[derive(Debug, Clone)]
pub struct SourceMap<N> {
    by_schema: HashMap<(SchemaKey, Id), N>,
    by_name: HashMap<(Id, Id), N>,
}

impl<N> SourceMap<N> {
    pub fn new() -> Self {
        SourceMap {
            by_schema: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Bind a source node to a schema handle by identity.
    pub fn bind<F: Into<Id>>(&mut self, schema: &SchemaRef, field: F, node: N) {
        self.by_schema
            .insert((SchemaKey(Rc::clone(schema)), field.into()), node);
    }

    /// Bind a source node by stream name, for sources declared away from
    /// their schema handle.
    pub fn bind_name<S, F>(&mut self, stream: S, field: F, node: N)
    where
        S: Into<Id>,
        F: Into<Id>,
    {
        self.by_name.insert((stream.into(), field.into()), node);
    }

    pub fn len(&self) -> usize {
        self.by_schema.len() + self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_schema.is_empty() && self.by_name.is_empty()
    }
}

impl<N> Default for SourceMap<N> {
    fn default() -> Self {
        SourceMap::new()
    }
}

impl<N: Clone> ResolveSource for SourceMap<N> {
    type Node = N;

    fn resolve(
        &self,
        schema: &SchemaRef,
        field: &Id,
    ) -> StreamvResult<N> {
        let identity = (SchemaKey(Rc::clone(schema)), field.clone());
        if let Some(node) = self.by_schema.get(&identity) {
            return Ok(node.clone());
        }
        let named = (schema.name().clone(), field.clone());
        if let Some(node) = self.by_name.get(&named) {
            return Ok(node.clone());
        }
        Err(Error::resolution(schema.name().clone(), field.clone()))
    }
}
