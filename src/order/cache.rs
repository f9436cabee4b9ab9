//! Memoization of order-term construction.
//!
//! Caches are keyed on the exact invocation signature. The compute closure
//! runs without any map lock held, since it recurses into the same cache, and
//! the first value inserted for a signature is the one every caller sees.

use dashmap::DashMap;
use tracing::trace;

use crate::error::Result;
use crate::expr::Expr;
use crate::order::OrderArgs;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub expr: Expr,
    pub args: OrderArgs,
}

pub trait ConstructionCache: Send + Sync {
    fn lookup_or_insert(
        &self,
        signature: Signature,
        compute: &mut dyn FnMut() -> Result<Expr>,
    ) -> Result<Expr>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct UnboundedCache {
    table: DashMap<Signature, Expr>,
}

impl UnboundedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConstructionCache for UnboundedCache {
    fn lookup_or_insert(
        &self,
        signature: Signature,
        compute: &mut dyn FnMut() -> Result<Expr>,
    ) -> Result<Expr> {
        let cached = self.table.get(&signature).map(|hit| hit.value().clone());
        if let Some(value) = cached {
            trace!(expr = %signature.expr, "order cache hit");
            return Ok(value);
        }

        let value = compute()?;
        trace!(expr = %signature.expr, "order cache miss");
        let canonical = self.table.entry(signature).or_insert(value).value().clone();
        Ok(canonical)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn clear(&self) {
        self.table.clear();
    }
}

/// Stops inserting once `capacity` signatures are stored; lookups keep working.
#[derive(Debug)]
pub struct BoundedCache {
    table: DashMap<Signature, Expr>,
    capacity: usize,
}

impl BoundedCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: DashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl ConstructionCache for BoundedCache {
    fn lookup_or_insert(
        &self,
        signature: Signature,
        compute: &mut dyn FnMut() -> Result<Expr>,
    ) -> Result<Expr> {
        let cached = self.table.get(&signature).map(|hit| hit.value().clone());
        if let Some(value) = cached {
            trace!(expr = %signature.expr, "order cache hit");
            return Ok(value);
        }

        let value = compute()?;
        if self.table.len() >= self.capacity {
            trace!(expr = %signature.expr, capacity = self.capacity, "order cache full");
            return Ok(value);
        }
        let canonical = self.table.entry(signature).or_insert(value).value().clone();
        Ok(canonical)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn clear(&self) {
        self.table.clear();
    }
}

/// Computes every construction afresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ConstructionCache for NoCache {
    fn lookup_or_insert(
        &self,
        _signature: Signature,
        compute: &mut dyn FnMut() -> Result<Expr>,
    ) -> Result<Expr> {
        compute()
    }

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(name: &str) -> Signature {
        Signature {
            expr: Expr::var(name),
            args: OrderArgs::Auto,
        }
    }

    #[test]
    fn unbounded_cache_computes_once() {
        let cache = UnboundedCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let value = cache
                .lookup_or_insert(signature("x"), &mut || {
                    calls += 1;
                    Ok(Expr::integer(7))
                })
                .unwrap();
            assert_eq!(value, Expr::integer(7));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn bounded_cache_stops_growing() {
        let cache = BoundedCache::new(1);
        for name in ["x", "y", "z"] {
            cache
                .lookup_or_insert(signature(name), &mut || Ok(Expr::var(name)))
                .unwrap();
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = UnboundedCache::new();
        let result = cache.lookup_or_insert(signature("x"), &mut || {
            Err(crate::error::CasError::Unsupported("boom".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
