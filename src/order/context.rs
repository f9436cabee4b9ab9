use crate::calculus::{LimitError, LimitResult, Point, limit_with_depth};
use crate::config::OrderConfig;
use crate::error::Result;
use crate::expr::Expr;
use crate::order::{ConstructionCache, OrderArgs};
use crate::simplify::expand_with_limit;

/// Owns the construction cache and the settings every order operation uses.
///
/// A context is `Sync`; one instance can be shared across threads.
pub struct OrderContext {
    pub(super) cache: Box<dyn ConstructionCache>,
    pub(super) config: OrderConfig,
}

impl OrderContext {
    pub fn new() -> Self {
        Self::with_config(OrderConfig::default())
    }

    pub fn with_config(config: OrderConfig) -> Self {
        let cache = config.build_cache();
        Self { cache, config }
    }

    pub fn with_cache(cache: Box<dyn ConstructionCache>, config: OrderConfig) -> Self {
        Self { cache, config }
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    pub fn cache(&self) -> &dyn ConstructionCache {
        self.cache.as_ref()
    }

    /// Builds an order term over the same variables and point as `args`.
    pub(super) fn rebuild(&self, expr: &Expr, args: &[(String, Point)]) -> Result<Expr> {
        self.order(expr, OrderArgs::from_pairs(args))
    }

    pub(super) fn limit(
        &self,
        expr: &Expr,
        var: &str,
        point: Point,
    ) -> std::result::Result<LimitResult, LimitError> {
        limit_with_depth(expr, var, point, self.config.limit_depth)
    }

    pub(super) fn expand(&self, expr: &Expr) -> Expr {
        expand_with_limit(expr, self.config.expand_power_limit)
    }
}

impl Default for OrderContext {
    fn default() -> Self {
        Self::new()
    }
}
