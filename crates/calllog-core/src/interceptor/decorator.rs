//! Wrapper that routes calls on an inner value through the interceptor

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use super::envelope::CallInterceptor;
use crate::types::{CallArgs, CallContext, TargetType};

/// A value whose calls are logged
///
/// Records are keyed by the inner type `S`, so a decorated value logs
/// exactly like direct interception on `S` would.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use calllog_core::category::CategoryRegistry;
/// use calllog_core::interceptor::{CallInterceptor, Intercepted};
/// use calllog_core::logging::MemoryLoggerFactory;
/// use calllog_core::types::{CallArgs, Category};
///
/// struct Greeter;
///
/// impl Greeter {
///     fn greet(&self, name: &str) -> Result<String, std::fmt::Error> {
///         Ok(format!("hello {}", name))
///     }
/// }
///
/// let mut registry = CategoryRegistry::new();
/// registry.register::<Greeter>(Category::Component);
/// let records = MemoryLoggerFactory::new();
/// let interceptor = Arc::new(CallInterceptor::new(registry, Arc::new(records.clone())));
///
/// let greeter = Intercepted::new(Greeter, interceptor);
/// let out = greeter.call("greet", CallArgs::new().with("name", "ann"), |g| g.greet("ann"));
///
/// assert_eq!(out.unwrap(), "hello ann");
/// assert_eq!(records.messages()[0], "Started greet [name=ann]");
/// ```
pub struct Intercepted<S> {
    inner: S,
    interceptor: Arc<CallInterceptor>,
}

impl<S> Intercepted<S> {
    pub fn new(inner: S, interceptor: Arc<CallInterceptor>) -> Self {
        Self { inner, interceptor }
    }

    /// Destination key for this value's records
    pub fn target(&self) -> TargetType {
        TargetType::of::<S>()
    }

    fn context<'a>(&self, name: &'a str, args: CallArgs<'a>) -> CallContext<'a> {
        CallContext::new(self.target(), name).with_args(args)
    }

    /// Call a method taking `&S`
    pub fn call<T, E, F>(&self, name: &str, args: CallArgs<'_>, f: F) -> Result<T, E>
    where
        F: FnOnce(&S) -> Result<T, E>,
        T: Serialize,
        E: Error + 'static,
    {
        let call = self.context(name, args);
        self.interceptor.intercept(&call, || f(&self.inner))
    }

    /// [`call`](Self::call) for methods failing with an erased error
    pub fn call_dyn<T, E, F>(&self, name: &str, args: CallArgs<'_>, f: F) -> Result<T, E>
    where
        F: FnOnce(&S) -> Result<T, E>,
        T: Serialize,
        E: AsRef<dyn Error + Send + Sync + 'static>,
    {
        let call = self.context(name, args);
        self.interceptor.intercept_dyn(&call, || f(&self.inner))
    }

    /// Call a method taking `&mut S`
    pub fn call_mut<T, E, F>(&mut self, name: &str, args: CallArgs<'_>, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut S) -> Result<T, E>,
        T: Serialize,
        E: Error + 'static,
    {
        let call = self.context(name, args);
        let inner = &mut self.inner;
        self.interceptor.intercept(&call, || f(inner))
    }

    /// [`call_mut`](Self::call_mut) for methods failing with an erased error
    pub fn call_mut_dyn<T, E, F>(&mut self, name: &str, args: CallArgs<'_>, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut S) -> Result<T, E>,
        T: Serialize,
        E: AsRef<dyn Error + Send + Sync + 'static>,
    {
        let call = self.context(name, args);
        let inner = &mut self.inner;
        self.interceptor.intercept_dyn(&call, || f(inner))
    }

    /// Call an async method taking `&S`
    ///
    /// Dropping the returned future mid-call is logged as a cancellation.
    pub async fn call_async<'a, T, E, F, Fut>(
        &'a self,
        name: &str,
        args: CallArgs<'_>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Error + 'static,
    {
        let call = self.context(name, args);
        self.interceptor.intercept_async(&call, f(&self.inner)).await
    }

    /// [`call_async`](Self::call_async) for methods failing with an erased error
    pub async fn call_async_dyn<'a, T, E, F, Fut>(
        &'a self,
        name: &str,
        args: CallArgs<'_>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: AsRef<dyn Error + Send + Sync + 'static>,
    {
        let call = self.context(name, args);
        self.interceptor.intercept_async_dyn(&call, f(&self.inner)).await
    }

    /// Access the inner value without logging
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn interceptor(&self) -> &Arc<CallInterceptor> {
        &self.interceptor
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Intercepted<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intercepted")
            .field("inner", &self.inner)
            .field("target", &self.target().name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryRegistry, Watched};
    use crate::logging::MemoryLoggerFactory;
    use crate::types::{CategorySet, Severity};

    #[derive(Debug, Default)]
    struct CartService {
        items: Vec<String>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cart is full")]
    struct CartFull;

    impl Watched for CartService {
        const CATEGORIES: CategorySet = CategorySet::SERVICE;
    }

    impl CartService {
        fn add(&mut self, sku: &str) -> Result<usize, CartFull> {
            if self.items.len() >= 2 {
                return Err(CartFull);
            }
            self.items.push(sku.to_string());
            Ok(self.items.len())
        }

        fn size(&self) -> Result<usize, CartFull> {
            Ok(self.items.len())
        }

        fn quantity(&self, raw: &str) -> Result<usize, Box<dyn Error + Send + Sync>> {
            Ok(raw.parse::<usize>()?)
        }

        async fn checkout(&self, coupon: Option<&str>) -> Result<bool, CartFull> {
            Ok(coupon.is_some())
        }
    }

    fn decorated() -> (Intercepted<CartService>, MemoryLoggerFactory) {
        let mut registry = CategoryRegistry::new();
        registry.register_watched::<CartService>();
        let records = MemoryLoggerFactory::new();
        let interceptor = Arc::new(CallInterceptor::new(registry, Arc::new(records.clone())));
        (Intercepted::new(CartService::default(), interceptor), records)
    }

    #[test]
    fn test_call_mut_logs_and_mutates() {
        let (mut cart, records) = decorated();

        for sku in ["A", "B", "C"] {
            let _ = cart.call_mut("add", CallArgs::new().with("sku", sku), |c| c.add(sku));
        }

        assert_eq!(cart.inner().items, vec!["A", "B"]);
        let messages = records.messages();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[4], "Started add [sku=C]");
        assert_eq!(messages[5], "Failed add [sku=C] thrown [CartFull with message cart is full");
        assert_eq!(records.count(Severity::Error), 1);
        assert!(records
            .records()
            .iter()
            .all(|r| r.logger == cart.target().name()));
    }

    #[test]
    fn test_call_returns_inner_result() {
        let (cart, records) = decorated();
        assert_eq!(cart.call("size", CallArgs::new(), |c| c.size()).unwrap(), 0);
        assert!(records.messages()[1].starts_with("Finished size [] returned [0] in "));
    }

    #[tokio::test]
    async fn test_call_async() {
        let (cart, records) = decorated();
        let args = CallArgs::new().with("coupon", &Some("SPRING"));
        let out = cart
            .call_async("checkout", args, |c| c.checkout(Some("SPRING")))
            .await;

        assert!(out.unwrap());
        let messages = records.messages();
        assert_eq!(messages[0], "Started checkout [coupon=SPRING]");
        assert!(messages[1].starts_with("Finished checkout [coupon=SPRING] returned [true] in "));
    }

    #[test]
    fn test_unregistered_inner_type_is_silent() {
        let records = MemoryLoggerFactory::new();
        let interceptor = Arc::new(CallInterceptor::new(
            CategoryRegistry::new(),
            Arc::new(records.clone()),
        ));
        let cart = Intercepted::new(CartService::default(), interceptor);

        assert_eq!(cart.call("size", CallArgs::new(), |c| c.size()).unwrap(), 0);
        assert!(records.records().is_empty());
        assert_eq!(cart.into_inner().items.len(), 0);
    }

    #[test]
    fn test_call_dyn_with_boxed_error() {
        let (cart, records) = decorated();

        let ok = cart.call_dyn("quantity", CallArgs::new().with("raw", "3"), |c| c.quantity("3"));
        assert_eq!(ok.unwrap(), 3);

        let bad = cart.call_dyn("quantity", CallArgs::new().with("raw", "x"), |c| c.quantity("x"));
        assert!(bad.is_err());
        assert_eq!(
            records.messages()[3],
            "Failed quantity [raw=x] thrown [dyn Error with message invalid digit found in string"
        );
    }

    #[tokio::test]
    async fn test_call_async_dropped_mid_call() {
        let (cart, records) = decorated();
        let slow = cart.call_async("checkout", CallArgs::new(), |_| async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            Ok::<_, CartFull>(true)
        });

        let out = tokio::time::timeout(std::time::Duration::from_millis(5), slow).await;
        assert!(out.is_err());
        assert_eq!(
            records.messages(),
            vec![
                "Started checkout []",
                "Failed checkout [] thrown [CallCancelled with message call dropped before completion",
            ]
        );
    }
}
