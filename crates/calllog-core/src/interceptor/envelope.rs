//! The timing envelope around watched calls

use std::any::{type_name, Any};
use std::convert::Infallible;
use std::error::Error;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;

use super::format;
use super::timing::Stopwatch;
use crate::category::{CategoryMatcher, CategoryRegistry};
use crate::config::InterceptorConfig;
use crate::logging::{Logger, LoggerCache, LoggerFactory, SharedLogger};
use crate::severity::{AlwaysCritical, SeverityPolicy};
use crate::types::{simple_type_name, to_log_value, CallContext, LogRecord, TargetType};

/// Type shown in failure records for errors whose concrete type is erased
const ERASED_ERROR_TYPE: &str = "dyn Error";

/// Failure reported when a wrapped call panics
///
/// Only used for the failure record; the original panic payload is resumed
/// unchanged afterwards.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CallPanicked {
    message: String,
}

impl CallPanicked {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self { message }
    }

    /// Panic message, when the payload was a string
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure reported when an awaited call is dropped before it completes
#[derive(Debug, Clone, Copy, Default, thiserror::Error)]
#[error("call dropped before completion")]
pub struct CallCancelled;

/// How a failed outcome of type `E` shows up in a failure record
struct ErrorView<E> {
    type_name: &'static str,
    as_error: fn(&E) -> &(dyn Error + 'static),
}

impl<E: Error + 'static> ErrorView<E> {
    fn typed() -> Self {
        fn view<X: Error + 'static>(error: &X) -> &(dyn Error + 'static) {
            error
        }
        Self {
            type_name: simple_type_name(type_name::<E>()),
            as_error: view::<E>,
        }
    }
}

impl<E: AsRef<dyn Error + Send + Sync + 'static>> ErrorView<E> {
    fn erased() -> Self {
        fn view<X>(error: &X) -> &(dyn Error + 'static)
        where
            X: AsRef<dyn Error + Send + Sync + 'static>,
        {
            error.as_ref()
        }
        Self {
            type_name: ERASED_ERROR_TYPE,
            as_error: view::<E>,
        }
    }
}

/// Writes a cancellation record unless disarmed before it is dropped
struct Pending<'a, 'c> {
    interceptor: &'a CallInterceptor,
    call: &'a CallContext<'c>,
    logger: SharedLogger,
    armed: bool,
}

impl Pending<'_, '_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for Pending<'_, '_> {
    fn drop(&mut self) {
        if self.armed {
            self.interceptor.report(
                self.logger.as_ref(),
                self.call,
                simple_type_name(type_name::<CallCancelled>()),
                &CallCancelled,
            );
        }
    }
}

/// Logs entry, exit and failure of calls on watched types
///
/// Calls on types the matcher does not know run untouched. For watched
/// types every call produces one entry record and exactly one terminal
/// record (exit or failure), and its outcome is returned unchanged.
///
/// Calls returning `Box<dyn Error + Send + Sync>` or a similar erased error
/// go through the `_dyn` variants; their failure records name the type
/// `dyn Error`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use calllog_core::category::CategoryRegistry;
/// use calllog_core::interceptor::CallInterceptor;
/// use calllog_core::logging::MemoryLoggerFactory;
/// use calllog_core::types::{CallContext, Category};
///
/// struct PriceService;
///
/// let mut registry = CategoryRegistry::new();
/// registry.register::<PriceService>(Category::Service);
///
/// let records = MemoryLoggerFactory::new();
/// let interceptor = CallInterceptor::new(registry, Arc::new(records.clone()));
///
/// let call = CallContext::on::<PriceService>("quote").arg("sku", "A-1");
/// let price = interceptor.intercept(&call, || Ok::<_, std::io::Error>(12));
///
/// assert_eq!(price.unwrap(), 12);
/// assert_eq!(records.messages()[0], "Started quote [sku=A-1]");
/// ```
pub struct CallInterceptor {
    matcher: CategoryMatcher,
    loggers: LoggerCache,
    policy: Arc<dyn SeverityPolicy>,
}

impl CallInterceptor {
    /// Create an interceptor with the default (always critical) severity policy
    pub fn new(registry: CategoryRegistry, factory: Arc<dyn LoggerFactory>) -> Self {
        Self {
            matcher: CategoryMatcher::new(registry),
            loggers: LoggerCache::new(factory),
            policy: Arc::new(AlwaysCritical),
        }
    }

    /// Create an interceptor from a loaded configuration
    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self::new(config.registry(), config.logger_factory())
    }

    /// Replace the severity policy used for failures
    pub fn with_policy(mut self, policy: impl SeverityPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn matcher(&self) -> &CategoryMatcher {
        &self.matcher
    }

    pub fn is_watched(&self, target: &TargetType) -> bool {
        self.matcher.is_watched(target)
    }

    /// Logger records for `target` are written to
    pub fn logger_for(&self, target: &TargetType) -> SharedLogger {
        self.loggers.get(target.name())
    }

    /// Run `proceed` inside the envelope
    ///
    /// A panic inside `proceed` is logged as a failure and then resumed.
    pub fn intercept<T, E, F>(&self, call: &CallContext, proceed: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        T: Serialize,
        E: Error + 'static,
    {
        self.run(call, proceed, ErrorView::typed())
    }

    /// [`intercept`](Self::intercept) for calls failing with an erased error
    pub fn intercept_dyn<T, E, F>(&self, call: &CallContext, proceed: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        T: Serialize,
        E: AsRef<dyn Error + Send + Sync + 'static>,
    {
        self.run(call, proceed, ErrorView::erased())
    }

    /// Run a call that cannot fail inside the envelope
    pub fn intercept_infallible<T, F>(&self, call: &CallContext, proceed: F) -> T
    where
        F: FnOnce() -> T,
        T: Serialize,
    {
        match self.intercept(call, || Ok::<T, Infallible>(proceed())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Await `proceed` inside the envelope
    ///
    /// The entry record is written before the future is first polled and the
    /// elapsed time covers the whole await. If the returned future is dropped
    /// after that first poll, the call is reported as [`CallCancelled`].
    pub async fn intercept_async<T, E, Fut>(
        &self,
        call: &CallContext<'_>,
        proceed: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Error + 'static,
    {
        self.run_async(call, proceed, ErrorView::typed()).await
    }

    /// [`intercept_async`](Self::intercept_async) for calls failing with an erased error
    pub async fn intercept_async_dyn<T, E, Fut>(
        &self,
        call: &CallContext<'_>,
        proceed: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: AsRef<dyn Error + Send + Sync + 'static>,
    {
        self.run_async(call, proceed, ErrorView::erased()).await
    }

    /// Write the failure record for a watched call
    ///
    /// The envelope calls this itself; it is public for hosts that dispatch
    /// calls on their own and only want the failure record.
    pub fn on_failure<E: Error + 'static>(&self, call: &CallContext, error: &E) {
        self.observe(call, simple_type_name(type_name::<E>()), error);
    }

    /// [`on_failure`](Self::on_failure) for an erased error
    pub fn on_failure_dyn(&self, call: &CallContext, error: &(dyn Error + 'static)) {
        self.observe(call, ERASED_ERROR_TYPE, error);
    }

    fn observe(&self, call: &CallContext, error_type: &str, error: &(dyn Error + 'static)) {
        if !self.is_watched(call.target()) {
            return;
        }
        let logger = self.logger_for(call.target());
        self.report(logger.as_ref(), call, error_type, error);
    }

    fn run<T, E, F>(&self, call: &CallContext, proceed: F, view: ErrorView<E>) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        T: Serialize,
    {
        if !self.is_watched(call.target()) {
            return proceed();
        }

        let logger = self.enter(call);
        let watch = Stopwatch::start();
        match panic::catch_unwind(AssertUnwindSafe(proceed)) {
            Ok(outcome) => {
                self.leave(logger.as_ref(), call, &outcome, watch, &view);
                outcome
            }
            Err(payload) => {
                self.report_panic(logger.as_ref(), call, payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    async fn run_async<T, E, Fut>(
        &self,
        call: &CallContext<'_>,
        proceed: Fut,
        view: ErrorView<E>,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
    {
        if !self.is_watched(call.target()) {
            return proceed.await;
        }

        let logger = self.enter(call);
        let mut pending = Pending {
            interceptor: self,
            call,
            logger: Arc::clone(&logger),
            armed: true,
        };
        let watch = Stopwatch::start();
        let outcome = AssertUnwindSafe(proceed).catch_unwind().await;
        pending.disarm();

        match outcome {
            Ok(outcome) => {
                self.leave(logger.as_ref(), call, &outcome, watch, &view);
                outcome
            }
            Err(payload) => {
                self.report_panic(logger.as_ref(), call, payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    fn enter(&self, call: &CallContext) -> SharedLogger {
        let logger = self.logger_for(call.target());
        logger.log(&LogRecord::info(&format::entry_message(call)));
        logger
    }

    fn leave<T: Serialize, E>(
        &self,
        logger: &dyn Logger,
        call: &CallContext,
        outcome: &Result<T, E>,
        watch: Stopwatch,
        view: &ErrorView<E>,
    ) {
        let elapsed_ms = watch.elapsed_millis();
        match outcome {
            Ok(value) => {
                let message = format::exit_message(call, &to_log_value(value), elapsed_ms);
                logger.log(&LogRecord::info(&message));
            }
            Err(error) => {
                self.report(logger, call, view.type_name, (view.as_error)(error));
            }
        }
    }

    fn report_panic(&self, logger: &dyn Logger, call: &CallContext, payload: &(dyn Any + Send)) {
        let panicked = CallPanicked::from_payload(payload);
        self.report(
            logger,
            call,
            simple_type_name(type_name::<CallPanicked>()),
            &panicked,
        );
    }

    fn report(
        &self,
        logger: &dyn Logger,
        call: &CallContext,
        error_type: &str,
        error: &(dyn Error + 'static),
    ) {
        let message = format::failure_message(call, error_type, &error.to_string());
        let severity = self.policy.classify(error).severity();
        logger.log(&LogRecord::failure(severity, &message, error));
    }
}

impl std::fmt::Debug for CallInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallInterceptor")
            .field("matcher", &self.matcher)
            .field("loggers", &self.loggers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLoggerFactory;
    use crate::types::{Category, CategorySet, Criticality, Severity};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct OrderController;
    struct InventoryService;
    struct StringUtils;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct IllegalStateException(String);

    #[derive(Debug, thiserror::Error)]
    #[error("no such item")]
    struct NotFound;

    fn interceptor() -> (CallInterceptor, MemoryLoggerFactory) {
        let mut registry = CategoryRegistry::new();
        registry
            .register::<OrderController>(Category::Controller)
            .register::<InventoryService>(CategorySet::SERVICE | CategorySet::COMPONENT);
        let factory = MemoryLoggerFactory::new();
        (CallInterceptor::new(registry, Arc::new(factory.clone())), factory)
    }

    fn elapsed_of(message: &str) -> u128 {
        let rest = message.rsplit(" in ").next().unwrap();
        rest.trim_end_matches(" ms").parse().unwrap()
    }

    #[test]
    fn test_unwatched_type_passes_through() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<StringUtils>("trim").arg("s", " x ");

        let out = interceptor.intercept(&call, || Ok::<_, NotFound>("x"));
        assert_eq!(out.unwrap(), "x");

        let err = interceptor.intercept(&call, || Err::<(), _>(NotFound));
        assert!(matches!(err, Err(NotFound)));

        assert!(records.records().is_empty());
        assert_eq!(records.loggers_created(), 0);
    }

    #[test]
    fn test_success_writes_entry_and_exit() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<OrderController>("save").arg("a", &1).arg("b", "x");

        let out = interceptor.intercept(&call, || Ok::<_, NotFound>("saved".to_string()));
        assert_eq!(out.unwrap(), "saved");

        let captured = records.records();
        assert_eq!(captured.len(), 2);
        assert!(captured.iter().all(|r| r.severity == Severity::Info));
        assert!(captured.iter().all(|r| r.logger == std::any::type_name::<OrderController>()));
        assert_eq!(captured[0].message, "Started save [a=1,b=x]");
        assert!(captured[1]
            .message
            .starts_with("Finished save [a=1,b=x] returned [saved] in "));
        assert!(captured[1].message.ends_with(" ms"));
    }

    #[test]
    fn test_failure_writes_entry_and_failure() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<OrderController>("save");

        let out = interceptor.intercept(&call, || {
            Err::<(), _>(IllegalStateException("bad state".to_string()))
        });
        assert_eq!(out.unwrap_err().0, "bad state");

        let captured = records.records();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].message, "Started save []");
        assert_eq!(
            captured[1].message,
            "Failed save [] thrown [IllegalStateException with message bad state"
        );
        assert_eq!(captured[1].error.as_deref(), Some("bad state"));
    }

    #[test]
    fn test_default_policy_logs_failures_as_errors() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("reserve").arg("sku", "A-1");

        let _ = interceptor.intercept(&call, || Err::<(), _>(NotFound));
        let _ = interceptor.intercept(&call, || Err::<(), _>(std::io::Error::other("io")));

        assert_eq!(records.count(Severity::Error), 2);
        assert_eq!(records.count(Severity::Warn), 0);
    }

    #[test]
    fn test_custom_policy_logs_non_critical_as_warning() {
        let (interceptor, records) = interceptor();
        let interceptor = interceptor.with_policy(|error: &(dyn Error + 'static)| {
            if error.is::<NotFound>() {
                Criticality::NonCritical
            } else {
                Criticality::Critical
            }
        });
        let call = CallContext::on::<InventoryService>("reserve");

        let _ = interceptor.intercept(&call, || Err::<(), _>(NotFound));
        let _ = interceptor.intercept(&call, || {
            Err::<(), _>(IllegalStateException("locked".to_string()))
        });

        let captured = records.records();
        assert_eq!(captured[1].severity, Severity::Warn);
        assert_eq!(
            captured[1].message,
            "Failed reserve [] thrown [NotFound with message no such item"
        );
        assert_eq!(captured[3].severity, Severity::Error);
    }

    #[test]
    fn test_multiple_categories_wrap_once() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("count");

        let _ = interceptor.intercept(&call, || Ok::<_, NotFound>(3));
        assert_eq!(records.records().len(), 2);
    }

    #[test]
    fn test_return_value_is_passed_through() {
        let (interceptor, _records) = interceptor();
        let call = CallContext::on::<OrderController>("load");

        let data = vec![1u8, 2, 3];
        let ptr = data.as_ptr();
        let out = interceptor.intercept(&call, || Ok::<_, NotFound>(data)).unwrap();
        assert_eq!(out.as_ptr(), ptr);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_elapsed_reflects_call_duration() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<OrderController>("slow");

        interceptor.intercept_infallible(&call, || std::thread::sleep(Duration::from_millis(20)));

        let messages = records.messages();
        assert!(messages[1].starts_with("Finished slow [] returned [null] in "));
        assert!(elapsed_of(&messages[1]) >= 20);
    }

    #[test]
    fn test_panic_is_logged_and_resumed() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<OrderController>("explode").arg("n", &1);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            interceptor.intercept(&call, || -> Result<(), NotFound> { panic!("kaboom") })
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"kaboom"));

        let captured = records.records();
        assert_eq!(captured.len(), 2);
        assert_eq!(
            captured[1].message,
            "Failed explode [n=1] thrown [CallPanicked with message kaboom"
        );
        assert_eq!(captured[1].severity, Severity::Error);
    }

    #[test]
    fn test_on_failure_only_for_watched_types() {
        let (interceptor, records) = interceptor();

        interceptor.on_failure(&CallContext::on::<StringUtils>("trim"), &NotFound);
        assert!(records.records().is_empty());

        interceptor.on_failure(&CallContext::on::<OrderController>("get"), &NotFound);
        assert_eq!(
            records.messages(),
            vec!["Failed get [] thrown [NotFound with message no such item"]
        );
    }

    #[tokio::test]
    async fn test_async_success() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("fetch").arg("id", &9);

        let out = interceptor
            .intercept_async(&call, async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok::<_, NotFound>(vec!["a", "b"])
            })
            .await;
        assert_eq!(out.unwrap(), vec!["a", "b"]);

        let messages = records.messages();
        assert_eq!(messages[0], "Started fetch [id=9]");
        assert!(messages[1].starts_with("Finished fetch [id=9] returned [[\"a\",\"b\"]] in "));
        assert!(elapsed_of(&messages[1]) >= 10);
    }

    #[tokio::test]
    async fn test_async_entry_logged_before_poll() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("fetch");

        let seen = records.clone();
        let out = interceptor
            .intercept_async(&call, async move {
                assert_eq!(seen.messages(), vec!["Started fetch []"]);
                Err::<(), _>(NotFound)
            })
            .await;
        assert!(out.is_err());
        assert_eq!(records.count(Severity::Error), 1);
    }

    #[test]
    fn test_concurrent_calls_produce_complete_records() {
        let targets: Vec<TargetType> = (0..10)
            .map(|i| TargetType::named(format!("shop::Service{}", i)))
            .collect();
        let mut registry = CategoryRegistry::new();
        for target in &targets {
            registry.register_target(target, Category::Service);
        }
        let factory = MemoryLoggerFactory::new();
        let interceptor = CallInterceptor::new(registry, Arc::new(factory.clone()));

        std::thread::scope(|scope| {
            for thread in 0..50usize {
                let interceptor = &interceptor;
                let targets = &targets;
                scope.spawn(move || {
                    for i in 0..20 {
                        let n = thread * 20 + i;
                        let call = CallContext::new(targets[n % 10].clone(), "handle").arg("n", &n);
                        if n % 4 == 0 {
                            let _ = interceptor.intercept(&call, || {
                                Err::<usize, _>(IllegalStateException(format!("rejected {}", n)))
                            });
                        } else {
                            let _ = interceptor.intercept(&call, || Ok::<_, NotFound>(n));
                        }
                    }
                });
            }
        });

        let captured = factory.records();
        assert_eq!(captured.len(), 2000);
        assert_eq!(factory.loggers_created(), 10);

        let entries: HashSet<_> = captured
            .iter()
            .filter(|r| r.message.starts_with("Started "))
            .map(|r| r.message.clone())
            .collect();
        assert_eq!(entries.len(), 1000);

        let mut terminal = 0;
        for n in 0..1000usize {
            assert!(entries.contains(&format!("Started handle [n={}]", n)));
            let expected_logger = format!("shop::Service{}", n % 10);
            let finished = format!("Finished handle [n={}] returned [{}] in ", n, n);
            let failed = format!(
                "Failed handle [n={}] thrown [IllegalStateException with message rejected {}",
                n, n
            );
            let matches: Vec<_> = captured
                .iter()
                .filter(|r| r.message.starts_with(&finished) || r.message == failed)
                .collect();
            assert_eq!(matches.len(), 1, "call {}", n);
            assert_eq!(matches[0].logger, expected_logger);
            terminal += matches.len();
        }
        assert_eq!(terminal, 1000);
    }

    #[tokio::test]
    async fn test_async_dropped_call_writes_cancellation() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("slow");

        let out = tokio::time::timeout(
            Duration::from_millis(5),
            interceptor.intercept_async(&call, async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, NotFound>(1)
            }),
        )
        .await;
        assert!(out.is_err());

        let captured = records.records();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].message, "Started slow []");
        assert_eq!(
            captured[1].message,
            "Failed slow [] thrown [CallCancelled with message call dropped before completion"
        );
        assert_eq!(captured[1].severity, Severity::Error);
    }

    #[test]
    fn test_async_never_polled_writes_nothing() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("fetch");

        let fut = interceptor.intercept_async(&call, async { Ok::<_, NotFound>(1) });
        drop(fut);
        assert!(records.records().is_empty());
    }

    #[test]
    fn test_boxed_error_is_reported() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<OrderController>("load").arg("path", "orders.csv");

        let load = || -> Result<u32, Box<dyn Error + Send + Sync>> { Err("missing file".into()) };
        let out = interceptor.intercept_dyn(&call, load);
        assert_eq!(out.unwrap_err().to_string(), "missing file");

        let captured = records.records();
        assert_eq!(captured.len(), 2);
        assert_eq!(
            captured[1].message,
            "Failed load [path=orders.csv] thrown [dyn Error with message missing file"
        );
        assert_eq!(captured[1].error.as_deref(), Some("missing file"));

        let ok = interceptor.intercept_dyn(&call, || Ok::<_, Box<dyn Error + Send + Sync>>(7));
        assert_eq!(ok.unwrap(), 7);
        assert!(records.messages()[3].starts_with("Finished load [path=orders.csv] returned [7] in "));
    }

    #[test]
    fn test_policy_sees_boxed_source_type() {
        let (interceptor, records) = interceptor();
        let interceptor = interceptor.with_policy(|error: &(dyn Error + 'static)| {
            if error.is::<NotFound>() {
                Criticality::NonCritical
            } else {
                Criticality::Critical
            }
        });
        let call = CallContext::on::<InventoryService>("reserve");

        let _ = interceptor.intercept_dyn(&call, || {
            Err::<(), Box<dyn Error + Send + Sync>>(Box::new(NotFound))
        });
        assert_eq!(records.count(Severity::Warn), 1);

        interceptor.on_failure_dyn(&call, &std::io::Error::other("io"));
        assert_eq!(records.count(Severity::Error), 1);
        assert_eq!(
            records.messages()[2],
            "Failed reserve [] thrown [dyn Error with message io"
        );
    }

    #[tokio::test]
    async fn test_async_boxed_error() {
        let (interceptor, records) = interceptor();
        let call = CallContext::on::<InventoryService>("sync");

        let out = interceptor
            .intercept_async_dyn(&call, async {
                Err::<(), Box<dyn Error + Send + Sync>>("upstream timeout".into())
            })
            .await;
        assert!(out.is_err());
        assert_eq!(
            records.messages()[1],
            "Failed sync [] thrown [dyn Error with message upstream timeout"
        );
    }

    struct Counted<'a>(&'a AtomicUsize);

    impl Serialize for Counted<'_> {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            serializer.serialize_str("item")
        }
    }

    #[test]
    fn test_unwatched_calls_never_render_args() {
        let (interceptor, records) = interceptor();
        let renders = AtomicUsize::new(0);
        let item = Counted(&renders);

        for _ in 0..1000 {
            let call = CallContext::on::<StringUtils>("pad").arg("item", &item);
            let _ = interceptor.intercept(&call, || Ok::<_, NotFound>(()));
        }
        assert!(records.records().is_empty());
        assert_eq!(renders.load(Ordering::SeqCst), 0);

        let call = CallContext::on::<OrderController>("add").arg("item", &item);
        let _ = interceptor.intercept(&call, || Ok::<_, NotFound>(()));
        assert_eq!(records.messages()[0], "Started add [item=item]");
        assert_eq!(renders.load(Ordering::SeqCst), 2);
    }
}
