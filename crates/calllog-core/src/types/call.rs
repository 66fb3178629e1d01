//! Call context: the identity and arguments of one intercepted call

use std::borrow::Cow;
use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;

/// Identity of the type a call was made on
///
/// The name is the fully-qualified Rust type name and doubles as the key
/// used to pick a logger for the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    name: Cow<'static, str>,
}

impl TargetType {
    /// Target identity for a type known at compile time
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    /// Target identity for the type of a value
    ///
    /// The name comes from the static type of `value`. Through a trait
    /// object this is `dyn Trait`, not the concrete type behind it; use
    /// [`of`](Self::of) or [`named`](Self::named) in that case.
    pub fn of_val<T: ?Sized>(value: &T) -> Self {
        Self {
            name: Cow::Borrowed(std::any::type_name_of_val(value)),
        }
    }

    /// Target identity from a type name, e.g. one read from a config file
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    /// Fully-qualified type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type name without module path or generic arguments
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.name)
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Strip the module path and generic arguments from a type name
///
/// `alloc::vec::Vec<u8>` becomes `Vec`, `my_app::errors::BadState` becomes `BadState`.
pub fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Renders one argument when a record is written
type Render<'a> = Box<dyn Fn() -> Value + Send + Sync + 'a>;

enum ArgValue<'a> {
    Ready(Value),
    Deferred(Render<'a>),
}

impl ArgValue<'_> {
    fn render(&self) -> Value {
        match self {
            ArgValue::Ready(value) => value.clone(),
            ArgValue::Deferred(render) => render(),
        }
    }
}

/// Ordered argument values with optional parameter names
///
/// Borrowed arguments are only serialized when a record is actually
/// written, so calls on unwatched types never render them.
///
/// Names are either known for every argument or unavailable for the whole
/// call; a single positional argument drops the names of the others.
pub struct CallArgs<'a> {
    names: Option<Vec<Cow<'a, str>>>,
    values: Vec<ArgValue<'a>>,
}

impl<'a> CallArgs<'a> {
    pub fn new() -> Self {
        Self {
            names: Some(Vec::new()),
            values: Vec::new(),
        }
    }

    /// Arguments from parallel name and value lists
    ///
    /// Pass `None` for `names` when the call site does not expose them.
    pub fn from_parts(names: Option<Vec<String>>, values: Vec<Value>) -> Self {
        Self {
            names: names.map(|names| names.into_iter().map(Cow::Owned).collect()),
            values: values.into_iter().map(ArgValue::Ready).collect(),
        }
    }

    /// Builder form of [`push_named`](Self::push_named)
    pub fn with<V>(mut self, name: impl Into<Cow<'a, str>>, value: &'a V) -> Self
    where
        V: Serialize + Sync + ?Sized,
    {
        self.push_named(name, value);
        self
    }

    /// Builder form of [`push_positional`](Self::push_positional)
    pub fn with_positional<V>(mut self, value: &'a V) -> Self
    where
        V: Serialize + Sync + ?Sized,
    {
        self.push_positional(value);
        self
    }

    /// Append a named argument
    pub fn push_named<V>(&mut self, name: impl Into<Cow<'a, str>>, value: &'a V)
    where
        V: Serialize + Sync + ?Sized,
    {
        self.push(Some(name.into()), Box::new(move || to_log_value(value)));
    }

    /// Append a named argument rendered through its `Display` impl
    pub fn push_display<V>(&mut self, name: impl Into<Cow<'a, str>>, value: &'a V)
    where
        V: Display + Sync + ?Sized,
    {
        self.push(
            Some(name.into()),
            Box::new(move || Value::String(value.to_string())),
        );
    }

    /// Append an argument whose parameter name is unknown
    pub fn push_positional<V>(&mut self, value: &'a V)
    where
        V: Serialize + Sync + ?Sized,
    {
        self.push(None, Box::new(move || to_log_value(value)));
    }

    fn push(&mut self, name: Option<Cow<'a, str>>, render: Render<'a>) {
        match name {
            Some(name) => {
                if let Some(names) = self.names.as_mut() {
                    names.push(name);
                }
            }
            None => self.names = None,
        }
        self.values.push(ArgValue::Deferred(render));
    }

    /// Parameter names, if known for every argument
    pub fn names(&self) -> Option<Vec<&str>> {
        self.names
            .as_ref()
            .map(|names| names.iter().map(|name| name.as_ref()).collect())
    }

    /// Name of the argument at `index`, if known
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(|name| name.as_ref())
    }

    /// Render every argument value, in order
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.values.iter().map(ArgValue::render)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for CallArgs<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("names", &self.names)
            .field("len", &self.values.len())
            .finish()
    }
}

/// One intercepted call: target type, call name and arguments
#[derive(Debug)]
pub struct CallContext<'a> {
    target: TargetType,
    name: Cow<'a, str>,
    args: CallArgs<'a>,
}

impl<'a> CallContext<'a> {
    /// A call with no arguments
    pub fn new(target: TargetType, name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            target,
            name: name.into(),
            args: CallArgs::new(),
        }
    }

    /// A call on type `T`
    pub fn on<T: ?Sized>(name: impl Into<Cow<'a, str>>) -> Self {
        Self::new(TargetType::of::<T>(), name)
    }

    /// Add a named argument
    pub fn arg<V>(mut self, name: impl Into<Cow<'a, str>>, value: &'a V) -> Self
    where
        V: Serialize + Sync + ?Sized,
    {
        self.args.push_named(name, value);
        self
    }

    /// Add an argument rendered through its `Display` impl
    ///
    /// For values that are not `Serialize`, such as paths or addresses.
    pub fn arg_display<V>(mut self, name: impl Into<Cow<'a, str>>, value: &'a V) -> Self
    where
        V: Display + Sync + ?Sized,
    {
        self.args.push_display(name, value);
        self
    }

    /// Add an argument without a parameter name
    pub fn positional<V>(mut self, value: &'a V) -> Self
    where
        V: Serialize + Sync + ?Sized,
    {
        self.args.push_positional(value);
        self
    }

    /// Replace the argument list
    pub fn with_args(mut self, args: CallArgs<'a>) -> Self {
        self.args = args;
        self
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &CallArgs<'a> {
        &self.args
    }
}

/// Convert a value for logging; serialization failures become a marker string
pub(crate) fn to_log_value<V: Serialize + ?Sized>(value: &V) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| Value::String(format!("<unrenderable: {}>", e)))
}

/// Build a [`CallContext`] for a target type, using argument identifiers as parameter names
///
/// ```
/// use calllog_core::call_context;
///
/// struct Orders;
///
/// let id = 7;
/// let sku = "A-1";
/// let ctx = call_context!(Orders, "place", id, sku);
/// assert_eq!(ctx.args().names().unwrap(), ["id", "sku"]);
/// ```
#[macro_export]
macro_rules! call_context {
    ($target:ty, $name:expr $(, $arg:ident)* $(,)?) => {
        $crate::types::CallContext::on::<$target>($name)
            $(.arg(stringify!($arg), &$arg))*
    };
}
