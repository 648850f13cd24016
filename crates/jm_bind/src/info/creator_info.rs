use std::borrow::Cow;

use crate::serde::HookError;
use crate::value::{Value, ValueType};

/// Builds the target value from its named arguments.
///
/// The result is usually an object of the described type, but a creator may
/// return any value, e.g. one of a fixed set of constants.
pub type CreatorFn = fn(&CreatorArgs) -> Result<Value, HookError>;

// -----------------------------------------------------------------------------
// CreatorMode

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatorMode {
    /// Exactly one named argument.
    SingleArg,
    /// Several arguments, each bound by name.
    Properties,
}

// -----------------------------------------------------------------------------
// CreatorArg

/// A named creator argument.
///
/// Arguments are required by default. An injected argument missing from the
/// input is taken from the injectable values instead.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatorArg {
    name: &'static str,
    value_type: ValueType,
    inject: Option<Option<&'static str>>,
    required: bool,
}

impl CreatorArg {
    #[inline]
    pub const fn new(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            inject: None,
            required: true,
        }
    }

    /// Injects by the argument's type name.
    #[inline]
    pub const fn inject(mut self) -> Self {
        self.inject = Some(None);
        self
    }

    /// Injects by an explicit key.
    #[inline]
    pub const fn inject_key(mut self, key: &'static str) -> Self {
        self.inject = Some(Some(key));
        self
    }

    /// A missing optional argument takes its type's default value.
    #[inline]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The injectable key, if this argument is injected.
    pub fn injection_key(&self) -> Option<Cow<'static, str>> {
        match self.inject? {
            Some(key) => Some(Cow::Borrowed(key)),
            None => Some(self.value_type.name()),
        }
    }
}

// -----------------------------------------------------------------------------
// CreatorInfo

/// A designated constructor.
#[derive(Clone)]
pub struct CreatorInfo {
    mode: CreatorMode,
    args: Box<[CreatorArg]>,
    func: CreatorFn,
}

impl CreatorInfo {
    #[inline]
    pub(crate) fn new(mode: CreatorMode, args: Vec<CreatorArg>, func: CreatorFn) -> Self {
        Self {
            mode,
            args: args.into_boxed_slice(),
            func,
        }
    }

    #[inline]
    pub const fn mode(&self) -> CreatorMode {
        self.mode
    }

    #[inline]
    pub fn args(&self) -> &[CreatorArg] {
        &self.args
    }

    #[inline]
    pub fn arg(&self, name: &str) -> Option<&CreatorArg> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// Returns `true` if an argument binds the given JSON name.
    #[inline]
    pub fn binds(&self, name: &str) -> bool {
        self.arg(name).is_some()
    }

    #[inline]
    pub fn call(&self, args: &CreatorArgs) -> Result<Value, HookError> {
        (self.func)(args)
    }
}

impl core::fmt::Debug for CreatorInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreatorInfo")
            .field("mode", &self.mode)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// CreatorArgs

/// Argument values handed to a [`CreatorFn`], in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreatorArgs {
    values: Vec<(&'static str, Value)>,
}

impl CreatorArgs {
    #[inline]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, name: &'static str, value: Value) {
        self.values.push((name, value));
    }

    /// The named argument, null when absent.
    pub fn get(&self, name: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.values
            .iter()
            .find_map(|(arg, value)| (*arg == name).then_some(value))
            .unwrap_or(NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::{CreatorArg, CreatorArgs};
    use crate::value::{Value, ValueType};

    #[test]
    fn injection_keys() {
        let by_type = CreatorArg::new("id", ValueType::Int).inject();
        let by_key = CreatorArg::new("clock", ValueType::DateTime).inject_key("now");
        assert_eq!(by_type.injection_key().as_deref(), Some("int"));
        assert_eq!(by_key.injection_key().as_deref(), Some("now"));
        assert_eq!(CreatorArg::new("name", ValueType::String).injection_key(), None);
    }

    #[test]
    fn missing_args_read_null() {
        let mut args = CreatorArgs::with_capacity(1);
        args.push("id", Value::from(1));
        assert_eq!(args.get("id"), &Value::Int(1));
        assert_eq!(args.get("name"), &Value::Null);
    }
}
