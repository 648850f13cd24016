use crate::info::{CreatorArg, CreatorFn, CreatorMode};

/// A designated constructor: a function of named arguments.
///
/// ```
/// use jm_bind::def::CreatorDef;
/// use jm_bind::info::{CreatorArg, CreatorArgs};
/// use jm_bind::serde::HookError;
/// use jm_bind::value::{Object, Value, ValueType};
///
/// fn create(args: &CreatorArgs) -> Result<Value, HookError> {
///     Ok(Object::new("Bean")
///         .with("id", args.get("id").clone())
///         .with("name", args.get("theName").clone())
///         .into())
/// }
///
/// let creator = CreatorDef::properties(create)
///     .arg(CreatorArg::new("id", ValueType::Int))
///     .arg(CreatorArg::new("theName", ValueType::String));
/// assert_eq!(creator.args().len(), 2);
/// ```
#[derive(Clone)]
pub struct CreatorDef {
    pub(crate) mode: CreatorMode,
    pub(crate) args: Vec<CreatorArg>,
    pub(crate) func: CreatorFn,
}

impl CreatorDef {
    /// A creator taking exactly one named argument.
    pub fn single(arg: CreatorArg, func: CreatorFn) -> Self {
        Self {
            mode: CreatorMode::SingleArg,
            args: vec![arg],
            func,
        }
    }

    /// A creator taking arguments bound by name; add them with
    /// [`CreatorDef::arg`].
    pub fn properties(func: CreatorFn) -> Self {
        Self {
            mode: CreatorMode::Properties,
            args: Vec::new(),
            func,
        }
    }

    pub fn arg(mut self, arg: CreatorArg) -> Self {
        self.args.push(arg);
        self
    }

    #[inline]
    pub fn args(&self) -> &[CreatorArg] {
        &self.args
    }
}

impl core::fmt::Debug for CreatorDef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreatorDef")
            .field("mode", &self.mode)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
