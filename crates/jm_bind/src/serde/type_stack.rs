use core::fmt::{Debug, Formatter};

/// The names of the types currently being converted, outermost first.
#[derive(Default, Clone)]
pub(crate) struct TypeStack {
    stack: Vec<&'static str>,
}

impl TypeStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, type_name: &'static str) {
        self.stack.push(type_name);
    }

    #[inline]
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    #[inline]
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Debug for TypeStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            writeln!(f, "`{first}`")?;
        }
        for name in iter {
            writeln!(f, " -> `{name}`")?;
        }
        Ok(())
    }
}

/// Renders a conversion error for a foreign serde format, with the type stack
/// appended in debug builds.
#[inline]
pub(crate) fn describe(error: &crate::MapError, stack: &TypeStack) -> String {
    #[cfg(all(debug_assertions, feature = "debug"))]
    {
        if stack.depth() > 0 {
            return format!("{error} (stack:\n{stack:?})");
        }
    }
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    let _ = stack;

    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::TypeStack;

    #[test]
    fn debug_lists_outermost_first() {
        let mut stack = TypeStack::new();
        stack.push("User");
        stack.push("Item");
        assert_eq!(format!("{stack:?}"), "`User`\n -> `Item`\n");
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }
}
