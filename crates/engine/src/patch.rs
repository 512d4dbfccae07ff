//! Partial-update field wrapper.

/// One field of a partial update.
///
/// `Keep` leaves the stored value untouched, `Set` overrides it. Nullable
/// columns use `Patch<Option<T>>`, so `Set(None)` clears the value while
/// `Keep` preserves it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    /// Returns the patched value, falling back to `current`.
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Keep => current,
            Self::Set(value) => value,
        }
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Keep => Patch::Keep,
            Self::Set(value) => Patch::Set(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `None` means the field was absent from the request.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_preserves_current_value() {
        assert_eq!(Patch::<i32>::Keep.apply(7), 7);
        assert_eq!(Patch::<Option<String>>::Keep.apply(Some("a".into())), Some("a".into()));
    }

    #[test]
    fn set_none_clears_nullable_field() {
        assert_eq!(Patch::Set(None::<i32>).apply(Some(3)), None);
    }

    #[test]
    fn from_option_maps_absent_to_keep() {
        assert_eq!(Patch::<u8>::from(None), Patch::Keep);
        assert_eq!(Patch::from(Some(2u8)), Patch::Set(2));
    }
}
