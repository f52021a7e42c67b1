//! [`Redact`] for standard library types.
//!
//! | Type | Shape |
//! |------|-------|
//! | integers, floats, `bool`, `char`, `()` | primitive |
//! | `String`, `str`, `Cow<str>`, `fmt::Arguments` | text |
//! | `Option`, `Box`, references | transparent |
//! | `Rc`, `Arc`, `Weak` | pointer (cycle-checked) |
//! | `Vec`, slices, arrays, `VecDeque`, sets | sequence |
//! | `HashMap`, `BTreeMap` | map |
//! | `RefCell`, `Mutex`, `RwLock` | transparent when not exclusively held |
//! | tuples, `Result` | tuple |

use std::{
    borrow::Cow,
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt,
    marker::PhantomData,
    rc::{self, Rc},
    sync::{self, Arc, Mutex, RwLock, TryLockError},
};

use super::{Order, Redact, Tag, Walker};

/// Emitted for a `RefCell` that is mutably borrowed while being logged.
pub const BORROWED_PLACEHOLDER: &str = "<borrowed>";
/// Emitted for a `Mutex` or `RwLock` held elsewhere while being logged.
pub const LOCKED_PLACEHOLDER: &str = "<locked>";

macro_rules! impl_redact_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Redact for $ty {
                fn walk(&self, walker: &mut Walker, _tag: Option<Tag>) {
                    walker.primitive(self);
                }
            }
        )*
    };
}

impl_redact_primitive!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Redact for () {
    fn walk(&self, walker: &mut Walker, _tag: Option<Tag>) {
        walker.unit("()");
    }
}

impl<T: ?Sized> Redact for PhantomData<T> {
    fn walk(&self, walker: &mut Walker, _tag: Option<Tag>) {
        walker.unit("PhantomData");
    }
}

// =============================================================================
// Text
// =============================================================================

impl Redact for str {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.text(self, tag);
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Redact for String {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.text(self, tag);
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Redact for Cow<'_, str> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.text(self, tag);
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Redact for fmt::Arguments<'_> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self.as_str() {
            Some(text) => walker.text(text, tag),
            None => walker.text(&self.to_string(), tag),
        }
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }
}

// =============================================================================
// Transparent wrappers
// =============================================================================

impl<T: Redact> Redact for Option<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self {
            Some(value) => value.walk(walker, tag),
            None => walker.unit("None"),
        }
    }

    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(Redact::as_text)
    }
}

impl<T: Redact + ?Sized> Redact for Box<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        (**self).walk(walker, tag);
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: Redact + ?Sized> Redact for &T {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        (**self).walk(walker, tag);
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: Redact + ?Sized> Redact for &mut T {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        (**self).walk(walker, tag);
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

// =============================================================================
// Shared pointers
// =============================================================================

impl<T: Redact + ?Sized> Redact for Rc<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.pointer(&**self, tag);
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: Redact + ?Sized> Redact for Arc<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.pointer(&**self, tag);
    }

    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

/// A dangling weak reference renders as nothing.
impl<T: Redact + ?Sized> Redact for rc::Weak<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        if let Some(target) = self.upgrade() {
            walker.pointer(&*target, tag);
        }
    }
}

impl<T: Redact + ?Sized> Redact for sync::Weak<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        if let Some(target) = self.upgrade() {
            walker.pointer(&*target, tag);
        }
    }
}

// =============================================================================
// Interior mutability
// =============================================================================

impl<T: Redact + ?Sized> Redact for RefCell<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self.try_borrow() {
            Ok(value) => value.walk(walker, tag),
            Err(_) => walker.unit(BORROWED_PLACEHOLDER),
        }
    }
}

impl<T: Redact + ?Sized> Redact for Mutex<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self.try_lock() {
            Ok(value) => value.walk(walker, tag),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().walk(walker, tag),
            Err(TryLockError::WouldBlock) => walker.unit(LOCKED_PLACEHOLDER),
        }
    }
}

impl<T: Redact + ?Sized> Redact for RwLock<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self.try_read() {
            Ok(value) => value.walk(walker, tag),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().walk(walker, tag),
            Err(TryLockError::WouldBlock) => walker.unit(LOCKED_PLACEHOLDER),
        }
    }
}

// =============================================================================
// Collections
// =============================================================================

impl<T: Redact> Redact for [T] {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.sequence(self, tag);
    }
}

impl<T: Redact, const N: usize> Redact for [T; N] {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.sequence(self, tag);
    }
}

impl<T: Redact> Redact for Vec<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.sequence(self, tag);
    }
}

impl<T: Redact> Redact for VecDeque<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.sequence(self, tag);
    }
}

impl<T: Redact> Redact for BTreeSet<T> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.set(self, Order::Iteration, tag);
    }
}

impl<T: Redact, S> Redact for HashSet<T, S> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.set(self, Order::Sorted, tag);
    }
}

impl<K: Redact, V: Redact> Redact for BTreeMap<K, V> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.map(self, Order::Iteration, tag);
    }
}

impl<K: Redact, V: Redact, S> Redact for HashMap<K, V, S> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        walker.map(self, Order::Sorted, tag);
    }
}

impl<T: Redact, E: Redact> Redact for Result<T, E> {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self {
            Ok(value) => walker.tuple("Ok", tag, |fields| fields.element(value, tag)),
            Err(err) => walker.tuple("Err", tag, |fields| fields.element(err, tag)),
        }
    }
}

macro_rules! impl_redact_tuple {
    ($($name:ident),+) => {
        impl<$($name: Redact),+> Redact for ($($name,)+) {
            #[allow(non_snake_case)]
            fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
                let ($($name,)+) = self;
                walker.tuple("", tag, |fields| {
                    $(fields.element($name, tag);)+
                });
            }
        }
    };
}

impl_redact_tuple!(A);
impl_redact_tuple!(A, B);
impl_redact_tuple!(A, B, C);
impl_redact_tuple!(A, B, C, D);
impl_redact_tuple!(A, B, C, D, E);
impl_redact_tuple!(A, B, C, D, E, F);

// =============================================================================
// Timestamps
// =============================================================================

impl<Tz> Redact for chrono::DateTime<Tz>
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    fn walk(&self, walker: &mut Walker, _tag: Option<Tag>) {
        walker.primitive(self);
    }
}

impl Redact for chrono::NaiveDateTime {
    fn walk(&self, walker: &mut Walker, _tag: Option<Tag>) {
        walker.primitive(self);
    }
}
