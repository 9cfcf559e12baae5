use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, reference-counted state value.
///
/// Wraps `Arc<dyn Any + Send + Sync>` for zero-copy sharing across
/// multiple readers. Clone is cheap — just an atomic increment.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StateValue {
    /// Create a new StateValue from any `Send + Sync` type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Try to downcast to a concrete type reference.
    ///
    /// Returns `None` if the stored type doesn't match `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Check if the stored value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Get the `TypeId` of the stored value.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Get the number of strong references to the underlying value.
    ///
    /// Useful for verifying zero-copy behavior in tests.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_id", &(*self.inner).type_id())
            .finish()
    }
}

/// Unique handle for a subscription, returned by `subscribe()`.
///
/// Use this to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_downcast_correct_type() {
        let v = StateValue::new(42u32);
        assert_eq!(v.downcast_ref::<u32>(), Some(&42u32));
    }

    #[test]
    fn downcast_wrong_type_returns_none() {
        let v = StateValue::new(42u32);
        assert_eq!(v.downcast_ref::<i32>(), None);
        assert_eq!(v.downcast_ref::<String>(), None);
    }

    #[test]
    fn downcast_struct() {
        #[derive(Debug, PartialEq)]
        struct ItemRow {
            name: String,
            bought: bool,
        }

        let v = StateValue::new(ItemRow {
            name: "Milk".to_string(),
            bought: false,
        });
        let got = v.downcast_ref::<ItemRow>().unwrap();
        assert_eq!(got.name, "Milk");
        assert!(!got.bought);
    }

    #[test]
    fn downcast_vec() {
        let v = StateValue::new(vec![1u32, 2, 3]);
        let got = v.downcast_ref::<Vec<u32>>().unwrap();
        assert_eq!(got, &vec![1, 2, 3]);
    }

    #[test]
    fn clone_shares_arc() {
        let v1 = StateValue::new(42u32);
        assert_eq!(v1.ref_count(), 1);

        let v2 = v1.clone();
        assert_eq!(v1.ref_count(), 2);

        // Both point to the same underlying data.
        let p1 = v1.downcast_ref::<u32>().unwrap() as *const u32;
        let p2 = v2.downcast_ref::<u32>().unwrap() as *const u32;
        assert_eq!(p1, p2);
    }

    #[test]
    fn is_correct_type() {
        let v = StateValue::new(42u32);
        assert!(v.is::<u32>());
        assert!(!v.is::<i32>());
    }

    #[test]
    fn subscription_id_equality() {
        assert_eq!(SubscriptionId(1), SubscriptionId(1));
        assert_ne!(SubscriptionId(1), SubscriptionId(2));
    }

    // Compile-time: StateValue must be Send + Sync.
    fn _assert_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<StateValue>();
        assert_sync::<StateValue>();
    }
}
