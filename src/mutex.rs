/// Common interface for mutex implementations.
///
/// The `CH423` driver keeps its register cache and the bus in one [`Driver`][crate::Driver].  All
/// operations on it go through this mutex, which is held for the whole read-modify-write of the
/// cache including the bus transactions.  `ch423-expander` already implements this trait for a
/// number of existing mutex types.  Most of them are guarded by a feature that needs to be enabled.
/// Here is an overview:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
/// | [`critical_section::Mutex`][mutex-cs] | `critical-section` | Use critical-section to ensure synchronized access. |
///
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
/// [mutex-cs]: https://docs.rs/critical-section/latest/critical_section/struct.Mutex.html
///
/// For other mutex types, a custom implementation is needed.  Due to the orphan rule, it might be
/// necessary to wrap it in a newtype.  As an example, this is what such a custom implementation
/// might look like:
///
/// ```
/// struct MyMutex<T>(std::sync::Mutex<T>);
///
/// impl<T> ch423_expander::PortMutex for MyMutex<T> {
///     type Port = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::Mutex::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
///         let mut v = self.0.lock().unwrap();
///         f(&mut v)
///     }
///
///     fn into_inner(self) -> T {
///         self.0.into_inner().unwrap()
///     }
/// }
/// ```
pub trait PortMutex {
    /// The actual port-expander that is wrapped inside this mutex.
    type Port;

    /// Create a new mutex of this type.
    fn create(v: Self::Port) -> Self;

    /// Lock the mutex and give a closure access to the port-expander inside.
    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R;

    /// Consume the mutex and return the port-expander inside.
    fn into_inner(self) -> Self::Port;
}

impl<T> PortMutex for core::cell::RefCell<T> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }

    fn into_inner(self) -> Self::Port {
        core::cell::RefCell::into_inner(self)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> PortMutex for std::sync::Mutex<T> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        std::sync::Mutex::new(v)
    }

    // A poisoned lock still holds a coherent cache: every commit happens after its transaction.
    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        let mut v = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut v)
    }

    fn into_inner(self) -> Self::Port {
        std::sync::Mutex::into_inner(self).unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(feature = "critical-section")]
impl<T> PortMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }

    fn into_inner(self) -> Self::Port {
        critical_section::Mutex::into_inner(self).into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::PortMutex;

    fn bump<M: PortMutex<Port = u32>>(m: &M) -> u32 {
        m.lock(|v| {
            *v += 1;
            *v
        })
    }

    #[test]
    fn refcell() {
        let m: core::cell::RefCell<u32> = PortMutex::create(1);
        assert_eq!(bump(&m), 2);
        assert_eq!(PortMutex::into_inner(m), 2);
    }

    #[test]
    fn std_mutex() {
        let m: std::sync::Mutex<u32> = PortMutex::create(1);
        std::thread::scope(|s| {
            s.spawn(|| bump(&m));
            s.spawn(|| bump(&m));
        });
        assert_eq!(PortMutex::into_inner(m), 3);
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn critical_section_mutex() {
        let m: critical_section::Mutex<core::cell::RefCell<u32>> = PortMutex::create(1);
        assert_eq!(bump(&m), 2);
        assert_eq!(PortMutex::into_inner(m), 2);
    }
}
