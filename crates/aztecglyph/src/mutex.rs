#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Result;

/// Locks `mutex`. Only the std lock can fail, with [`crate::Error::LockPoisoned`].
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(mutex.lock())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Ok(mutex.lock()?)
    }
}

#[allow(clippy::unnecessary_wraps)]
pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(lock.read())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Ok(lock.read()?)
    }
}

#[allow(clippy::unnecessary_wraps)]
pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(lock.write())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Ok(lock.write()?)
    }
}
