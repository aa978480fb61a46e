use crate::error::Result;

/// Desired object computed during one reconcile pass.
///
/// Owned by the operand engine and handed to the hooks; the engine resets it
/// at the start of every pass so a new pass always rebuilds from the latest
/// HyperConverged.
#[derive(Debug)]
pub struct DesiredCache<T> {
    cached: Option<T>,
}

impl<T> Default for DesiredCache<T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<T> DesiredCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached object, building it on first use
    pub fn get_or_try_build<F>(&mut self, build: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if self.cached.is_none() {
            self.cached = Some(build()?);
        }
        self.cached
            .as_ref()
            .ok_or_else(|| crate::error::OperandError::internal_error("desired object cache is empty"))
    }

    pub fn get(&self) -> Option<&T> {
        self.cached.as_ref()
    }

    pub fn reset(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperandError;

    #[test]
    fn test_builds_once_until_reset() {
        let mut cache = DesiredCache::new();
        let mut builds = 0;

        cache
            .get_or_try_build(|| {
                builds += 1;
                Ok(1)
            })
            .unwrap();
        let value = *cache
            .get_or_try_build(|| {
                builds += 1;
                Ok(2)
            })
            .unwrap();
        assert_eq!(value, 1);
        assert_eq!(builds, 1);

        cache.reset();
        assert!(cache.get().is_none());
        let value = *cache.get_or_try_build(|| Ok(3)).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let mut cache: DesiredCache<i32> = DesiredCache::new();
        let err = cache
            .get_or_try_build(|| Err(OperandError::internal_error("boom")))
            .unwrap_err();
        assert!(matches!(err, OperandError::InternalError { .. }));
        assert!(cache.get().is_none());
    }
}
