use std::{cell::Cell, future::Future, rc::Rc};

/// "Still mounted" flag for one view. Async effects wrap their work in
/// [`MountGuard::run`] so that a response arriving after the view is gone is
/// dropped instead of being written into disposed signals.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Rc<Cell<bool>>,
}

impl MountGuard {
    /// Ties the flag to the current reactive owner: it flips when the owner
    /// is cleaned up.
    pub fn new() -> Self {
        let guard = Self::detached();
        let flag = Rc::clone(&guard.mounted);
        leptos::on_cleanup(move || flag.set(false));
        guard
    }

    /// A guard not tied to any reactive owner; call [`MountGuard::unmount`]
    /// explicitly.
    pub fn detached() -> Self {
        Self {
            mounted: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    /// Awaits `fut`, yielding `None` if the view unmounted meanwhile.
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let value = fut.await;
        if self.is_mounted() {
            Some(value)
        } else {
            log::debug!("discarding result for unmounted view");
            None
        }
    }

    /// Runs `fut` on the local executor and hands the result to `apply`
    /// only while the view is mounted.
    pub fn spawn<F, T>(&self, fut: F, apply: impl FnOnce(T) + 'static)
    where
        F: Future<Output = T> + 'static,
        T: 'static,
    {
        let guard = self.clone();
        leptos::spawn_local(async move {
            if let Some(value) = guard.run(fut).await {
                apply(value);
            }
        });
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{channel::oneshot, executor::block_on, join};
    use std::cell::RefCell;

    #[test]
    fn mounted_view_receives_result() {
        let guard = MountGuard::detached();
        assert_eq!(block_on(guard.run(async { 7 })), Some(7));
    }

    #[test]
    fn result_after_unmount_is_discarded() {
        let guard = MountGuard::detached();
        let state = RefCell::new(None::<&str>);
        let (tx, rx) = oneshot::channel::<&str>();

        let effect = async {
            if let Some(Ok(value)) = guard.run(rx).await {
                *state.borrow_mut() = Some(value);
            }
        };
        let unmount_then_respond = async {
            guard.unmount();
            let _ = tx.send("late response");
        };
        block_on(async { join!(effect, unmount_then_respond) });

        assert!(state.borrow().is_none());
        assert!(!guard.is_mounted());
    }

    #[test]
    fn clones_share_the_flag() {
        let guard = MountGuard::detached();
        let clone = guard.clone();
        guard.unmount();
        assert!(!clone.is_mounted());
    }
}
