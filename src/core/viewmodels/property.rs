use std::fmt::Debug;
use tokio::sync::watch;

/// Observable value shared between a view model and whatever renders it.
///
/// Reads never block on writers for long: the value is cloned out of a
/// `watch` channel. Every write notifies subscribers.
pub struct Property<T> {
    sender: watch::Sender<T>,
    name: String,
}

/// Receives change notifications from a [`Property`].
pub struct PropertySubscriber<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> PropertySubscriber<T> {
    /// Wait until the property changes. Returns `false` once the property
    /// has been dropped.
    pub async fn wait_for_change(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Non-blocking check for an unseen change; marks it seen.
    pub fn try_recv(&mut self) -> bool {
        match self.receiver.has_changed() {
            Ok(true) => {
                self.receiver.borrow_and_update();
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }
}

impl<T: Clone> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(initial_value);
        Self {
            sender,
            name: name.into(),
        }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Read through a borrow without cloning the whole value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    pub fn set(&self, new_value: T) {
        self.sender.send_replace(new_value);
    }

    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(updater);
    }

    /// Apply `updater` atomically with respect to other writers, notifying
    /// subscribers only when it returns `true`.
    pub fn update_if<F>(&self, updater: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.sender.send_if_modified(updater)
    }

    pub fn subscribe(&self) -> PropertySubscriber<T> {
        PropertySubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({})", self.name)
    }
}
