use crate::error::{DeviceError, LocateError};
use crate::protocol::{ObjectPath, Property, RawValue};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Fired when an observed property changes. Carries no value; readers go back
/// to the graph for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    pub subscription: SubscriptionId,
}

#[derive(Debug)]
struct Registration {
    id: SubscriptionId,
    property: Property,
    tx: Sender<PropertyChanged>,
}

/// Per-object registry of property subscriptions.
#[derive(Debug, Default)]
pub struct Notifier {
    registrations: Vec<Registration>,
}

impl Notifier {
    pub fn register(&mut self, property: Property, tx: Sender<PropertyChanged>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.registrations.push(Registration { id, property, tx });
        id
    }

    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Queues a notification for every subscriber of `property`. Subscribers
    /// whose receiver is gone are dropped here.
    pub fn notify(&mut self, property: Property) {
        self.registrations.retain(|r| {
            r.property != property
                || r.tx.send(PropertyChanged { subscription: r.id }).is_ok()
        });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// The change-notification capability every observable graph object offers.
pub trait NotifyPropertyChanged {
    fn path(&self) -> ObjectPath;
    fn property_value(&self, property: Property) -> Option<RawValue>;
    fn set_property(&mut self, property: Property, value: RawValue) -> Result<bool, DeviceError>;
    fn notifier_mut(&mut self) -> &mut Notifier;

    fn subscribe(
        &mut self,
        property: Property,
        tx: Sender<PropertyChanged>,
    ) -> Result<SubscriptionId, LocateError> {
        if self.property_value(property).is_none() {
            return Err(LocateError::UnknownProperty {
                path: self.path(),
                property,
            });
        }
        Ok(self.notifier_mut().register(property, tx))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier_mut().unregister(id)
    }
}

/// Stores `value` and notifies when it differs from what is already there.
pub(crate) fn assign<T: PartialEq>(
    slot: &mut T,
    value: T,
    notifier: &mut Notifier,
    property: Property,
) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    notifier.notify(property);
    true
}

pub(crate) fn expect_bool(property: Property, value: RawValue) -> Result<bool, DeviceError> {
    match value {
        RawValue::Bool(b) => Ok(b),
        other => Err(wrong_kind(property, "bool", &other)),
    }
}

pub(crate) fn expect_number(property: Property, value: RawValue) -> Result<f64, DeviceError> {
    match value {
        RawValue::Number(n) => Ok(n),
        other => Err(wrong_kind(property, "number", &other)),
    }
}

pub(crate) fn expect_text(property: Property, value: RawValue) -> Result<String, DeviceError> {
    match value {
        RawValue::Text(s) => Ok(s),
        other => Err(wrong_kind(property, "text", &other)),
    }
}

pub(crate) fn unknown_property(path: ObjectPath, property: Property) -> DeviceError {
    DeviceError::Locate(LocateError::UnknownProperty { path, property })
}

fn wrong_kind(property: Property, expected: &'static str, got: &RawValue) -> DeviceError {
    DeviceError::WrongKind {
        property,
        expected,
        got: got.kind(),
    }
}
