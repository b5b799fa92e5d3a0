use std::fmt;
use std::sync::Arc;

use crate::event::dispatcher::EventDispatcher;
use crate::event::error::ListenerError;
use crate::event::Event;

/// Outcome of a single listener invocation. An `Err` aborts the dispatch.
pub type ListenerResult = Result<(), ListenerError>;

/// Callback signature shared by every listener
pub type ListenerFn = dyn Fn(&mut dyn Event, &str, &dyn EventDispatcher) -> ListenerResult + Send + Sync;

#[derive(Clone, PartialEq, Eq)]
enum Identity {
    /// Address of the shared callback allocation
    Callback(usize),
    /// Address of the receiver plus the bound method name
    Method { receiver: usize, method: String },
}

/// Identity-compared handle to a listener callback.
///
/// Cloning a handle keeps its identity, so a clone can later be used to
/// remove or look up the registration. Two handles built separately are never
/// equal, even when they wrap identical code. Handles built with
/// [`Listener::method`] compare by receiver and method name instead, which
/// makes repeated resolution of a subscriber method yield equal handles.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<ListenerFn>,
    identity: Identity,
    label: Option<String>,
}

impl Listener {
    /// Wrap a fallible callback
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Event, &str, &dyn EventDispatcher) -> ListenerResult + Send + Sync + 'static,
    {
        let callback: Arc<ListenerFn> = Arc::new(f);
        let identity = Identity::Callback(Arc::as_ptr(&callback) as *const () as usize);
        Self {
            callback,
            identity,
            label: None,
        }
    }

    /// Wrap a callback that cannot fail
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Event, &str, &dyn EventDispatcher) + Send + Sync + 'static,
    {
        Self::new(move |event, event_name, dispatcher| {
            f(event, event_name, dispatcher);
            Ok(())
        })
    }

    /// Bind `f` to `receiver` under the given method name.
    ///
    /// The handle's identity is `(receiver, method)`, whatever `f` captures.
    pub fn method<S, F>(receiver: Arc<S>, method: impl Into<String>, f: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&S, &mut dyn Event, &str, &dyn EventDispatcher) -> ListenerResult + Send + Sync + 'static,
    {
        let method = method.into();
        let identity = Identity::Method {
            receiver: Arc::as_ptr(&receiver) as *const () as usize,
            method: method.clone(),
        };
        let mut listener = Self::new(move |event, event_name, dispatcher| f(&*receiver, event, event_name, dispatcher));
        listener.identity = identity;
        listener.label = Some(method);
        listener
    }

    /// Attach a display label. Labels never take part in comparisons.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Invoke the callback
    pub fn call(&self, event: &mut dyn Event, event_name: &str, dispatcher: &dyn EventDispatcher) -> ListenerResult {
        (self.callback)(event, event_name, dispatcher)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Listener");
        match &self.identity {
            Identity::Callback(addr) => s.field("callback", &format_args!("{:#x}", addr)),
            Identity::Method { receiver, method } => s
                .field("receiver", &format_args!("{:#x}", receiver))
                .field("method", method),
        };
        s.field("label", &self.label).finish()
    }
}
