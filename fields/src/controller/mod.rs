// Field controllers: mask on every input event, validate remotely after a quiet period.
//
// One controller owns one element. Input handling is synchronous: the mask is
// written and stale state cleared before `handle_input` returns. Remote calls
// run on spawned tokio tasks and only touch the element if no newer input
// arrived in the meantime (see `RequestTicket`).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::client::ValidationService;
use crate::config::{DelaySettings, MessageSettings};
use crate::debounce::{Debouncer, RequestTicket};
use crate::element::ElementHandle;

pub mod cep;
pub mod document;
pub mod email;
pub mod phone;

pub use cep::CepTargets;

/// What a controller does with its element.
pub enum FieldKind {
    /// CPF or CNPJ, picked by digit count.
    Document,
    Cep(CepTargets),
    Phone,
    Email,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Document => "document",
            FieldKind::Cep(_) => "cep",
            FieldKind::Phone => "phone",
            FieldKind::Email => "email",
        }
    }

    pub fn default_delay(&self, delays: &DelaySettings) -> Duration {
        match self {
            FieldKind::Document => delays.document(),
            FieldKind::Cep(_) => delays.cep(),
            FieldKind::Email => delays.email(),
            FieldKind::Phone => Duration::ZERO,
        }
    }
}

pub(crate) struct FieldInner {
    element: ElementHandle,
    kind: FieldKind,
    service: Option<Arc<dyn ValidationService>>,
    messages: MessageSettings,
    debouncer: Debouncer,
    ticket: RequestTicket,
    cancel: CancellationToken,
}

impl FieldInner {
    fn id(&self) -> &str {
        self.element.id()
    }

    /// Debounces `work`; teardown aborts it even after the timer fired.
    fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.debouncer.schedule(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = work => {}
            }
        });
    }

    fn is_stale(&self, ticket: u64) -> bool {
        if self.ticket.is_current(ticket) {
            return false;
        }
        tracing::debug!(field = %self.id(), ticket, "Discarding response superseded by newer input");
        true
    }
}

/// Binding of one input element to its mask and remote validation.
///
/// Dropping the controller tears it down.
pub struct FieldController {
    inner: Arc<FieldInner>,
}

impl FieldController {
    pub fn builder(element: ElementHandle, kind: FieldKind) -> FieldControllerBuilder {
        FieldControllerBuilder {
            element,
            kind,
            service: None,
            delay: None,
            messages: MessageSettings::default(),
            runtime: None,
        }
    }

    pub fn id(&self) -> &str {
        self.inner.id()
    }

    pub fn element(&self) -> &ElementHandle {
        &self.inner.element
    }

    pub fn kind(&self) -> &FieldKind {
        &self.inner.kind
    }

    pub fn delay(&self) -> Duration {
        self.inner.debouncer.wait()
    }

    /// Input event entry point; reads the element's current value.
    ///
    /// Remote validation is spawned on the runtime captured at build time, so
    /// this may be called from a UI thread outside tokio. A controller built
    /// outside any runtime without [`FieldControllerBuilder::runtime`] panics
    /// here once a validation is due.
    pub fn handle_input(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        let raw = self.inner.element.value();
        let ticket = self.inner.ticket.issue();
        match &self.inner.kind {
            FieldKind::Document => document::on_input(&self.inner, &raw, ticket),
            FieldKind::Cep(_) => cep::on_input(&self.inner, &raw, ticket),
            FieldKind::Phone => phone::on_input(&self.inner, &raw),
            FieldKind::Email => email::on_input(&self.inner, &raw, ticket),
        }
    }

    /// Writes `value` into the element and handles the resulting input event.
    ///
    /// Same runtime requirement as [`FieldController::handle_input`].
    pub fn input(&self, value: &str) {
        self.inner.element.set_value(value);
        self.handle_input();
    }

    pub fn is_validation_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Stops pending timers and in-flight requests; later input is ignored.
    pub fn teardown(&self) {
        self.inner.cancel.cancel();
        self.inner.debouncer.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl Drop for FieldController {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub struct FieldControllerBuilder {
    element: ElementHandle,
    kind: FieldKind,
    service: Option<Arc<dyn ValidationService>>,
    delay: Option<Duration>,
    messages: MessageSettings,
    runtime: Option<Handle>,
}

impl FieldControllerBuilder {
    /// Without a service, document, CEP and email fields only apply their mask.
    pub fn service(mut self, service: Arc<dyn ValidationService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn messages(mut self, messages: MessageSettings) -> Self {
        self.messages = messages;
        self
    }

    /// Runtime for timers and requests; defaults to the one `build` runs in.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> FieldController {
        let delay = self
            .delay
            .unwrap_or_else(|| self.kind.default_delay(&DelaySettings::default()));

        tracing::debug!(
            field = %self.element.id(),
            kind = self.kind.name(),
            delay_ms = delay.as_millis() as u64,
            remote = self.service.is_some(),
            "Binding field controller"
        );

        let mut debouncer = Debouncer::new(delay);
        if let Some(runtime) = self.runtime {
            debouncer = debouncer.on(runtime);
        }

        FieldController {
            inner: Arc::new(FieldInner {
                element: self.element,
                kind: self.kind,
                service: self.service,
                messages: self.messages,
                debouncer,
                ticket: RequestTicket::default(),
                cancel: CancellationToken::new(),
            }),
        }
    }
}
