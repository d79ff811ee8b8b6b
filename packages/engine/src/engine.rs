use opendesign_common::OctopusComponent;
use tracing::debug;

use crate::{with_scope, ComponentHandle, EngineError, ErrorRef, RawHandle, StringRef};

/// Capability interface of the native rendering engine.
///
/// Transient parameters are passed as scope-bound refs; implementations must
/// reject refs whose generation no longer matches a live slot. Calls are
/// synchronous, except `request_redraw` which only schedules a repaint.
pub trait NativeEngine: Send + Sync {
    /// Allocate a native copy of `value`. Called by [`Scope`](crate::Scope) only.
    fn allocate_string(&self, value: &str) -> RawHandle;

    /// Allocate an empty error record. Called by [`Scope`](crate::Scope) only.
    fn allocate_error(&self) -> RawHandle;

    /// Free a transient allocation
    fn release(&self, handle: RawHandle);

    /// Message written into an error record by a failed call
    fn error_message(&self, error: ErrorRef<'_>) -> Option<String>;

    /// Instantiate a component from octopus component JSON
    fn create_component(
        &self,
        id: StringRef<'_>,
        octopus: StringRef<'_>,
        error: ErrorRef<'_>,
    ) -> Option<ComponentHandle>;

    fn destroy_component(&self, component: ComponentHandle);

    /// Insert an octopus layer under `parent_id`, before `before_id` (empty
    /// string appends). Returns false and fills `error` on rejection.
    fn insert_layer(
        &self,
        component: ComponentHandle,
        parent_id: StringRef<'_>,
        before_id: StringRef<'_>,
        octopus: StringRef<'_>,
        error: ErrorRef<'_>,
    ) -> bool;

    /// Remove a layer and its subtree. Returns false and fills `error` on rejection.
    fn remove_layer(
        &self,
        component: ComponentHandle,
        layer_id: StringRef<'_>,
        error: ErrorRef<'_>,
    ) -> bool;

    /// Hand encoded image bytes to the engine under `image_ref`
    fn load_image(&self, image_ref: StringRef<'_>, bytes: &[u8], error: ErrorRef<'_>) -> bool;

    /// Schedule a repaint; does not wait for it
    fn request_redraw(&self);
}

/// Create an engine component for `component`, returning its persistent handle
pub fn create_component(
    engine: &dyn NativeEngine,
    component: &OctopusComponent,
) -> Result<ComponentHandle, EngineError> {
    let json = component
        .to_json()
        .map_err(|e| EngineError::Serialize(e.to_string()))?;

    with_scope(engine, |scope| {
        let error = scope.error_slot();
        let handle = engine.create_component(scope.string(&component.id), scope.string(&json), error);

        match handle {
            Some(handle) => {
                debug!(component_id = %component.id, ?handle, "Created engine component");
                Ok(handle)
            }
            None => Err(EngineError::ComponentCreation {
                id: component.id.clone(),
                message: scope
                    .error_message(error)
                    .unwrap_or_else(|| "unknown engine error".to_string()),
            }),
        }
    })
}
