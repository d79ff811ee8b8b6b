//! # Headless Engine
//!
//! In-memory implementation of [`NativeEngine`].
//!
//! It keeps the same bookkeeping a native engine does (generational slots for
//! transient handles, a layer tree per component, loaded images, pending
//! redraws) without rendering anything. The CLI uses it to merge designs
//! offline and the tests use it to observe engine-side state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use opendesign_common::{OctopusComponent, OctopusLayer};
use tracing::debug;

use crate::{ComponentHandle, EngineError, ErrorRef, NativeEngine, RawHandle, StringRef};

#[derive(Debug)]
enum SlotValue {
    Text(String),
    Error(Option<String>),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    value: Option<SlotValue>,
}

#[derive(Debug)]
struct HeadlessComponent {
    id: String,
    root: OctopusLayer,
}

#[derive(Debug, Default)]
struct HeadlessState {
    slots: Vec<Slot>,
    free: Vec<u32>,
    components: HashMap<ComponentHandle, HeadlessComponent>,
    next_component: u32,
    images: HashMap<String, Vec<u8>>,
}

impl HeadlessState {
    fn allocate(&mut self, value: SlotValue) -> RawHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        RawHandle::new(index, slot.generation)
    }

    fn slot(&self, raw: RawHandle) -> Option<&SlotValue> {
        self.slots
            .get(raw.index() as usize)
            .filter(|slot| slot.generation == raw.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    fn text(&self, raw: RawHandle) -> Result<&str, String> {
        match self.slot(raw) {
            Some(SlotValue::Text(text)) => Ok(text),
            Some(SlotValue::Error(_)) => Err(format!("{raw:?} is not a string")),
            None => Err(EngineError::StaleHandle(format!("{raw:?}")).to_string()),
        }
    }

    fn set_error(&mut self, raw: RawHandle, message: String) {
        if let Some(slot) = self.slots.get_mut(raw.index() as usize) {
            if slot.generation == raw.generation() {
                if let Some(SlotValue::Error(existing)) = slot.value.as_mut() {
                    *existing = Some(message);
                }
            }
        }
    }

    fn release(&mut self, raw: RawHandle) {
        if let Some(slot) = self.slots.get_mut(raw.index() as usize) {
            if slot.generation == raw.generation() && slot.value.is_some() {
                slot.value = None;
                // an exhausted slot is never handed out again
                if let Some(next) = slot.generation.checked_add(1).filter(|g| *g < RawHandle::MAX_GENERATION) {
                    slot.generation = next;
                    self.free.push(raw.index());
                }
            }
        }
    }

    fn create_component(&mut self, id: RawHandle, octopus: RawHandle) -> Result<ComponentHandle, String> {
        let id = self.text(id)?.to_string();
        let component = OctopusComponent::from_json(self.text(octopus)?)
            .map_err(|e| format!("Invalid component octopus: {e}"))?;
        if component.id != id {
            return Err(format!("Component id mismatch: expected {id}, got {}", component.id));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = component.content.ids().into_iter().find(|id| !seen.insert(*id)) {
            return Err(format!("Duplicate layer id '{duplicate}'"));
        }

        let handle = ComponentHandle::from_raw(RawHandle::new(self.next_component, 0));
        self.next_component += 1;
        self.components.insert(
            handle,
            HeadlessComponent {
                id,
                root: component.content,
            },
        );
        Ok(handle)
    }

    fn insert_layer(
        &mut self,
        component: ComponentHandle,
        parent_id: RawHandle,
        before_id: RawHandle,
        octopus: RawHandle,
    ) -> Result<(), String> {
        let parent_id = self.text(parent_id)?.to_string();
        let before_id = self.text(before_id)?.to_string();
        let layer = OctopusLayer::from_json(self.text(octopus)?)
            .map_err(|e| format!("Invalid octopus: {e}"))?;

        let target = self
            .components
            .get_mut(&component)
            .ok_or_else(|| format!("Unknown component {component:?}"))?;

        if let Some(existing) = layer.ids().into_iter().find(|id| target.root.find(id).is_some()) {
            return Err(format!("Layer id '{existing}' already exists in component {}", target.id));
        }

        let parent = target
            .root
            .find_mut(&parent_id)
            .ok_or_else(|| format!("Parent layer '{parent_id}' not found"))?;
        if !parent.layer_type.is_container() {
            return Err(format!(
                "Layer '{parent_id}' of type {} cannot have children",
                parent.layer_type
            ));
        }

        if before_id.is_empty() {
            parent.layers.push(layer);
        } else {
            let index = parent
                .layers
                .iter()
                .position(|child| child.id == before_id)
                .ok_or_else(|| format!("Layer '{before_id}' is not a child of '{parent_id}'"))?;
            parent.layers.insert(index, layer);
        }
        Ok(())
    }

    fn remove_layer(&mut self, component: ComponentHandle, layer_id: RawHandle) -> Result<(), String> {
        let layer_id = self.text(layer_id)?.to_string();
        let target = self
            .components
            .get_mut(&component)
            .ok_or_else(|| format!("Unknown component {component:?}"))?;

        if target.root.id == layer_id {
            return Err(format!("Cannot remove root layer '{layer_id}'"));
        }
        if detach(&mut target.root, &layer_id) {
            Ok(())
        } else {
            Err(format!("Layer '{layer_id}' not found"))
        }
    }
}

fn detach(layer: &mut OctopusLayer, id: &str) -> bool {
    if layer.mask.as_ref().is_some_and(|mask| mask.id == id) {
        layer.mask = None;
        return true;
    }
    if let Some(index) = layer.layers.iter().position(|child| child.id == id) {
        layer.layers.remove(index);
        return true;
    }
    if let Some(mask) = layer.mask.as_deref_mut() {
        if detach(mask, id) {
            return true;
        }
    }
    layer.layers.iter_mut().any(|child| detach(child, id))
}

/// Engine that keeps all state in memory
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    state: Mutex<HeadlessState>,
    redraws: AtomicUsize,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `raw` still refers to an allocated transient object
    pub fn is_live(&self, raw: RawHandle) -> bool {
        self.state().slot(raw).is_some()
    }

    /// Number of transient objects currently allocated
    pub fn live_handle_count(&self) -> usize {
        self.state().slots.iter().filter(|slot| slot.value.is_some()).count()
    }

    /// Number of redraws requested so far
    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    pub fn component_count(&self) -> usize {
        self.state().components.len()
    }

    /// Layer ids of a component in depth-first order
    pub fn layer_ids(&self, component: ComponentHandle) -> Option<Vec<String>> {
        self.state()
            .components
            .get(&component)
            .map(|c| c.root.ids().into_iter().map(str::to_string).collect())
    }

    /// Snapshot of a component's layer tree
    pub fn component_content(&self, component: ComponentHandle) -> Option<OctopusLayer> {
        self.state().components.get(&component).map(|c| c.root.clone())
    }

    /// Bytes loaded under an image ref
    pub fn image(&self, image_ref: &str) -> Option<Vec<u8>> {
        self.state().images.get(image_ref).cloned()
    }

    pub fn image_count(&self) -> usize {
        self.state().images.len()
    }
}

impl NativeEngine for HeadlessEngine {
    fn allocate_string(&self, value: &str) -> RawHandle {
        self.state().allocate(SlotValue::Text(value.to_string()))
    }

    fn allocate_error(&self) -> RawHandle {
        self.state().allocate(SlotValue::Error(None))
    }

    fn release(&self, handle: RawHandle) {
        self.state().release(handle);
    }

    fn error_message(&self, error: ErrorRef<'_>) -> Option<String> {
        match self.state().slot(error.raw()) {
            Some(SlotValue::Error(message)) => message.clone(),
            _ => None,
        }
    }

    fn create_component(
        &self,
        id: StringRef<'_>,
        octopus: StringRef<'_>,
        error: ErrorRef<'_>,
    ) -> Option<ComponentHandle> {
        let mut state = self.state();
        match state.create_component(id.raw(), octopus.raw()) {
            Ok(handle) => Some(handle),
            Err(message) => {
                state.set_error(error.raw(), message);
                None
            }
        }
    }

    fn destroy_component(&self, component: ComponentHandle) {
        if let Some(removed) = self.state().components.remove(&component) {
            debug!(component_id = %removed.id, "Destroyed engine component");
        }
    }

    fn insert_layer(
        &self,
        component: ComponentHandle,
        parent_id: StringRef<'_>,
        before_id: StringRef<'_>,
        octopus: StringRef<'_>,
        error: ErrorRef<'_>,
    ) -> bool {
        let mut state = self.state();
        match state.insert_layer(component, parent_id.raw(), before_id.raw(), octopus.raw()) {
            Ok(()) => true,
            Err(message) => {
                debug!(%message, "Layer insertion rejected");
                state.set_error(error.raw(), message);
                false
            }
        }
    }

    fn remove_layer(&self, component: ComponentHandle, layer_id: StringRef<'_>, error: ErrorRef<'_>) -> bool {
        let mut state = self.state();
        match state.remove_layer(component, layer_id.raw()) {
            Ok(()) => true,
            Err(message) => {
                state.set_error(error.raw(), message);
                false
            }
        }
    }

    fn load_image(&self, image_ref: StringRef<'_>, bytes: &[u8], error: ErrorRef<'_>) -> bool {
        let mut state = self.state();
        let key = match state.text(image_ref.raw()) {
            Ok(key) => key.to_string(),
            Err(message) => {
                state.set_error(error.raw(), message);
                return false;
            }
        };
        if bytes.is_empty() {
            state.set_error(error.raw(), format!("Image '{key}' has no data"));
            return false;
        }
        state.images.insert(key, bytes.to_vec());
        true
    }

    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }
}
