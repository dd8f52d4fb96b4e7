use std::collections::HashMap;

use rtrack_core::{error::PollError, types::Marker};

use crate::layer::MapSurface;

/// Handle of a marker in a `MemoryMap`. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerId(u64);

#[derive(Debug, Default, Clone)]
struct Container {
    ids: Vec<MarkerId>,
    markers: Vec<Marker>,
}

/// Map surface kept in memory. Containers hold their markers in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryMap {
    containers: HashMap<String, Container>,
    next_id: u64,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(id: &str) -> Self {
        let mut map = Self::new();
        map.add_container(id);
        map
    }

    pub fn add_container(&mut self, id: &str) {
        self.containers.entry(id.to_string()).or_default();
    }

    pub fn remove_container(&mut self, id: &str) -> Option<Vec<Marker>> {
        self.containers.remove(id).map(|c| c.markers)
    }

    /// Markers of a container, oldest first. Empty if the container is missing.
    pub fn markers(&self, id: &str) -> &[Marker] {
        self.containers
            .get(id)
            .map(|c| c.markers.as_slice())
            .unwrap_or(&[])
    }

    fn container_mut(&mut self, id: &str) -> Result<&mut Container, PollError> {
        self.containers
            .get_mut(id)
            .ok_or_else(|| PollError::MissingContainer(id.to_string()))
    }
}

impl MapSurface for MemoryMap {
    type Handle = MarkerId;

    fn append(&mut self, container: &str, marker: &Marker) -> Result<MarkerId, PollError> {
        let id = MarkerId(self.next_id);
        let container = self.container_mut(container)?;
        container.ids.push(id);
        container.markers.push(marker.clone());
        self.next_id += 1;
        Ok(id)
    }

    fn reposition(
        &mut self,
        container: &str,
        handle: &MarkerId,
        marker: &Marker,
    ) -> Result<(), PollError> {
        let container = self.container_mut(container)?;
        let index = container
            .ids
            .iter()
            .position(|id| id == handle)
            .ok_or_else(|| PollError::Surface(format!("no marker with id {}", handle.0)))?;
        container.markers[index] = marker.clone();
        Ok(())
    }

    fn clear(&mut self, container: &str) -> Result<(), PollError> {
        let container = self.container_mut(container)?;
        container.ids.clear();
        container.markers.clear();
        Ok(())
    }
}
