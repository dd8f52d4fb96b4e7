//! Marker placement, independent of what actually draws the markers

use std::collections::HashMap;

use log::debug;
use rtrack_core::{
    config::{PollerConfig, RenderMode},
    error::PollError,
    types::{DeviceId, Marker, PositionReport},
};

/// Something markers can be drawn on: a DOM tree, a terminal buffer, a test double.
pub trait MapSurface {
    /// Whatever the surface needs to find a marker again
    type Handle;

    /// Adds a new marker to the container. Fails with
    /// `PollError::MissingContainer` when the container does not exist.
    fn append(&mut self, container: &str, marker: &Marker) -> Result<Self::Handle, PollError>;

    /// Moves a marker previously returned by `append`.
    fn reposition(
        &mut self,
        container: &str,
        handle: &Self::Handle,
        marker: &Marker,
    ) -> Result<(), PollError>;

    /// Removes every marker of the container. Handles given out before
    /// must not resolve to markers appended afterwards.
    fn clear(&mut self, container: &str) -> Result<(), PollError>;
}

pub struct MarkerLayer<S: MapSurface> {
    surface: S,
    container: String,
    class: String,
    scale: f64,
    mode: RenderMode,
    default_device: DeviceId,
    placed: HashMap<DeviceId, S::Handle>,
}

impl<S: MapSurface> MarkerLayer<S> {
    pub fn new(config: &PollerConfig, surface: S) -> Self {
        Self {
            surface,
            container: config.container_id.clone(),
            class: config.marker_class.clone(),
            scale: config.scale,
            mode: config.mode,
            default_device: DeviceId::new(config.default_device.as_str()),
            placed: HashMap::new(),
        }
    }

    /// Draws the report. In trail mode a marker is always appended, in
    /// current mode the device's previous marker is moved instead.
    pub fn place(&mut self, report: &PositionReport) -> Result<Marker, PollError> {
        let device = report
            .device_id
            .clone()
            .unwrap_or_else(|| self.default_device.clone());
        let marker =
            Marker::new(device.clone(), report.position, self.scale).with_class(&self.class);

        match self.mode {
            RenderMode::Trail => {
                self.surface.append(&self.container, &marker)?;
            }
            RenderMode::Current => {
                let moved = match self.placed.get(&device) {
                    Some(handle) => {
                        match self.surface.reposition(&self.container, handle, &marker) {
                            Ok(()) => true,
                            Err(PollError::MissingContainer(id)) => {
                                return Err(PollError::MissingContainer(id));
                            }
                            Err(e) => {
                                debug!("Marker of {device} is gone ({e}), appending a new one");
                                false
                            }
                        }
                    }
                    None => false,
                };
                if !moved {
                    let handle = self.surface.append(&self.container, &marker)?;
                    self.placed.insert(device, handle);
                }
            }
        }

        Ok(marker)
    }

    /// Removes every marker and forgets which device owned which.
    pub fn clear(&mut self) -> Result<(), PollError> {
        self.placed.clear();
        self.surface.clear(&self.container)
    }

    /// Number of devices with a tracked marker. Always 0 in trail mode.
    pub fn tracked(&self) -> usize {
        self.placed.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
