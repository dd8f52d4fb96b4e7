//! Markers as absolutely positioned `div`s inside the map element

use anyhow::{Result, anyhow};
use rtrack_client::MapSurface;
use rtrack_core::{error::PollError, types::Marker};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node, window};

pub struct DomMap {
    document: Document,
    /// Class of the markers this map draws, other children are left alone
    class: String,
}

impl DomMap {
    pub fn new(class: &str) -> Result<Self> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("No document to draw on"))?;
        Ok(Self {
            document,
            class: class.to_string(),
        })
    }

    fn container(&self, id: &str) -> Result<Element, PollError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| PollError::MissingContainer(id.to_string()))
    }
}

impl MapSurface for DomMap {
    type Handle = HtmlElement;

    fn append(&mut self, container: &str, marker: &Marker) -> Result<HtmlElement, PollError> {
        let map = self.container(container)?;
        let device = self
            .document
            .create_element("div")
            .map_err(surface_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| PollError::Surface("div is not an html element".to_string()))?;

        device.set_class_name(&marker.class);
        set_offset(&device, marker)?;
        map.append_child(&device).map_err(surface_error)?;
        Ok(device)
    }

    fn reposition(
        &mut self,
        container: &str,
        handle: &HtmlElement,
        marker: &Marker,
    ) -> Result<(), PollError> {
        let map = self.container(container)?;
        let node: &Node = handle;
        if !map.contains(Some(node)) {
            return Err(PollError::Surface("marker left the map".to_string()));
        }
        set_offset(handle, marker)
    }

    fn clear(&mut self, container: &str) -> Result<(), PollError> {
        let map = self.container(container)?;
        // Live collection: it shrinks as markers are removed
        let markers = map.get_elements_by_class_name(&self.class);
        while let Some(marker) = markers.item(0) {
            marker.remove();
        }
        Ok(())
    }
}

fn set_offset(element: &HtmlElement, marker: &Marker) -> Result<(), PollError> {
    let style = element.style();
    style
        .set_property("left", &marker.offset.left_css())
        .map_err(surface_error)?;
    style
        .set_property("top", &marker.offset.top_css())
        .map_err(surface_error)?;
    Ok(())
}

fn surface_error(e: JsValue) -> PollError {
    PollError::Surface(format!("{e:?}"))
}
