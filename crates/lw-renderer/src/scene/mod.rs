//! Scene management for drawable objects.
//!
//! [`Scene`] is a flat, ordered list of draw calls and the reference
//! implementation of [`SceneQuery`]. Hosts with their own culling and
//! draw lists implement the trait directly.

mod filter;
mod render_object;

pub use filter::*;
pub use render_object::*;

use std::collections::HashMap;

use uuid::Uuid;

use crate::context::CameraView;
use crate::traits::SceneQuery;

/// Scene containing all drawable objects, in insertion order.
pub struct Scene {
    objects: HashMap<Uuid, RenderObject>,
    order: Vec<Uuid>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Creates a scene from a list of objects, keeping their order.
    pub fn from_objects(objects: impl IntoIterator<Item = RenderObject>) -> Self {
        let mut scene = Self::new();
        for object in objects {
            scene.add_object(object);
        }
        scene
    }

    /// Adds an object to the scene, replacing any object with the same ID.
    pub fn add_object(&mut self, object: RenderObject) -> Uuid {
        let id = object.id;
        if self.objects.insert(id, object).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Gets an object by ID.
    pub fn get_object(&self, id: Uuid) -> Option<&RenderObject> {
        self.objects.get(&id)
    }

    /// Removes an object from the scene.
    pub fn remove_object(&mut self, id: Uuid) -> Option<RenderObject> {
        let removed = self.objects.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(removed)
    }

    /// Returns true if the scene contains an object with the given ID.
    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns an iterator over all objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneQuery for Scene {
    fn query(&self, filter: &DrawFilter, camera: &CameraView, sort: SortCriteria) -> Vec<DrawItem> {
        let mut items: Vec<DrawItem> = self
            .objects()
            .filter(|obj| obj.visible && filter.matches(obj))
            .map(|obj| DrawItem {
                object: obj.id,
                render_queue: obj.render_queue,
                material_key: obj.material_key,
                distance: camera.position.distance(obj.position()),
            })
            .collect();

        sort.sort(&mut items);
        items
    }
}
