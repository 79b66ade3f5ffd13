use crate::components::{ClipPlaneCollection, Transform};
use foundation::BoundingSphere;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What kind of renderable a scene object is. Tools that need per-kind
/// behavior branch on this tag rather than probing the object's shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneObjectKind {
    /// Streamed tiled 3D model anchored somewhere on the globe.
    TiledModel,
    /// Volumetric dataset (voxel block or similar).
    VolumeData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: SceneObjectKind,
    pub transform: Transform,
    pub bounding_sphere: BoundingSphere,
    pub clip: ClipPlaneCollection,
}

impl SceneObject {
    pub fn new(kind: SceneObjectKind, transform: Transform, bounding_sphere: BoundingSphere) -> Self {
        Self {
            kind,
            transform,
            bounding_sphere,
            clip: ClipPlaneCollection::default(),
        }
    }
}

/// Container for the clippable scene content: the globe's clip collection
/// plus every loaded object with its own.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    objects: Vec<Option<SceneObject>>,
    globe_clip: ClipPlaneCollection,
    ground_height: Option<f64>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_index);
        self.next_index += 1;
        let idx = id.index() as usize;
        if self.objects.len() <= idx {
            self.objects.resize(idx + 1, None);
        }
        self.objects[idx] = Some(object);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        if let Some(slot) = self.objects.get_mut(id.index() as usize) {
            *slot = None;
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index() as usize).and_then(|o| o.as_ref())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects
            .get_mut(id.index() as usize)
            .and_then(|o| o.as_mut())
    }

    /// Loaded objects in ascending id order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(idx, o)| o.as_ref().map(|o| (ObjectId(idx as u32), o)))
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects().map(|(id, _)| id).collect()
    }

    pub fn globe_clip(&self) -> &ClipPlaneCollection {
        &self.globe_clip
    }

    pub fn globe_clip_mut(&mut self) -> &mut ClipPlaneCollection {
        &mut self.globe_clip
    }

    /// Drops every clip plane, on the globe and on every object.
    pub fn clear_all_clip_planes(&mut self) {
        self.globe_clip.clear();
        for object in self.objects.iter_mut().flatten() {
            object.clip.clear();
        }
    }

    pub fn set_ground_height(&mut self, height_m: Option<f64>) {
        self.ground_height = height_m;
    }

    /// Terrain altitude sample near the area of interest, when available.
    pub fn ground_height(&self) -> Option<f64> {
        self.ground_height
    }
}
