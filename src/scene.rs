use crate::components::{Component, SharedSkeleton};

/// A related group of components rendered together, in order (the order is
/// both z-order and update order), plus a hook run once per tick after
/// rendering. Returning `false` from the hook ends the run.
pub struct Scene {
    components: Vec<Component>,
    pub(crate) on_tick: Box<dyn FnMut() -> bool>,
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            components: Vec::new(),
            on_tick: Box::new(|| true),
        }
    }

    pub fn add_component(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    pub fn set_on_tick(&mut self, hook: impl FnMut() -> bool + 'static) {
        self.on_tick = Box::new(hook);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The scene's skeleton, if it has one. Only the first counts.
    pub fn skeleton(&self) -> Option<&SharedSkeleton> {
        self.components.iter().find_map(|component| match component {
            Component::Skeleton(skeleton) => Some(skeleton),
            _ => None,
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
