//! Renderer registry: structural tag name to component

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RenderError;
use crate::markup::Props;

/// Renders one structural element from its props and its pre-rendered
/// children
pub trait Component: Send + Sync {
    fn render(&self, props: &Props, children: &str) -> Result<String, RenderError>;
}

/// Adapter turning a closure into a [`Component`]
struct FnComponent<F>(F);

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props, &str) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, props: &Props, children: &str) -> Result<String, RenderError> {
        (self.0)(props, children)
    }
}

/// Components available to a render pass, keyed by tag name
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Arc<dyn Component>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.components.keys().collect();
        tags.sort();
        f.debug_struct("ComponentRegistry").field("tags", &tags).finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `tag`. A tag can be registered once.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        component: Arc<dyn Component>,
    ) -> Result<(), RenderError> {
        let tag = tag.into();
        if self.components.contains_key(&tag) {
            return Err(RenderError::DuplicateComponent { tag });
        }
        self.components.insert(tag, component);
        Ok(())
    }

    /// Register a closure as the component for `tag`
    pub fn register_fn<F>(&mut self, tag: impl Into<String>, render: F) -> Result<(), RenderError>
    where
        F: Fn(&Props, &str) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.register(tag, Arc::new(FnComponent(render)))
    }

    pub(crate) fn insert_fn<F>(&mut self, tag: &str, render: F)
    where
        F: Fn(&Props, &str) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.components
            .insert(tag.to_string(), Arc::new(FnComponent(render)));
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Registered tag names, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.components.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Render a structural element with the component registered for its tag
    pub fn render(&self, tag: &str, props: &Props, children: &str) -> Result<String, RenderError> {
        let component = self
            .get(tag)
            .ok_or_else(|| RenderError::UnknownStructuralTag {
                tag: tag.to_string(),
            })?;
        component.render(props, children)
    }
}
