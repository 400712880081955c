//! View declarations.

use std::rc::Rc;

use crate::config::RunConfig;
use crate::error::ensure;
use crate::group::ExampleGroup;
use crate::response::Response;
use crate::runner::{Runner, SuiteReport};

/// Declarations about a rendered view
pub struct ViewGroup<R: Response> {
    group: ExampleGroup,
    render: Rc<dyn Fn() -> R>,
}

impl<R: Response + 'static> ViewGroup<R> {
    /// Create a group whose cases call `render` to obtain the rendered view
    pub fn new<F>(description: impl Into<String>, render: F) -> Self
    where
        F: Fn() -> R + 'static,
    {
        Self {
            group: ExampleGroup::new(description),
            render: Rc::new(render),
        }
    }

    pub fn group(&self) -> &ExampleGroup {
        &self.group
    }

    pub fn into_group(self) -> ExampleGroup {
        self.group
    }

    pub fn run(&self, config: &RunConfig) -> SuiteReport {
        Runner::run(&self.group, config)
    }

    /// The rendered view contains an element matching `selector`
    pub fn should_have_tag_for(&mut self, name: &str, selector: &str) -> &mut Self {
        let render = Rc::clone(&self.render);
        let selector = selector.to_string();
        self.group.it(format!("should have a {}", name), move || {
            ensure(render().has_tag(&selector), || {
                format!("expected a tag matching {:?}", selector)
            })
        });
        self
    }
}

impl<R: Response> AsRef<ExampleGroup> for ViewGroup<R> {
    fn as_ref(&self) -> &ExampleGroup {
        &self.group
    }
}
