//! The response contract used by controller and view declarations.

use crate::value::Value;

/// A rendered response from a controller action
///
/// Only [`Response::status`] is required; the other accessors default to
/// "nothing rendered".
pub trait Response {
    /// HTTP status code
    fn status(&self) -> u16;

    /// Check whether the status is 2xx
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Check whether the status is 403
    fn is_forbidden(&self) -> bool {
        self.status() == 403
    }

    /// Name of the rendered template
    fn template(&self) -> Option<&str> {
        None
    }

    /// Target of a redirect
    fn redirect_location(&self) -> Option<&str> {
        None
    }

    /// Value assigned by the action for the view, `None` when unassigned
    fn assigns(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Check whether the rendered body contains an element matching `selector`
    fn has_tag(&self, _selector: &str) -> bool {
        false
    }
}
